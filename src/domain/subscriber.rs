use chrono::{DateTime, Utc};

use super::SubscriberId;

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Subscriber {
    pub id: SubscriberId,
    pub name: String,
    pub created_at: DateTime<Utc>,
}
