use super::{EmailAddressId, SubscriberId};

#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct EmailAddress {
    pub id: EmailAddressId,
    pub subscriber_id: SubscriberId,
    pub email: String,
}

/// An email address joined with the current name of its owner.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct EmailAddressWithSubscriber {
    pub id: EmailAddressId,
    pub subscriber_id: SubscriberId,
    pub email: String,
    pub subscriber_name: String,
}
