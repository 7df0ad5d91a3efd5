use sqlx::{PgExecutor, PgPool};

use crate::configuration::DatabaseSettings;
use crate::domain::{Subscriber, SubscriberId, SubscriberName};

use super::{get_connection_pool, StoreError};

#[derive(Clone)]
pub struct SubscriberStore {
    pool: PgPool,
}

impl SubscriberStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn connect_lazy(configuration: &DatabaseSettings) -> Self {
        Self::new(get_connection_pool(configuration))
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    pub async fn create(&self, name: &SubscriberName) -> Result<SubscriberId, StoreError> {
        insert_subscriber(&self.pool, name).await
    }

    pub async fn read(&self, id: SubscriberId) -> Result<Option<Subscriber>, StoreError> {
        get_subscriber(&self.pool, id).await
    }

    /// Returns the number of rows changed; zero when `id` is unknown.
    pub async fn update(&self, id: SubscriberId, name: &SubscriberName) -> Result<u64, StoreError> {
        update_subscriber_name(&self.pool, id, name).await
    }

    /// Removes the subscriber together with every email address it owns.
    pub async fn delete(&self, id: SubscriberId) -> Result<u64, StoreError> {
        delete_subscriber(&self.pool, id).await
    }

    pub async fn count_by_id(&self, id: SubscriberId) -> Result<i64, StoreError> {
        count_subscribers_by_id(&self.pool, id).await
    }
}

#[tracing::instrument(
    name = "Saving new subscriber in the database",
    skip(executor, name),
    fields(subscriber_name = %name.as_ref())
)]
pub async fn insert_subscriber<'e, E>(
    executor: E,
    name: &SubscriberName,
) -> Result<SubscriberId, StoreError>
where
    E: PgExecutor<'e>,
{
    sqlx::query_scalar::<_, SubscriberId>(
        r#"INSERT INTO subscribers (name) VALUES ($1) RETURNING id"#,
    )
    .bind(name.as_ref())
    .fetch_one(executor)
    .await
    .map_err(|e| StoreError::database("insert a subscriber", e))
}

#[tracing::instrument(name = "Retrieving subscriber by id", skip(executor))]
pub async fn get_subscriber<'e, E>(
    executor: E,
    id: SubscriberId,
) -> Result<Option<Subscriber>, StoreError>
where
    E: PgExecutor<'e>,
{
    sqlx::query_as::<_, Subscriber>(
        r#"SELECT id, name, created_at FROM subscribers WHERE id = $1"#,
    )
    .bind(id)
    .fetch_optional(executor)
    .await
    .map_err(|e| StoreError::database("retrieve a subscriber", e))
}

#[tracing::instrument(
    name = "Renaming subscriber",
    skip(executor, name),
    fields(subscriber_name = %name.as_ref())
)]
pub async fn update_subscriber_name<'e, E>(
    executor: E,
    id: SubscriberId,
    name: &SubscriberName,
) -> Result<u64, StoreError>
where
    E: PgExecutor<'e>,
{
    let result = sqlx::query(r#"UPDATE subscribers SET name = $1 WHERE id = $2"#)
        .bind(name.as_ref())
        .bind(id)
        .execute(executor)
        .await
        .map_err(|e| StoreError::database("update a subscriber", e))?;

    Ok(result.rows_affected())
}

#[tracing::instrument(name = "Deleting subscriber and owned email addresses", skip(executor))]
pub async fn delete_subscriber<'e, E>(executor: E, id: SubscriberId) -> Result<u64, StoreError>
where
    E: PgExecutor<'e>,
{
    // email_addresses rows go with it through ON DELETE CASCADE.
    let result = sqlx::query(r#"DELETE FROM subscribers WHERE id = $1"#)
        .bind(id)
        .execute(executor)
        .await
        .map_err(|e| StoreError::database("delete a subscriber", e))?;

    Ok(result.rows_affected())
}

#[tracing::instrument(name = "Counting subscribers by id", skip(executor))]
pub async fn count_subscribers_by_id<'e, E>(executor: E, id: SubscriberId) -> Result<i64, StoreError>
where
    E: PgExecutor<'e>,
{
    sqlx::query_scalar::<_, i64>(r#"SELECT COUNT(*) FROM subscribers WHERE id = $1"#)
        .bind(id)
        .fetch_one(executor)
        .await
        .map_err(|e| StoreError::database("count subscribers", e))
}
