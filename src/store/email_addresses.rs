use sqlx::{PgExecutor, PgPool};

use crate::configuration::DatabaseSettings;
use crate::domain::{
    EmailAddress, EmailAddressId, EmailAddressWithSubscriber, SubscriberEmail, SubscriberId,
};

use super::{get_connection_pool, is_foreign_key_violation, StoreError};

#[derive(Clone)]
pub struct EmailAddressStore {
    pool: PgPool,
}

impl EmailAddressStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn connect_lazy(configuration: &DatabaseSettings) -> Self {
        Self::new(get_connection_pool(configuration))
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Fails with [`StoreError::UnknownSubscriber`] when `subscriber_id` has no row.
    pub async fn create(
        &self,
        subscriber_id: SubscriberId,
        email: &SubscriberEmail,
    ) -> Result<EmailAddressId, StoreError> {
        insert_email_address(&self.pool, subscriber_id, email).await
    }

    pub async fn read(&self, id: EmailAddressId) -> Result<Option<EmailAddress>, StoreError> {
        get_email_address(&self.pool, id).await
    }

    pub async fn read_with_subscriber(
        &self,
        id: EmailAddressId,
    ) -> Result<Option<EmailAddressWithSubscriber>, StoreError> {
        get_email_address_with_subscriber(&self.pool, id).await
    }

    pub async fn update(
        &self,
        id: EmailAddressId,
        email: &SubscriberEmail,
    ) -> Result<u64, StoreError> {
        update_email_address(&self.pool, id, email).await
    }

    pub async fn delete(&self, id: EmailAddressId) -> Result<u64, StoreError> {
        delete_email_address(&self.pool, id).await
    }

    pub async fn count_by_id(&self, id: EmailAddressId) -> Result<i64, StoreError> {
        count_email_addresses_by_id(&self.pool, id).await
    }

    pub async fn count_for_subscriber(
        &self,
        subscriber_id: SubscriberId,
    ) -> Result<i64, StoreError> {
        count_email_addresses_for_subscriber(&self.pool, subscriber_id).await
    }

    pub async fn list_for_subscriber(
        &self,
        subscriber_id: SubscriberId,
    ) -> Result<Vec<EmailAddress>, StoreError> {
        list_email_addresses_for_subscriber(&self.pool, subscriber_id).await
    }
}

#[tracing::instrument(
    name = "Saving new email address in the database",
    skip(executor, email),
    fields(subscriber_email = %email)
)]
pub async fn insert_email_address<'e, E>(
    executor: E,
    subscriber_id: SubscriberId,
    email: &SubscriberEmail,
) -> Result<EmailAddressId, StoreError>
where
    E: PgExecutor<'e>,
{
    sqlx::query_scalar::<_, EmailAddressId>(
        r#"INSERT INTO email_addresses (subscriber_id, email) VALUES ($1, $2) RETURNING id"#,
    )
    .bind(subscriber_id)
    .bind(email.as_ref())
    .fetch_one(executor)
    .await
    .map_err(|e| {
        if is_foreign_key_violation(&e) {
            tracing::warn!("Rejected email address for unknown subscriber {}", subscriber_id);
            StoreError::UnknownSubscriber(subscriber_id, e)
        } else {
            StoreError::database("insert an email address", e)
        }
    })
}

#[tracing::instrument(name = "Retrieving email address by id", skip(executor))]
pub async fn get_email_address<'e, E>(
    executor: E,
    id: EmailAddressId,
) -> Result<Option<EmailAddress>, StoreError>
where
    E: PgExecutor<'e>,
{
    sqlx::query_as::<_, EmailAddress>(
        r#"SELECT id, subscriber_id, email FROM email_addresses WHERE id = $1"#,
    )
    .bind(id)
    .fetch_optional(executor)
    .await
    .map_err(|e| StoreError::database("retrieve an email address", e))
}

#[tracing::instrument(name = "Retrieving email address with its subscriber", skip(executor))]
pub async fn get_email_address_with_subscriber<'e, E>(
    executor: E,
    id: EmailAddressId,
) -> Result<Option<EmailAddressWithSubscriber>, StoreError>
where
    E: PgExecutor<'e>,
{
    sqlx::query_as::<_, EmailAddressWithSubscriber>(
        r#"
        SELECT e.id, e.subscriber_id, e.email, s.name AS subscriber_name
        FROM email_addresses e
        JOIN subscribers s ON e.subscriber_id = s.id
        WHERE e.id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(executor)
    .await
    .map_err(|e| StoreError::database("retrieve an email address with its subscriber", e))
}

#[tracing::instrument(
    name = "Updating email address",
    skip(executor, email),
    fields(subscriber_email = %email)
)]
pub async fn update_email_address<'e, E>(
    executor: E,
    id: EmailAddressId,
    email: &SubscriberEmail,
) -> Result<u64, StoreError>
where
    E: PgExecutor<'e>,
{
    let result = sqlx::query(r#"UPDATE email_addresses SET email = $1 WHERE id = $2"#)
        .bind(email.as_ref())
        .bind(id)
        .execute(executor)
        .await
        .map_err(|e| StoreError::database("update an email address", e))?;

    Ok(result.rows_affected())
}

#[tracing::instrument(name = "Deleting email address", skip(executor))]
pub async fn delete_email_address<'e, E>(executor: E, id: EmailAddressId) -> Result<u64, StoreError>
where
    E: PgExecutor<'e>,
{
    let result = sqlx::query(r#"DELETE FROM email_addresses WHERE id = $1"#)
        .bind(id)
        .execute(executor)
        .await
        .map_err(|e| StoreError::database("delete an email address", e))?;

    Ok(result.rows_affected())
}

#[tracing::instrument(name = "Counting email addresses by id", skip(executor))]
pub async fn count_email_addresses_by_id<'e, E>(
    executor: E,
    id: EmailAddressId,
) -> Result<i64, StoreError>
where
    E: PgExecutor<'e>,
{
    sqlx::query_scalar::<_, i64>(r#"SELECT COUNT(*) FROM email_addresses WHERE id = $1"#)
        .bind(id)
        .fetch_one(executor)
        .await
        .map_err(|e| StoreError::database("count email addresses", e))
}

#[tracing::instrument(name = "Counting email addresses of a subscriber", skip(executor))]
pub async fn count_email_addresses_for_subscriber<'e, E>(
    executor: E,
    subscriber_id: SubscriberId,
) -> Result<i64, StoreError>
where
    E: PgExecutor<'e>,
{
    sqlx::query_scalar::<_, i64>(
        r#"SELECT COUNT(*) FROM email_addresses WHERE subscriber_id = $1"#,
    )
    .bind(subscriber_id)
    .fetch_one(executor)
    .await
    .map_err(|e| StoreError::database("count email addresses of a subscriber", e))
}

#[tracing::instrument(name = "Listing email addresses of a subscriber", skip(executor))]
pub async fn list_email_addresses_for_subscriber<'e, E>(
    executor: E,
    subscriber_id: SubscriberId,
) -> Result<Vec<EmailAddress>, StoreError>
where
    E: PgExecutor<'e>,
{
    sqlx::query_as::<_, EmailAddress>(
        r#"SELECT id, subscriber_id, email FROM email_addresses WHERE subscriber_id = $1 ORDER BY id"#,
    )
    .bind(subscriber_id)
    .fetch_all(executor)
    .await
    .map_err(|e| StoreError::database("list email addresses of a subscriber", e))
}
