//! Postgres-backed stores for subscribers and their email addresses.
//!
//! Every operation is available twice: as a method on a pool-backed store,
//! where each call is a single auto-committed statement, and as a free
//! function generic over [`sqlx::PgExecutor`] so that callers can run it on a
//! dedicated connection or inside a transaction.

use std::time::Duration;

use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

use crate::configuration::DatabaseSettings;
use crate::domain::SubscriberId;
use crate::telemetry::error_chain_fmt;

pub mod email_addresses;
pub mod subscribers;

pub use email_addresses::EmailAddressStore;
pub use subscribers::SubscriberStore;

/// SQLSTATE raised by Postgres when a foreign key constraint is violated.
const FOREIGN_KEY_VIOLATION: &str = "23503";

#[derive(thiserror::Error)]
pub enum StoreError {
    #[error("Subscriber {0} does not exist")]
    UnknownSubscriber(SubscriberId, #[source] sqlx::Error),
    #[error("A database error was encountered while trying to {action}")]
    Database {
        action: &'static str,
        #[source]
        source: sqlx::Error,
    },
}

impl StoreError {
    pub(crate) fn database(action: &'static str, source: sqlx::Error) -> Self {
        tracing::error!("Failed to {}: {:?}", action, source);
        Self::Database { action, source }
    }
}

impl std::fmt::Debug for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}

pub(crate) fn is_foreign_key_violation(error: &sqlx::Error) -> bool {
    match error {
        sqlx::Error::Database(e) => e.code().as_deref() == Some(FOREIGN_KEY_VIOLATION),
        _ => false,
    }
}

/// Builds a pool that connects on first use.
pub fn get_connection_pool(configuration: &DatabaseSettings) -> PgPool {
    PgPoolOptions::new()
        .acquire_timeout(Duration::from_secs(2))
        .connect_lazy_with(configuration.with_db())
}
