// Repositories module - data access layer

pub mod food_repository;
pub mod order_repository;

use std::time::Duration;

use sqlx::postgres::{PgPool, PgPoolOptions};
use tracing::{error, info};

use crate::config::DatabaseConfig;
use crate::models::RepositoryError;

pub use food_repository::{FoodRepository, PostgresFoodRepository};
pub use order_repository::{OrderRepository, PostgresOrderRepository};

/// Open the shared connection pool
pub async fn connect_pool(config: &DatabaseConfig) -> Result<PgPool, sqlx::Error> {
    info!(
        host = %config.host,
        port = config.port,
        database = %config.name,
        max_connections = config.max_connections,
        "Connecting to PostgreSQL"
    );

    PgPoolOptions::new()
        .max_connections(config.max_connections)
        .acquire_timeout(Duration::from_secs(config.acquire_timeout_seconds))
        .connect_with(config.connect_options())
        .await
}

/// Translate a driver error into the repository error taxonomy
pub(crate) fn map_sqlx_error(error: sqlx::Error) -> RepositoryError {
    error!("PostgreSQL error: {:?}", error);

    match error {
        sqlx::Error::PoolTimedOut => RepositoryError::Timeout,
        sqlx::Error::PoolClosed | sqlx::Error::Io(_) | sqlx::Error::Tls(_) => {
            RepositoryError::ConnectionFailed
        }
        sqlx::Error::ColumnDecode { .. }
        | sqlx::Error::Decode(_)
        | sqlx::Error::ColumnNotFound(_)
        | sqlx::Error::RowNotFound => RepositoryError::InvalidData {
            message: error.to_string(),
        },
        other => RepositoryError::Database {
            message: other.to_string(),
        },
    }
}
