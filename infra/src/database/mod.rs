//! Database connection pool management and MySQL repository implementations.

pub mod mysql;

use std::time::Duration;

use sqlx::mysql::MySqlPoolOptions;
use sqlx::MySqlPool;
use tracing::info;

use gate_core::errors::DomainError;
use gate_shared::config::DatabaseConfig;

/// Create a MySQL connection pool from configuration
///
/// # Arguments
/// * `config` - Database configuration settings
///
/// # Example
/// ```no_run
/// use gate_infra::database::create_pool;
/// use gate_shared::config::DatabaseConfig;
///
/// async fn connect() -> Result<(), Box<dyn std::error::Error>> {
///     let pool = create_pool(&DatabaseConfig::from_env()).await?;
///     let _ = pool;
///     Ok(())
/// }
/// ```
pub async fn create_pool(config: &DatabaseConfig) -> Result<MySqlPool, DomainError> {
    info!(
        max_connections = config.max_connections,
        "Creating database connection pool"
    );

    MySqlPoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(1)
        .acquire_timeout(Duration::from_secs(config.connect_timeout))
        .idle_timeout(Duration::from_secs(config.idle_timeout))
        .connect(&config.url)
        .await
        .map_err(|e| DomainError::Internal {
            message: format!("Failed to connect to database: {}", e),
        })
}
