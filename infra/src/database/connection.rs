//! Database connection pool management

use sqlx::mysql::{MySqlConnectOptions, MySqlPoolOptions};
use sqlx::MySqlPool;
use std::str::FromStr;
use std::time::Duration;

use vf_shared::config::DatabaseConfig;

use crate::InfrastructureError;

/// Create a MySQL connection pool
///
/// # Arguments
/// * `config` - Database configuration settings
///
/// # Returns
/// * `Result<MySqlPool, InfrastructureError>` - Connected pool or error
pub async fn create_pool(config: &DatabaseConfig) -> Result<MySqlPool, InfrastructureError> {
    tracing::info!(
        max_connections = config.max_connections,
        "Creating database connection pool"
    );

    let connect_options = MySqlConnectOptions::from_str(&config.url)
        .map_err(|e| InfrastructureError::Config(format!("Invalid database URL: {}", e)))?;

    let pool = MySqlPoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(1)
        .acquire_timeout(Duration::from_secs(config.connect_timeout))
        .idle_timeout(Duration::from_secs(config.idle_timeout))
        .max_lifetime(Duration::from_secs(1800))
        .test_before_acquire(true)
        .connect_with(connect_options)
        .await
        .map_err(|e| {
            tracing::error!("Failed to create database pool: {}", e);
            InfrastructureError::Database(e)
        })?;

    tracing::info!("Database connection pool created successfully");
    Ok(pool)
}
