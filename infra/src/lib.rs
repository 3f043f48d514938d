//! # Infrastructure Layer
//!
//! Concrete backends for the verification lifecycle:
//! - **Stores**: Redis (`cache`) and MySQL (`database`) implementations of `VerificationStore`
//! - **Mobile channels**: AWS SNS, Twilio and a console mock
//! - **Email channels**: SMTP and a console mock
//! - **Wiring**: factories that pick a backend from `InfrastructureConfig`
//!
//! ## Features
//!
//! - `mysql`: MySQL store (default)
//! - `redis-store`: Redis store (default)
//! - `twilio-sms`: Twilio SMS channel (default)
//! - `aws-sns`: AWS SNS SMS channel (default)
//! - `smtp-email`: SMTP email channel (default)

use std::sync::Arc;

use vf_core::{InMemoryVerificationStore, VerificationStore};

/// Redis-backed verification store
#[cfg(feature = "redis-store")]
pub mod cache;

/// Configuration for infrastructure services
pub mod config;

/// MySQL-backed verification store
#[cfg(feature = "mysql")]
pub mod database;

/// Email channels
pub mod email;

/// SMS channels
pub mod sms;

pub use config::{load_config, EmailConfig, InfrastructureConfig, SmsConfig, StoreBackend};
pub use email::create_email_channel;
pub use sms::create_mobile_channel;

/// Infrastructure-specific error types
#[derive(Debug, thiserror::Error)]
pub enum InfrastructureError {
    /// Database connection error
    #[cfg(feature = "mysql")]
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Redis error
    #[cfg(feature = "redis-store")]
    #[error("Cache error: {0}")]
    Cache(#[from] redis::RedisError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// SMS service error
    #[error("SMS service error: {0}")]
    Sms(String),

    /// Email service error
    #[error("Email service error: {0}")]
    Email(String),
}

/// Build the verification store selected by `config.store`
pub async fn create_store(
    config: &InfrastructureConfig,
) -> Result<Arc<dyn VerificationStore>, InfrastructureError> {
    match config.store {
        StoreBackend::Memory => {
            tracing::warn!(
                event = "store_selected",
                backend = "memory",
                "Using in-memory verification store; requests are lost on restart"
            );
            Ok(Arc::new(InMemoryVerificationStore::new()))
        }
        #[cfg(feature = "redis-store")]
        StoreBackend::Redis => {
            let store = cache::RedisVerificationStore::connect(&config.cache).await?;
            tracing::info!(event = "store_selected", backend = "redis", "Using Redis verification store");
            Ok(Arc::new(store))
        }
        #[cfg(feature = "mysql")]
        StoreBackend::MySql => {
            let pool = database::create_pool(&config.database).await?;
            let store =
                database::MySqlVerificationStore::new(pool, config.database.table_name.clone())?;
            store.ensure_schema().await?;
            tracing::info!(event = "store_selected", backend = "mysql", "Using MySQL verification store");
            Ok(Arc::new(store))
        }
        #[allow(unreachable_patterns)]
        other => Err(InfrastructureError::Config(format!(
            "Store backend '{}' is not compiled in",
            other
        ))),
    }
}
