//! Redis configuration for the Redis-backed verification store

use serde::{Deserialize, Serialize};

/// Redis connection configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CacheConfig {
    /// Redis connection URL
    pub url: String,

    /// Prefix prepended to every key written by the store
    #[serde(default = "default_key_prefix")]
    pub key_prefix: String,

    /// How long a record is kept after its secret has expired, in seconds.
    /// Expired records must outlive the secret so a late attempt reports
    /// `expired` instead of `not found`.
    #[serde(default = "default_retention_secs")]
    pub retention_secs: u64,

    /// Connection timeout in seconds
    #[serde(default = "default_connection_timeout")]
    pub connection_timeout: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            url: String::from("redis://localhost:6379"),
            key_prefix: default_key_prefix(),
            retention_secs: default_retention_secs(),
            connection_timeout: default_connection_timeout(),
        }
    }
}

impl CacheConfig {
    /// Create from environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            url: std::env::var("REDIS_URL").unwrap_or(defaults.url),
            key_prefix: std::env::var("REDIS_KEY_PREFIX").unwrap_or(defaults.key_prefix),
            retention_secs: std::env::var("REDIS_RETENTION_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.retention_secs),
            connection_timeout: std::env::var("REDIS_CONNECTION_TIMEOUT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.connection_timeout),
        }
    }

    /// Create a new cache configuration with URL
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Default::default()
        }
    }
}

fn default_key_prefix() -> String {
    String::from("verifier")
}

fn default_retention_secs() -> u64 {
    86_400
}

fn default_connection_timeout() -> u64 {
    5
}
