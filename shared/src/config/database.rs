//! Database configuration module

use serde::{Deserialize, Serialize};

/// MySQL connection configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DatabaseConfig {
    /// Database connection URL
    pub url: String,

    /// Maximum number of connections in the pool
    pub max_connections: u32,

    /// Connection timeout in seconds
    pub connect_timeout: u64,

    /// Idle connection timeout in seconds
    pub idle_timeout: u64,

    /// Table holding verification requests
    #[serde(default = "default_table_name")]
    pub table_name: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: String::from("mysql://localhost:3306/verifier"),
            max_connections: 10,
            connect_timeout: 30,
            idle_timeout: 600,
            table_name: default_table_name(),
        }
    }
}

impl DatabaseConfig {
    /// Create from environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            url: std::env::var("DATABASE_URL").unwrap_or(defaults.url),
            max_connections: std::env::var("DATABASE_MAX_CONNECTIONS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.max_connections),
            connect_timeout: std::env::var("DATABASE_CONNECT_TIMEOUT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.connect_timeout),
            idle_timeout: defaults.idle_timeout,
            table_name: std::env::var("DATABASE_TABLE_NAME").unwrap_or(defaults.table_name),
        }
    }

    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Default::default()
        }
    }

    pub fn with_max_connections(mut self, max: u32) -> Self {
        self.max_connections = max;
        self
    }
}

fn default_table_name() -> String {
    String::from("verification_requests")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_methods() {
        let config = DatabaseConfig::new("mysql://db:3306/otp").with_max_connections(25);
        assert_eq!(config.url, "mysql://db:3306/otp");
        assert_eq!(config.max_connections, 25);
        assert_eq!(config.table_name, "verification_requests");
    }
}
