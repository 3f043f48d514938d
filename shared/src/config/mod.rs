//! Configuration module
//!
//! - `cache` - Redis connection used by the Redis verification store
//! - `database` - MySQL connection used by the SQL verification store
//! - `environment` - Environment detection and logging configuration
//! - `server` - HTTP server binding

pub mod cache;
pub mod database;
pub mod environment;
pub mod server;

pub use cache::CacheConfig;
pub use database::DatabaseConfig;
pub use environment::{Environment, LogFormat, LoggingConfig};
pub use server::ServerConfig;
