//! Shared utilities and common types for the verifier workspace
//!
//! This crate provides functionality used across all workspace members:
//! - Configuration types (environment, logging, cache, database, server)
//! - The JSON error envelope returned by the HTTP surface
//! - Masking helpers so recipients never reach the logs in clear text

pub mod config;
pub mod errors;
pub mod utils;

// Re-export commonly used items at crate root
pub use config::{
    CacheConfig, DatabaseConfig, Environment, LogFormat, LoggingConfig, ServerConfig,
};
pub use errors::{error_codes, ErrorResponse};
pub use utils::masking::{mask_email, mask_phone_number, mask_recipient};
