//! Database module - MySQL implementations using SQLx
//!
//! - Connection pool creation
//! - MySQL implementation of `VerificationStore`

pub mod connection;
pub mod mysql;

pub use connection::create_pool;
pub use mysql::MySqlVerificationStore;
