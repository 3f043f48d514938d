//! Redis-backed verification store
//!
//! Requests are stored as JSON documents that expire some time after their
//! secret does. Pending requests are indexed per recipient in a sorted set
//! ordered by creation time.

pub mod redis_store;

pub use redis_store::RedisVerificationStore;
