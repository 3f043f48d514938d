//! HTTP surface of the verifier
//!
//! Routes live under `/api/v1/verifications`; `create_app` wires them to a
//! shared [`SharedVerifier`] so the binary and the tests build the same app.

pub mod app;
pub mod config;
pub mod dto;
pub mod handlers;
pub mod routes;
pub mod telemetry;

pub use app::{create_app, SharedVerifier};
pub use config::ApiConfig;
