//! Errors raised by the pluggable backends
//!
//! Store adapters return `StoreError` and notification channels return
//! `ChannelError`. The lifecycle manager wraps both with context before
//! handing them to the caller.

use thiserror::Error;

use crate::domain::entities::VerificationStatus;

/// Failures reported by a verification store
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("Verification request not found: {id}")]
    NotFound { id: String },

    #[error("Verification request {id} is {status} and can no longer be updated")]
    TerminalState {
        id: String,
        status: VerificationStatus,
    },

    #[error("Serialization error: {message}")]
    Serialization { message: String },

    #[error("Store backend error: {message}")]
    Backend { message: String },
}

impl StoreError {
    pub fn backend(message: impl std::fmt::Display) -> Self {
        StoreError::Backend {
            message: message.to_string(),
        }
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        StoreError::Serialization {
            message: err.to_string(),
        }
    }
}

/// Failure reported by a notification provider
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{provider}: {message}")]
pub struct ChannelError {
    /// Provider that rejected the message (e.g. "aws-sns", "smtp")
    pub provider: String,
    pub message: String,
}

impl ChannelError {
    pub fn new(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            provider: provider.into(),
            message: message.into(),
        }
    }
}
