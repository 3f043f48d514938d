//! Error taxonomy of the verification lifecycle.

mod types;

pub use types::{ChannelError, StoreError};

use thiserror::Error;

use crate::domain::entities::{Channel, VerificationStatus};

/// Errors returned by the lifecycle manager
///
/// Validation errors are raised before anything is written. Terminal
/// outcomes (`MaximumAttemptsExceeded`, `SecretExpired`, `InvalidSecret`) are
/// raised after the attempt has been persisted.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VerifierError {
    #[error("Invalid email address")]
    InvalidEmail,

    #[error("Invalid mobile number")]
    InvalidMobileNumber,

    #[error("Email body cannot be empty")]
    EmptyEmailBody,

    #[error("SMS body cannot be empty")]
    EmptySmsBody,

    #[error("No pending {channel} verification request found")]
    NotFound { channel: Channel },

    #[error("Maximum verification attempts exceeded")]
    MaximumAttemptsExceeded,

    #[error("Verification secret expired")]
    SecretExpired,

    #[error("Invalid verification secret")]
    InvalidSecret,

    #[error("Request belongs to the {actual} channel, expected {expected}")]
    ChannelMismatch { expected: Channel, actual: Channel },

    #[error("Verification request is {status}, expected pending")]
    NotPending { status: VerificationStatus },

    #[error("Invalid callback URL: {message}")]
    InvalidCallbackUrl { message: String },

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Failed to dispatch {channel} verification: {source}")]
    Dispatch {
        channel: Channel,
        #[source]
        source: ChannelError,
    },
}

impl VerifierError {
    /// Input was rejected before any state was touched
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            VerifierError::InvalidEmail
                | VerifierError::InvalidMobileNumber
                | VerifierError::EmptyEmailBody
                | VerifierError::EmptySmsBody
                | VerifierError::ChannelMismatch { .. }
                | VerifierError::InvalidCallbackUrl { .. }
        )
    }

    /// A verification attempt was recorded and this is how it ended
    pub fn is_terminal_outcome(&self) -> bool {
        matches!(
            self,
            VerifierError::MaximumAttemptsExceeded
                | VerifierError::SecretExpired
                | VerifierError::InvalidSecret
        )
    }
}

pub type VerifierResult<T> = Result<T, VerifierError>;
