//! # Verifier Core
//!
//! Lifecycle of one-time verification secrets for email and mobile recipients.
//! This crate holds the `VerificationRequest` entity, the error taxonomy, the
//! store and notification channel seams, and the `Verifier` that drives a
//! request from creation through dispatch to a terminal outcome.

pub mod domain;
pub mod errors;
pub mod repositories;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::entities::{
    AttemptOutcome, Channel, DispatchEntry, VerificationRequest, VerificationStatus,
};
pub use errors::{ChannelError, StoreError, VerifierError, VerifierResult};
pub use repositories::{InMemoryVerificationStore, VerificationStore};
pub use services::verification::{
    build_callback_url, humanize_duration, templates, validate_email, validate_mobile, Alphabet,
    EmailChannel, MobileChannel, SecretGenerator, Verifier, VerifierConfig,
    EMAIL_SECRET_LENGTH, MOBILE_SECRET_LENGTH,
};
