//! Verification lifecycle for email and mobile recipients
//!
//! This module provides:
//! - Secret generation from an injected secure random source
//! - Offline syntactic validation of email addresses and mobile numbers
//! - Default message bodies and the email callback URL
//! - The `Verifier`, which creates, dispatches and verifies requests

mod config;
mod secret;
mod service;
pub mod templates;
mod traits;
mod validator;

#[cfg(test)]
mod tests;

pub use config::VerifierConfig;
pub use secret::{Alphabet, SecretGenerator, EMAIL_SECRET_LENGTH, MOBILE_SECRET_LENGTH};
pub use service::Verifier;
pub use templates::{build_callback_url, humanize_duration};
pub use traits::{EmailChannel, MobileChannel};
pub use validator::{validate_email, validate_mobile};
