//! Configuration for the verifier

use chrono::Duration;
use serde::{Deserialize, Serialize};

use crate::domain::entities::Channel;

/// Attempt budget used when the configured one is unusable
pub const DEFAULT_MAX_VERIFY_ATTEMPTS: u32 = 3;

/// Upper bound applied to configured secret validity (ten years)
const MAX_OTP_EXPIRY_SECS: u64 = 10 * 365 * 24 * 60 * 60;

/// Configuration for the verifier
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VerifierConfig {
    /// Validity of email secrets, in seconds
    pub email_otp_expiry_secs: u64,
    /// Validity of mobile OTPs, in seconds
    pub mobile_otp_expiry_secs: u64,
    /// Verification calls allowed per request (values below 1 fall back to 3)
    pub max_verify_attempts: u32,
    /// Sender address used for email dispatch
    pub default_email_sender: String,
    /// Subject used when the caller does not provide one
    pub default_email_subject: String,
    /// Base URL the email link points at; `email` and `secret` are appended
    pub email_callback_url: String,
}

impl Default for VerifierConfig {
    fn default() -> Self {
        Self {
            email_otp_expiry_secs: 12 * 60 * 60,
            mobile_otp_expiry_secs: 10 * 60,
            max_verify_attempts: DEFAULT_MAX_VERIFY_ATTEMPTS,
            default_email_sender: String::new(),
            default_email_subject: String::new(),
            email_callback_url: String::from(
                "http://localhost:8080/api/v1/verifications/email/callback",
            ),
        }
    }
}

impl VerifierConfig {
    /// Effective attempt budget
    pub fn max_attempts(&self) -> u32 {
        if self.max_verify_attempts < 1 {
            DEFAULT_MAX_VERIFY_ATTEMPTS
        } else {
            self.max_verify_attempts
        }
    }

    /// Secret validity for a channel
    pub fn otp_expiry(&self, channel: Channel) -> Duration {
        let secs = match channel {
            Channel::Email => self.email_otp_expiry_secs,
            Channel::Mobile => self.mobile_otp_expiry_secs,
        };
        Duration::seconds(i64::try_from(secs.min(MAX_OTP_EXPIRY_SECS)).unwrap_or(0))
    }
}
