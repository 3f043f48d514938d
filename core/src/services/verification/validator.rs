//! Offline syntactic checks for recipients
//!
//! Neither check is exhaustive. The email rule only looks at the `@` and
//! the number of domain labels; mobile numbers are not normalised.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::errors::{VerifierError, VerifierResult};

/// Optional leading `+`, then 7 to 24 digits
static MOBILE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\+?[0-9]{7,24}$").expect("mobile number pattern is valid")
});

/// Exactly one `@`, and the domain splits on `.` into at least two labels
///
/// Labels may be empty and the local part is not checked.
pub fn validate_email(address: &str) -> VerifierResult<()> {
    let mut parts = address.split('@');
    let domain = match (parts.next(), parts.next(), parts.next()) {
        (Some(_), Some(domain), None) => domain,
        _ => return Err(VerifierError::InvalidEmail),
    };

    if domain.split('.').count() < 2 {
        return Err(VerifierError::InvalidEmail);
    }

    Ok(())
}

pub fn validate_mobile(number: &str) -> VerifierResult<()> {
    if MOBILE_REGEX.is_match(number) {
        Ok(())
    } else {
        Err(VerifierError::InvalidMobileNumber)
    }
}
