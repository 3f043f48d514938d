//! Business services containing domain logic and use cases.

pub mod verification;

// Re-export commonly used types
pub use verification::{
    build_callback_url, humanize_duration, validate_email, validate_mobile, Alphabet,
    EmailChannel, MobileChannel, SecretGenerator, Verifier, VerifierConfig,
};
