//! Domain entities representing core business objects.

pub mod verification_request;

pub use verification_request::{
    AttemptOutcome, Channel, DispatchEntry, VerificationRequest, VerificationStatus,
};
