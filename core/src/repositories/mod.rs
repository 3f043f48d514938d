pub mod verification;

pub use verification::{InMemoryVerificationStore, VerificationStore};
