pub mod verification;

pub use vf_shared::ErrorResponse;
