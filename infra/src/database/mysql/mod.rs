//! MySQL repository implementations

pub mod verification_store_impl;

pub use verification_store_impl::MySqlVerificationStore;
