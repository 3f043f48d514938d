//! Domain layer containing the verification request entity.

pub mod entities;

pub use entities::*;
