//! Secret generation

use rand::distributions::{Distribution, Uniform};
use rand::rngs::OsRng;
use rand::{CryptoRng, RngCore};
use std::sync::Mutex;

/// Length of secrets embedded in email links
pub const EMAIL_SECRET_LENGTH: usize = 256;

/// Length of mobile OTPs
pub const MOBILE_SECRET_LENGTH: usize = 6;

const ALPHANUMERIC: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ";
const NUMERIC: &[u8] = b"0123456789";

/// Symbol set a secret is drawn from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Alphabet {
    /// `0-9a-zA-Z`
    Alphanumeric,
    /// `0-9`
    Numeric,
}

impl Alphabet {
    fn symbols(&self) -> &'static [u8] {
        match self {
            Alphabet::Alphanumeric => ALPHANUMERIC,
            Alphabet::Numeric => NUMERIC,
        }
    }
}

trait SecureRng: RngCore + CryptoRng + Send {}

impl<T: RngCore + CryptoRng + Send> SecureRng for T {}

/// Draws uniformly random secrets from a cryptographically secure source
///
/// The source is owned by the generator; nothing is seeded globally.
pub struct SecretGenerator {
    rng: Mutex<Box<dyn SecureRng>>,
}

impl SecretGenerator {
    /// Generator backed by the operating system's random source
    pub fn new() -> Self {
        Self::from_rng(OsRng)
    }

    /// Generator backed by the given source, e.g. a seeded `StdRng` in tests
    pub fn from_rng<R>(rng: R) -> Self
    where
        R: RngCore + CryptoRng + Send + 'static,
    {
        Self {
            rng: Mutex::new(Box::new(rng)),
        }
    }

    /// Generate `length` independent characters from `alphabet`
    pub fn generate(&self, alphabet: Alphabet, length: usize) -> String {
        let symbols = alphabet.symbols();
        let index = Uniform::new(0, symbols.len());
        let mut rng = self
            .rng
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        (0..length)
            .map(|_| symbols[index.sample(&mut **rng)] as char)
            .collect()
    }
}

impl Default for SecretGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for SecretGenerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SecretGenerator").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_numeric_secret() {
        let generator = SecretGenerator::new();
        for _ in 0..100 {
            let secret = generator.generate(Alphabet::Numeric, MOBILE_SECRET_LENGTH);
            assert_eq!(secret.len(), 6);
            assert!(secret.chars().all(|c| c.is_ascii_digit()));
        }
    }

    #[test]
    fn test_alphanumeric_secret() {
        let generator = SecretGenerator::new();
        let secret = generator.generate(Alphabet::Alphanumeric, EMAIL_SECRET_LENGTH);

        assert_eq!(secret.len(), 256);
        assert!(secret.chars().all(|c| c.is_ascii_alphanumeric()));
    }

    #[test]
    fn test_injected_rng_is_deterministic() {
        let a = SecretGenerator::from_rng(StdRng::seed_from_u64(7));
        let b = SecretGenerator::from_rng(StdRng::seed_from_u64(7));

        assert_eq!(
            a.generate(Alphabet::Alphanumeric, 32),
            b.generate(Alphabet::Alphanumeric, 32)
        );
    }

    #[test]
    fn test_zero_length() {
        assert!(SecretGenerator::new().generate(Alphabet::Numeric, 0).is_empty());
    }
}
