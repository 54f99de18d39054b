//! Authentication module for API key verification.

mod extractor;

use secrecy::{ExposeSecret, SecretString};
use subtle::ConstantTimeEq;

pub use extractor::ApiKeyAuth;

/// Wrapper type for the configured API key.
/// Uses `SecretString` to prevent accidental logging and zeroize on drop.
///
/// # Security features
/// - `Debug` prints `[REDACTED]` instead of the actual value
/// - Memory is zeroed when dropped (via `zeroize`)
/// - Explicit `.expose_secret()` required to access the value
#[derive(Clone)]
pub struct ApiKey(SecretString);

impl ApiKey {
    pub fn new(key: SecretString) -> Self {
        Self(key)
    }

    /// Compare the provided key with the configured key in constant time.
    ///
    /// `ConstantTimeEq` returns false for unequal lengths without an early
    /// exit, so the comparison does not leak where the inputs first differ.
    pub fn verify(&self, provided: &str) -> bool {
        let expected = self.0.expose_secret();
        if expected.is_empty() {
            return false;
        }
        expected.as_bytes().ct_eq(provided.as_bytes()).into()
    }
}

impl std::fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ApiKey([REDACTED])")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(value: &str) -> ApiKey {
        ApiKey::new(SecretString::from(value.to_string()))
    }

    #[test]
    fn test_verify_accepts_exact_match() {
        assert!(key("s3cret").verify("s3cret"));
    }

    #[test]
    fn test_verify_rejects_mismatch_and_prefix() {
        let k = key("s3cret");
        assert!(!k.verify("s3cres"));
        assert!(!k.verify("s3c"));
        assert!(!k.verify(""));
    }

    #[test]
    fn test_empty_configured_key_never_matches() {
        assert!(!key("").verify(""));
    }

    #[test]
    fn test_debug_is_redacted() {
        assert_eq!(format!("{:?}", key("s3cret")), "ApiKey([REDACTED])");
    }
}
