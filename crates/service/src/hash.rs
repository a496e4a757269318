//! Password hashing capability.

use argon2::{
    password_hash::{self, PasswordHasher, PasswordVerifier, SaltString},
    Argon2, PasswordHash,
};
use rand::rngs::OsRng;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HashError {
    #[error("unable to hash password: {0}")]
    Hash(String),
    #[error("did not provide a valid hash: {0}")]
    InvalidDigest(String),
    #[error("unable to verify user password: {0}")]
    Verify(String),
}

/// Opaque hash/compare primitive used for user passwords.
///
/// `compare` returns `Ok(false)` on a plain mismatch and `Err` only when the
/// comparison itself could not be carried out.
pub trait HashProvider: Send + Sync {
    fn hash(&self, plaintext: &str) -> Result<String, HashError>;
    fn compare(&self, plaintext: &str, digest: &str) -> Result<bool, HashError>;
}

/// Argon2id with default parameters, PHC string digests.
#[derive(Default, Clone)]
pub struct Argon2Hasher {
    argon2: Argon2<'static>,
}

impl Argon2Hasher {
    pub fn new() -> Self {
        Self::default()
    }
}

impl HashProvider for Argon2Hasher {
    fn hash(&self, plaintext: &str) -> Result<String, HashError> {
        let salt = SaltString::generate(&mut OsRng);
        let digest = self
            .argon2
            .hash_password(plaintext.as_bytes(), &salt)
            .map_err(|e| HashError::Hash(e.to_string()))?
            .to_string();
        Ok(digest)
    }

    fn compare(&self, plaintext: &str, digest: &str) -> Result<bool, HashError> {
        let parsed =
            PasswordHash::new(digest).map_err(|e| HashError::InvalidDigest(e.to_string()))?;
        match self.argon2.verify_password(plaintext.as_bytes(), &parsed) {
            Ok(()) => Ok(true),
            Err(password_hash::Error::Password) => Ok(false),
            Err(e) => Err(HashError::Verify(e.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_then_compare() {
        let hasher = Argon2Hasher::new();
        let digest = hasher.hash("Passw0rd").unwrap();
        assert!(digest.starts_with("$argon2"));
        assert_ne!(digest, "Passw0rd");
        assert!(hasher.compare("Passw0rd", &digest).unwrap());
        assert!(!hasher.compare("wrong", &digest).unwrap());
    }

    #[test]
    fn salts_differ_between_hashes() {
        let hasher = Argon2Hasher::new();
        assert_ne!(hasher.hash("same").unwrap(), hasher.hash("same").unwrap());
    }

    #[test]
    fn malformed_digest_is_an_error_not_a_mismatch() {
        let hasher = Argon2Hasher::new();
        let err = hasher.compare("Passw0rd", "not-a-phc-string").unwrap_err();
        assert!(matches!(err, HashError::InvalidDigest(_)));
    }
}
