use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::PasswordHash;
use argon2::password_hash::PasswordHasher;
use argon2::password_hash::PasswordVerifier;
use argon2::password_hash::SaltString;
use argon2::Argon2;

use super::errors::HashError;

/// One-way hashing for secrets that must never be stored in plaintext.
///
/// Used for both passwords and refresh tokens. Every hash gets a fresh random
/// salt, so hashing the same secret twice yields two different PHC strings.
#[derive(Debug, Clone, Copy, Default)]
pub struct SecretHasher;

impl SecretHasher {
    pub fn new() -> Self {
        Self
    }

    /// Hash a plaintext secret with Argon2id.
    ///
    /// # Returns
    /// PHC string (algorithm, parameters, salt and digest)
    ///
    /// # Errors
    /// * `HashingFailed` - Argon2 rejected the input or parameters
    pub fn hash(&self, secret: &str) -> Result<String, HashError> {
        let salt = SaltString::generate(&mut OsRng);

        Argon2::default()
            .hash_password(secret.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| HashError::HashingFailed(e.to_string()))
    }

    /// Check a plaintext secret against a stored PHC string.
    ///
    /// A mismatch is `Ok(false)`; only an unparseable stored hash is an error.
    ///
    /// # Errors
    /// * `MalformedHash` - Stored value is not a valid PHC string
    pub fn verify(&self, secret: &str, hash: &str) -> Result<bool, HashError> {
        let parsed = PasswordHash::new(hash).map_err(|e| HashError::MalformedHash(e.to_string()))?;

        Ok(Argon2::default()
            .verify_password(secret.as_bytes(), &parsed)
            .is_ok())
    }
}
