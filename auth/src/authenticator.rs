use std::sync::OnceLock;

use chrono::Duration;

use crate::hash::HashError;
use crate::hash::SecretHasher;
use crate::jwt::AccessTokenVerifier;
use crate::jwt::JwtError;
use crate::jwt::RefreshTokenVerifier;
use crate::jwt::TokenClaims;
use crate::jwt::TokenKind;
use crate::jwt::TokenVerifier;

/// Default access token lifetime in minutes.
pub const DEFAULT_ACCESS_TTL_MINUTES: i64 = 15;

/// Default refresh token lifetime in minutes.
pub const DEFAULT_REFRESH_TTL_MINUTES: i64 = 135;

/// Authentication coordinator combining one-way hashing and token issuance.
///
/// Holds one verifier per token kind, each keyed by its own secret, and signs
/// new tokens with the same keys.
pub struct Authenticator {
    hasher: SecretHasher,
    access: AccessTokenVerifier,
    refresh: RefreshTokenVerifier,
    access_ttl: Duration,
    refresh_ttl: Duration,
    /// Hash of a random secret, verified against when there is no account
    decoy_hash: OnceLock<String>,
}

/// Freshly issued access and refresh tokens, in plaintext.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

/// Authentication operation errors.
#[derive(Debug, Clone, thiserror::Error)]
pub enum AuthenticationError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Hash error: {0}")]
    HashError(#[from] HashError),
}

impl Authenticator {
    /// Create a new authenticator with the default 15m/135m lifetimes.
    ///
    /// # Arguments
    /// * `access_secret` - Secret key for access token signing
    /// * `refresh_secret` - Secret key for refresh token signing
    pub fn new(access_secret: &[u8], refresh_secret: &[u8]) -> Self {
        Self {
            hasher: SecretHasher::new(),
            access: AccessTokenVerifier::new(access_secret),
            refresh: RefreshTokenVerifier::new(refresh_secret),
            access_ttl: Duration::minutes(DEFAULT_ACCESS_TTL_MINUTES),
            refresh_ttl: Duration::minutes(DEFAULT_REFRESH_TTL_MINUTES),
            decoy_hash: OnceLock::new(),
        }
    }

    /// Override token lifetimes.
    pub fn with_ttls(mut self, access_ttl: Duration, refresh_ttl: Duration) -> Self {
        self.access_ttl = access_ttl;
        self.refresh_ttl = refresh_ttl;
        self
    }

    /// Hash a password for storage.
    pub fn hash_password(&self, password: &str) -> Result<String, HashError> {
        self.hasher.hash(password)
    }

    /// Check a password against its stored hash.
    ///
    /// # Errors
    /// * `InvalidCredentials` - Password does not match
    /// * `HashError` - Stored hash is unreadable
    pub fn verify_password(&self, password: &str, stored_hash: &str) -> Result<(), AuthenticationError> {
        self.verify_secret(password, stored_hash)
    }

    /// Reject a password presented for an account that does not exist.
    ///
    /// Runs the same Argon2 verification a wrong password costs, so the two
    /// rejections take the same time.
    ///
    /// # Returns
    /// `InvalidCredentials`, or `HashError` if the decoy hash could not be built
    pub fn reject_unknown_account(&self, password: &str) -> AuthenticationError {
        let decoy_hash = match self.decoy_hash() {
            Ok(hash) => hash,
            Err(e) => return AuthenticationError::HashError(e),
        };

        match self.verify_secret(password, decoy_hash) {
            Err(e @ AuthenticationError::HashError(_)) => e,
            _ => AuthenticationError::InvalidCredentials,
        }
    }

    /// Hash a refresh token for storage. The plaintext is never persisted.
    pub fn hash_refresh_token(&self, refresh_token: &str) -> Result<String, HashError> {
        self.hasher.hash(refresh_token)
    }

    /// Check a presented refresh token against the stored hash.
    ///
    /// # Errors
    /// * `InvalidCredentials` - Token is not the one the hash was made from
    /// * `HashError` - Stored hash is unreadable
    pub fn verify_refresh_token_hash(
        &self,
        refresh_token: &str,
        stored_hash: &str,
    ) -> Result<(), AuthenticationError> {
        self.verify_secret(refresh_token, stored_hash)
    }

    /// Sign a new access/refresh pair for a subject.
    ///
    /// # Errors
    /// * `JwtError` - Token generation failed
    pub fn issue_pair(&self, subject: impl ToString, email: &str) -> Result<TokenPair, JwtError> {
        let subject = subject.to_string();

        let access_claims = TokenClaims::issue(&subject, email, TokenKind::Access, self.access_ttl);
        let refresh_claims =
            TokenClaims::issue(&subject, email, TokenKind::Refresh, self.refresh_ttl);

        Ok(TokenPair {
            access_token: self.access.handler().encode(&access_claims)?,
            refresh_token: self.refresh.handler().encode(&refresh_claims)?,
        })
    }

    pub fn access_verifier(&self) -> &AccessTokenVerifier {
        &self.access
    }

    pub fn refresh_verifier(&self) -> &RefreshTokenVerifier {
        &self.refresh
    }

    fn decoy_hash(&self) -> Result<&str, HashError> {
        if let Some(hash) = self.decoy_hash.get() {
            return Ok(hash.as_str());
        }

        let hash = self.hasher.hash(&uuid::Uuid::new_v4().to_string())?;
        Ok(self.decoy_hash.get_or_init(|| hash).as_str())
    }

    fn verify_secret(&self, secret: &str, stored_hash: &str) -> Result<(), AuthenticationError> {
        if self.hasher.verify(secret, stored_hash)? {
            Ok(())
        } else {
            Err(AuthenticationError::InvalidCredentials)
        }
    }
}
