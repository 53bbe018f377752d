//! Authentication utilities library
//!
//! Provides the credential primitives behind the token service:
//! - One-way hashing of passwords and refresh tokens (Argon2id)
//! - JWT encoding and validation
//! - Per-kind token verifiers (access / refresh, distinct secrets)
//! - Token pair issuance
//!
//! # Examples
//!
//! ## Hashing
//! ```
//! use auth::SecretHasher;
//!
//! let hasher = SecretHasher::new();
//! let hash = hasher.hash("my_password").unwrap();
//! assert!(hasher.verify("my_password", &hash).unwrap());
//! ```
//!
//! ## Issuing and verifying a token pair
//! ```
//! use auth::{Authenticator, TokenVerifier};
//!
//! let auth = Authenticator::new(
//!     b"access_secret_at_least_32_bytes_long!",
//!     b"refresh_secret_at_least_32_bytes_long",
//! );
//!
//! let pair = auth.issue_pair("user123", "alice@example.com").unwrap();
//! let claims = auth.access_verifier().verify(&pair.access_token).unwrap();
//! assert_eq!(claims.sub, "user123");
//!
//! // A refresh token is not accepted where an access token is expected
//! assert!(auth.access_verifier().verify(&pair.refresh_token).is_err());
//! ```

pub mod authenticator;
pub mod hash;
pub mod jwt;

// Re-export commonly used items
pub use authenticator::AuthenticationError;
pub use authenticator::Authenticator;
pub use authenticator::TokenPair;
pub use hash::HashError;
pub use hash::SecretHasher;
pub use jwt::verify_access_token;
pub use jwt::verify_refresh_token;
pub use jwt::JwtError;
pub use jwt::JwtHandler;
pub use jwt::TokenClaims;
pub use jwt::TokenKind;
pub use jwt::TokenVerifier;
