use thiserror::Error;

/// Error for UserId parsing failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum UserIdError {
    #[error("Invalid UUID format: {0}")]
    InvalidFormat(String),
}

/// Error for EmailAddress validation failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum EmailError {
    #[error("Invalid email format: {0}")]
    InvalidFormat(String),
}

/// Failures surfaced by a credential store adapter.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CredentialStoreError {
    #[error("Email already exists: {0}")]
    DuplicateEmail(String),

    #[error("User not found: {0}")]
    NotFound(String),

    #[error("Credential store failure: {0}")]
    Backend(String),
}

/// Top-level error for all session operations
#[derive(Debug, Clone, Error)]
pub enum AuthError {
    #[error("Invalid email: {0}")]
    InvalidEmail(#[from] EmailError),

    #[error("User already exists: {0}")]
    AlreadyExists(String),

    /// Deliberately identical for every rejected credential or session
    #[error("Invalid credentials")]
    InvalidCredentials,

    // Infrastructure errors
    #[error("Hashing failed: {0}")]
    Hash(#[from] auth::HashError),

    #[error("Token issuance failed: {0}")]
    Token(#[from] auth::JwtError),

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Unknown error: {0}")]
    Unknown(String),
}

impl From<CredentialStoreError> for AuthError {
    fn from(err: CredentialStoreError) -> Self {
        match err {
            CredentialStoreError::DuplicateEmail(email) => AuthError::AlreadyExists(email),
            CredentialStoreError::NotFound(_) | CredentialStoreError::Backend(_) => {
                AuthError::DatabaseError(err.to_string())
            }
        }
    }
}

impl From<auth::AuthenticationError> for AuthError {
    fn from(err: auth::AuthenticationError) -> Self {
        match err {
            auth::AuthenticationError::InvalidCredentials => AuthError::InvalidCredentials,
            auth::AuthenticationError::HashError(e) => AuthError::Hash(e),
        }
    }
}
