use thiserror::Error;

/// Error type for one-way hashing operations.
#[derive(Debug, Clone, Error)]
pub enum HashError {
    #[error("Hashing failed: {0}")]
    HashingFailed(String),

    #[error("Stored hash is malformed: {0}")]
    MalformedHash(String),
}
