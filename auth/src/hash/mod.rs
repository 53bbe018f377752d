pub mod argon2id;
pub mod errors;

pub use argon2id::SecretHasher;
pub use errors::HashError;
