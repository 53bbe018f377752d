pub mod claims;
pub mod errors;
pub mod handler;
pub mod verifier;

pub use claims::TokenClaims;
pub use claims::TokenKind;
pub use errors::JwtError;
pub use handler::JwtHandler;
pub use verifier::verify_access_token;
pub use verifier::verify_refresh_token;
pub use verifier::AccessTokenVerifier;
pub use verifier::RefreshTokenVerifier;
pub use verifier::TokenVerifier;
