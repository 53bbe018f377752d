use super::claims::TokenClaims;
use super::claims::TokenKind;
use super::errors::JwtError;
use super::handler::JwtHandler;

/// Verification capability for one kind of token.
///
/// Implementations own the key for their kind, so a token signed with the
/// other kind's secret fails the signature check. The `kind` claim is checked
/// as well.
pub trait TokenVerifier: Send + Sync {
    /// Kind of token this verifier accepts.
    fn kind(&self) -> TokenKind;

    fn handler(&self) -> &JwtHandler;

    /// Check signature and expiry, then the `kind` claim.
    ///
    /// # Errors
    /// * `TokenExpired` - Token lifetime has elapsed
    /// * `InvalidToken` - Bad signature or malformed token
    /// * `WrongKind` - Token is valid but of the other kind
    fn verify(&self, token: &str) -> Result<TokenClaims, JwtError> {
        let claims: TokenClaims = self.handler().decode(token)?;

        if claims.kind != self.kind() {
            return Err(JwtError::WrongKind {
                expected: self.kind(),
                found: claims.kind,
            });
        }

        Ok(claims)
    }
}

#[derive(Clone)]
pub struct AccessTokenVerifier {
    handler: JwtHandler,
}

impl AccessTokenVerifier {
    pub fn new(secret: &[u8]) -> Self {
        Self {
            handler: JwtHandler::new(secret),
        }
    }
}

impl TokenVerifier for AccessTokenVerifier {
    fn kind(&self) -> TokenKind {
        TokenKind::Access
    }

    fn handler(&self) -> &JwtHandler {
        &self.handler
    }
}

#[derive(Clone)]
pub struct RefreshTokenVerifier {
    handler: JwtHandler,
}

impl RefreshTokenVerifier {
    pub fn new(secret: &[u8]) -> Self {
        Self {
            handler: JwtHandler::new(secret),
        }
    }
}

impl TokenVerifier for RefreshTokenVerifier {
    fn kind(&self) -> TokenKind {
        TokenKind::Refresh
    }

    fn handler(&self) -> &JwtHandler {
        &self.handler
    }
}

/// Verify an access token signed with `secret`.
pub fn verify_access_token(secret: &[u8], token: &str) -> Result<TokenClaims, JwtError> {
    AccessTokenVerifier::new(secret).verify(token)
}

/// Verify a refresh token signed with `secret`.
pub fn verify_refresh_token(secret: &[u8], token: &str) -> Result<TokenClaims, JwtError> {
    RefreshTokenVerifier::new(secret).verify(token)
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::*;

    const ACCESS_SECRET: &[u8] = b"access_secret_at_least_32_bytes_long!";
    const REFRESH_SECRET: &[u8] = b"refresh_secret_at_least_32_bytes_long";

    fn sign(secret: &[u8], kind: TokenKind, ttl: Duration) -> String {
        let claims = TokenClaims::issue("user123", "a@x.com", kind, ttl);
        JwtHandler::new(secret).encode(&claims).unwrap()
    }

    #[test]
    fn test_verify_access_token() {
        let token = sign(ACCESS_SECRET, TokenKind::Access, Duration::minutes(15));

        let claims = verify_access_token(ACCESS_SECRET, &token).expect("Failed to verify");
        assert_eq!(claims.sub, "user123");
        assert_eq!(claims.email, "a@x.com");
        assert_eq!(claims.kind, TokenKind::Access);
    }

    #[test]
    fn test_verify_refresh_token() {
        let token = sign(REFRESH_SECRET, TokenKind::Refresh, Duration::minutes(135));

        let claims = verify_refresh_token(REFRESH_SECRET, &token).expect("Failed to verify");
        assert_eq!(claims.kind, TokenKind::Refresh);
    }

    #[test]
    fn test_refresh_token_rejected_as_access_token() {
        let token = sign(REFRESH_SECRET, TokenKind::Refresh, Duration::minutes(135));

        let result = verify_access_token(ACCESS_SECRET, &token);
        assert!(matches!(result, Err(JwtError::InvalidToken(_))));
    }

    #[test]
    fn test_access_token_rejected_as_refresh_token() {
        let token = sign(ACCESS_SECRET, TokenKind::Access, Duration::minutes(15));

        let result = verify_refresh_token(REFRESH_SECRET, &token);
        assert!(matches!(result, Err(JwtError::InvalidToken(_))));
    }

    #[test]
    fn test_wrong_kind_with_shared_secret() {
        let token = sign(ACCESS_SECRET, TokenKind::Refresh, Duration::minutes(135));

        let result = verify_access_token(ACCESS_SECRET, &token);
        assert_eq!(
            result,
            Err(JwtError::WrongKind {
                expected: TokenKind::Access,
                found: TokenKind::Refresh,
            })
        );
    }

    #[test]
    fn test_expired_token() {
        let token = sign(ACCESS_SECRET, TokenKind::Access, Duration::hours(-2));

        let result = verify_access_token(ACCESS_SECRET, &token);
        assert_eq!(result, Err(JwtError::TokenExpired));
    }
}
