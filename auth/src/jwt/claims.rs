use std::fmt;

use chrono::Duration;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;
use uuid::Uuid;

/// Which half of a token pair a JWT is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    Access,
    Refresh,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::Access => f.write_str("access"),
            TokenKind::Refresh => f.write_str("refresh"),
        }
    }
}

/// Payload carried by both access and refresh tokens.
///
/// `sub` and `email` identify the principal. `jti` is random per token so two
/// tokens minted for the same user within the same second still differ.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenClaims {
    /// Subject (user identifier)
    pub sub: String,

    pub email: String,

    pub kind: TokenKind,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration time (Unix timestamp)
    pub exp: i64,

    /// JWT ID
    pub jti: String,
}

impl TokenClaims {
    /// Build claims issued now and expiring after `ttl`.
    pub fn issue(subject: impl ToString, email: impl ToString, kind: TokenKind, ttl: Duration) -> Self {
        let now = Utc::now();

        Self {
            sub: subject.to_string(),
            email: email.to_string(),
            kind,
            iat: now.timestamp(),
            exp: (now + ttl).timestamp(),
            jti: Uuid::new_v4().to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_issue_sets_lifetime() {
        let claims = TokenClaims::issue("user123", "a@x.com", TokenKind::Access, Duration::minutes(15));

        assert_eq!(claims.sub, "user123");
        assert_eq!(claims.email, "a@x.com");
        assert_eq!(claims.kind, TokenKind::Access);
        assert_eq!(claims.exp - claims.iat, 15 * 60);
    }

    #[test]
    fn test_issue_generates_unique_jti() {
        let first = TokenClaims::issue("user123", "a@x.com", TokenKind::Refresh, Duration::minutes(135));
        let second = TokenClaims::issue("user123", "a@x.com", TokenKind::Refresh, Duration::minutes(135));

        assert_ne!(first.jti, second.jti);
    }

    #[test]
    fn test_kind_serializes_lowercase() {
        let json = serde_json::to_string(&TokenKind::Refresh).unwrap();
        assert_eq!(json, "\"refresh\"");
    }
}
