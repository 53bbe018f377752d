use auth::JwtError;
use auth::TokenVerifier;
use axum::extract::Request;
use axum::extract::State;
use axum::http;
use axum::middleware::Next;
use axum::response::Response;

use super::handlers::ApiError;
use crate::domain::session::models::UserId;
use crate::inbound::http::router::AppState;

/// Identity proven by a verified token, stored in request extensions
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    pub user_id: UserId,
    pub email: String,
}

/// Plaintext refresh token from the Authorization header, for the rotation check
#[derive(Debug, Clone)]
pub struct PresentedRefreshToken(pub String);

/// Middleware that requires a valid access token and attaches its `Principal`
pub async fn require_access_token(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = extract_token_from_header(&req)?;
    let principal = authenticate(state.authenticator.access_verifier(), token)?;

    req.extensions_mut().insert(principal);

    Ok(next.run(req).await)
}

/// Middleware that requires a valid refresh token and attaches both its
/// `Principal` and the raw token
pub async fn require_refresh_token(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = extract_token_from_header(&req)?.to_string();
    let principal = authenticate(state.authenticator.refresh_verifier(), &token)?;

    req.extensions_mut().insert(principal);
    req.extensions_mut().insert(PresentedRefreshToken(token));

    Ok(next.run(req).await)
}

fn authenticate<V: TokenVerifier>(verifier: &V, token: &str) -> Result<Principal, ApiError> {
    let claims = verifier.verify(token).map_err(|e| {
        tracing::warn!(kind = %verifier.kind(), error = %e, "JWT validation failed");
        match e {
            JwtError::TokenExpired => ApiError::Unauthorized("Token expired".to_string()),
            _ => ApiError::Unauthorized("Invalid token".to_string()),
        }
    })?;

    let user_id = UserId::from_string(&claims.sub).map_err(|e| {
        tracing::error!("Failed to parse user ID from token: {}", e);
        ApiError::Unauthorized("Invalid token".to_string())
    })?;

    Ok(Principal {
        user_id,
        email: claims.email,
    })
}

fn extract_token_from_header(req: &Request) -> Result<&str, ApiError> {
    let auth_header = req
        .headers()
        .get(http::header::AUTHORIZATION)
        .ok_or_else(|| ApiError::Unauthorized("Missing Authorization header".to_string()))?;

    let auth_str = auth_header
        .to_str()
        .map_err(|_| ApiError::Unauthorized("Invalid Authorization header".to_string()))?;

    let invalid_format = || {
        ApiError::Unauthorized(
            "Invalid Authorization header format. Expected: Bearer <token>".to_string(),
        )
    };

    // Scheme is case-insensitive; surrounding whitespace is ignored
    let (scheme, token) = auth_str.trim().split_once(' ').ok_or_else(invalid_format)?;
    let token = token.trim();

    if !scheme.eq_ignore_ascii_case("bearer") || token.is_empty() {
        return Err(invalid_format());
    }

    Ok(token)
}

#[cfg(test)]
mod tests {
    use axum::body::Body;

    use super::*;

    fn request_with_authorization(value: &str) -> Request {
        http::Request::builder()
            .header(http::header::AUTHORIZATION, value)
            .body(Body::empty())
            .unwrap()
    }

    #[test]
    fn test_extract_token_accepts_any_scheme_case() {
        for value in ["Bearer abc.def.ghi", "bearer abc.def.ghi", "BEARER abc.def.ghi"] {
            let req = request_with_authorization(value);
            assert_eq!(extract_token_from_header(&req), Ok("abc.def.ghi"));
        }
    }

    #[test]
    fn test_extract_token_trims_whitespace() {
        let req = request_with_authorization("  Bearer   abc.def.ghi  ");
        assert_eq!(extract_token_from_header(&req), Ok("abc.def.ghi"));
    }

    #[test]
    fn test_extract_token_rejects_other_schemes() {
        for value in ["Basic dXNlcjpwYXNz", "Bearer", "Bearer   ", "abc.def.ghi"] {
            let req = request_with_authorization(value);
            assert!(matches!(
                extract_token_from_header(&req),
                Err(ApiError::Unauthorized(_))
            ));
        }
    }

    #[test]
    fn test_extract_token_missing_header() {
        let req = http::Request::builder().body(Body::empty()).unwrap();
        assert_eq!(
            extract_token_from_header(&req),
            Err(ApiError::Unauthorized("Missing Authorization header".to_string()))
        );
    }
}
