use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;

use super::ApiError;
use super::ApiSuccess;
use super::CredentialsRequestBody;
use super::TokenPairResponseData;
use crate::domain::session::errors::AuthError;
use crate::domain::session::ports::TokenServicePort;
use crate::inbound::http::router::AppState;

pub async fn signin(
    State(state): State<AppState>,
    Json(body): Json<CredentialsRequestBody>,
) -> Result<ApiSuccess<TokenPairResponseData>, ApiError> {
    // A malformed email cannot belong to any user
    let credentials = body.try_into_credentials().map_err(|e| {
        tracing::warn!(error = %e, "Signin rejected: malformed email");
        AuthError::InvalidCredentials
    })?;

    state
        .token_service
        .signin(credentials)
        .await
        .map_err(ApiError::from)
        .map(|tokens| ApiSuccess::new(StatusCode::OK, tokens.into()))
}
