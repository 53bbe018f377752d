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

pub async fn signup(
    State(state): State<AppState>,
    Json(body): Json<CredentialsRequestBody>,
) -> Result<ApiSuccess<TokenPairResponseData>, ApiError> {
    let credentials = body.try_into_credentials().map_err(AuthError::from)?;

    state
        .token_service
        .signup(credentials)
        .await
        .map_err(ApiError::from)
        .map(|tokens| ApiSuccess::new(StatusCode::CREATED, tokens.into()))
}
