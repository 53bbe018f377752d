use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;

use super::ApiError;
use super::ApiSuccess;
use super::TokenPairResponseData;
use crate::domain::session::ports::TokenServicePort;
use crate::inbound::http::middleware::PresentedRefreshToken;
use crate::inbound::http::middleware::Principal;
use crate::inbound::http::router::AppState;

pub async fn refresh(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Extension(PresentedRefreshToken(refresh_token)): Extension<PresentedRefreshToken>,
) -> Result<ApiSuccess<TokenPairResponseData>, ApiError> {
    state
        .token_service
        .refresh(&principal.user_id, &refresh_token)
        .await
        .map_err(ApiError::from)
        .map(|tokens| ApiSuccess::new(StatusCode::OK, tokens.into()))
}
