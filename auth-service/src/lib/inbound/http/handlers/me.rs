use axum::http::StatusCode;
use axum::Extension;
use serde::Serialize;

use super::ApiSuccess;
use crate::inbound::http::middleware::Principal;

/// Echo the identity carried by the access token. Does not touch the store.
pub async fn me(Extension(principal): Extension<Principal>) -> ApiSuccess<MeResponseData> {
    ApiSuccess::new(StatusCode::OK, (&principal).into())
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MeResponseData {
    pub id: String,
    pub email: String,
}

impl From<&Principal> for MeResponseData {
    fn from(principal: &Principal) -> Self {
        Self {
            id: principal.user_id.to_string(),
            email: principal.email.clone(),
        }
    }
}
