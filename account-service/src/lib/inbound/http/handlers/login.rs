use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use crate::account::ports::AccountServicePort;
use crate::inbound::http::router::AppState;

pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequestBody>,
) -> Result<ApiSuccess<LoginResponseData>, ApiError> {
    state
        .account_service
        .login(&body.identifier, &body.password)
        .await
        .map_err(ApiError::from)
        .map(|outcome| {
            ApiSuccess::new(
                StatusCode::OK,
                LoginResponseData {
                    token: outcome.token,
                },
            )
        })
}

/// HTTP request body for logging in. The identifier field also accepts
/// the account's email address.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoginRequestBody {
    identifier: String,
    password: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoginResponseData {
    pub token: String,
}
