use axum::extract::Path;
use axum::extract::State;
use axum::http::StatusCode;
use chrono::DateTime;
use chrono::Utc;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use crate::account::models::Account;
use crate::account::models::Identifier;
use crate::account::ports::AccountServicePort;
use crate::inbound::http::router::AppState;

pub async fn get_account(
    State(state): State<AppState>,
    Path(identifier): Path<String>,
) -> Result<ApiSuccess<GetAccountResponseData>, ApiError> {
    let identifier =
        Identifier::new(&identifier).map_err(|e| ApiError::BadRequest(e.to_string()))?;

    state
        .account_service
        .get_account(&identifier)
        .await
        .map_err(ApiError::from)
        .map(|ref account| ApiSuccess::new(StatusCode::OK, account.into()))
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GetAccountResponseData {
    pub identifier: String,
    pub display_name: String,
    pub created_at: DateTime<Utc>,
}

impl From<&Account> for GetAccountResponseData {
    fn from(account: &Account) -> Self {
        Self {
            identifier: account.identifier.to_string(),
            display_name: account.display_name.clone(),
            created_at: account.created_at,
        }
    }
}
