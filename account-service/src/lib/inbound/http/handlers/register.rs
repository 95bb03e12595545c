use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

use super::ApiError;
use super::ApiSuccess;
use crate::account::errors::EmailError;
use crate::account::errors::IdentifierError;
use crate::account::models::Account;
use crate::account::models::EmailAddress;
use crate::account::models::Identifier;
use crate::account::models::RegisterAccountCommand;
use crate::account::ports::AccountServicePort;
use crate::inbound::http::router::AppState;

pub async fn register(
    State(state): State<AppState>,
    Json(body): Json<RegisterRequestBody>,
) -> Result<ApiSuccess<RegisterResponseData>, ApiError> {
    state
        .account_service
        .register(body.try_into_command()?)
        .await
        .map_err(ApiError::from)
        .map(|ref account| ApiSuccess::new(StatusCode::CREATED, account.into()))
}

/// HTTP request body for registering an account (raw JSON)
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RegisterRequestBody {
    identifier: String,
    email: String,
    password: String,
    display_name: String,
}

#[derive(Debug, Clone, Error)]
enum ParseRegisterRequestError {
    #[error("Invalid identifier: {0}")]
    Identifier(#[from] IdentifierError),

    #[error("Invalid email: {0}")]
    Email(#[from] EmailError),
}

impl RegisterRequestBody {
    // Field validation happens here, before the service or its storage
    // collaborator are ever reached.
    fn try_into_command(self) -> Result<RegisterAccountCommand, ParseRegisterRequestError> {
        let identifier = Identifier::new(&self.identifier)?;
        let email = EmailAddress::new(self.email)?;
        Ok(RegisterAccountCommand::new(
            identifier,
            email,
            self.display_name,
            self.password,
        ))
    }
}

impl From<ParseRegisterRequestError> for ApiError {
    fn from(err: ParseRegisterRequestError) -> Self {
        ApiError::BadRequest(err.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RegisterResponseData {
    pub account_url: String,
}

impl From<&Account> for RegisterResponseData {
    fn from(account: &Account) -> Self {
        Self {
            account_url: format!("/api/v1/accounts/{}", account.identifier),
        }
    }
}
