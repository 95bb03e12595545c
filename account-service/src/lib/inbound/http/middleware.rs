use axum::extract::Request;
use axum::extract::State;
use axum::http::StatusCode;
use axum::http::{self};
use axum::middleware::Next;
use axum::response::IntoResponse;
use axum::response::Response;
use axum::Json;
use serde_json::json;

use crate::account::models::Identifier;
use crate::inbound::http::router::AppState;

/// Extension type carrying the authenticated identity into handlers
#[derive(Debug, Clone)]
pub struct AuthenticatedAccount {
    pub identifier: Identifier,
}

/// Middleware guarding protected routes behind a bearer token.
///
/// Every failure mode collapses to 401; the reason stays in the server
/// log.
pub async fn authenticate(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, Response> {
    let token = extract_token_from_header(&req)?;

    let claims = state.authenticator.validate_token(token).map_err(|e| {
        tracing::warn!("Token validation failed: {}", e);
        unauthorized("Invalid or expired token")
    })?;

    // The audience claim carries the account identifier.
    let identifier = Identifier::new(&claims.aud).map_err(|e| {
        tracing::warn!("Token audience is not a valid identifier: {}", e);
        unauthorized("Invalid token")
    })?;

    req.extensions_mut()
        .insert(AuthenticatedAccount { identifier });

    Ok(next.run(req).await)
}

fn extract_token_from_header(req: &Request) -> Result<&str, Response> {
    let auth_header = req
        .headers()
        .get(http::header::AUTHORIZATION)
        .ok_or_else(|| unauthorized("Missing Authorization header"))?;

    let auth_str = auth_header
        .to_str()
        .map_err(|_| unauthorized("Invalid Authorization header"))?;

    auth_str
        .strip_prefix("Bearer ")
        .ok_or_else(|| unauthorized("Invalid Authorization header format. Expected: Bearer <token>"))
}

fn unauthorized(message: &str) -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({
            "error": message
        })),
    )
        .into_response()
}
