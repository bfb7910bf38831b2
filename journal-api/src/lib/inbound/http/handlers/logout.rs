use axum::extract::State;
use axum::http::StatusCode;
use chrono::Utc;

use super::ApiError;
use crate::inbound::http::middleware::BearerToken;
use crate::inbound::http::router::AppState;

/// Revoke the presented token. Logging out an already expired token succeeds.
pub async fn logout(
    State(state): State<AppState>,
    BearerToken(token): BearerToken,
) -> Result<StatusCode, ApiError> {
    state.auth_gate.logout(&token, Utc::now()).await?;

    Ok(StatusCode::NO_CONTENT)
}
