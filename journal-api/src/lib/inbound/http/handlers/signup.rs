use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use thiserror::Error;

use super::ApiError;
use super::ApiSuccess;
use super::UserData;
use crate::domain::user::models::NewPassword;
use crate::domain::user::models::SignupCommand;
use crate::domain::user::models::Username;
use crate::inbound::http::router::AppState;
use crate::user::errors::PasswordPolicyError;
use crate::user::errors::UsernameError;

pub async fn signup(
    State(state): State<AppState>,
    Json(body): Json<SignupRequest>,
) -> Result<ApiSuccess<UserData>, ApiError> {
    let command = body.try_into_command()?;

    state
        .auth_gate
        .signup(command.username.as_str(), command.password.expose())
        .await
        .map_err(ApiError::from)
        .map(|ref user| ApiSuccess::new(StatusCode::CREATED, user.into()))
}

/// HTTP request body for registering a user (raw JSON)
#[derive(Clone, Deserialize)]
pub struct SignupRequest {
    username: String,
    password: String,
}

#[derive(Debug, Clone, Error)]
enum ParseSignupRequestError {
    #[error("Invalid username: {0}")]
    Username(#[from] UsernameError),

    #[error("Invalid password: {0}")]
    Password(#[from] PasswordPolicyError),
}

impl SignupRequest {
    fn try_into_command(self) -> Result<SignupCommand, ParseSignupRequestError> {
        let username = Username::new(self.username)?;
        let password = NewPassword::new(self.password)?;
        Ok(SignupCommand::new(username, password))
    }
}

impl From<ParseSignupRequestError> for ApiError {
    fn from(err: ParseSignupRequestError) -> Self {
        ApiError::UnprocessableEntity(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(username: &str, password: &str) -> SignupRequest {
        SignupRequest {
            username: username.to_string(),
            password: password.to_string(),
        }
    }

    #[test]
    fn test_valid_request() {
        let command = request("alice", "pass_word!").try_into_command().unwrap();
        assert_eq!(command.username.as_str(), "alice");
        assert_eq!(command.password.expose(), "pass_word!");
    }

    #[test]
    fn test_invalid_request_is_unprocessable() {
        for (username, password) in [("al", "pass_word!"), ("alice", "abc"), ("a b c", "pass")] {
            let err = request(username, password).try_into_command().unwrap_err();
            assert!(matches!(
                ApiError::from(err),
                ApiError::UnprocessableEntity(_)
            ));
        }
    }
}
