use thiserror::Error;

use crate::identity::IdentityError;
use crate::jwt::TokenError;
use crate::password::PasswordError;
use crate::revocation::RevocationError;

/// Failure kinds surfaced by [`crate::AuthGate`].
///
/// Messages identify the kind only. The distinction between token failures is
/// for diagnostics; HTTP callers should collapse them into one response.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("User already exists")]
    DuplicateUser,

    #[error("Token is malformed")]
    Malformed,

    #[error("Token signature is invalid")]
    SignatureInvalid,

    #[error("Token is expired")]
    Expired,

    #[error("Token has been revoked")]
    Revoked,

    #[error("User not found")]
    UserNotFound,

    #[error("Authentication store unavailable")]
    StoreUnavailable,

    #[error("Internal authentication error: {0}")]
    Internal(String),
}

impl From<TokenError> for AuthError {
    fn from(err: TokenError) -> Self {
        match err {
            TokenError::Malformed => AuthError::Malformed,
            TokenError::SignatureInvalid => AuthError::SignatureInvalid,
            TokenError::Expired => AuthError::Expired,
            TokenError::EncodingFailed(msg) => AuthError::Internal(msg),
        }
    }
}

impl From<RevocationError> for AuthError {
    fn from(err: RevocationError) -> Self {
        tracing::error!(error = %err, "Revocation store call failed");
        AuthError::StoreUnavailable
    }
}

impl From<IdentityError> for AuthError {
    fn from(err: IdentityError) -> Self {
        match err {
            IdentityError::Duplicate => AuthError::DuplicateUser,
            IdentityError::Rejected(msg) => AuthError::Internal(msg),
            IdentityError::Unavailable(msg) => {
                tracing::error!(error = %msg, "Identity store call failed");
                AuthError::StoreUnavailable
            }
        }
    }
}

impl From<PasswordError> for AuthError {
    fn from(err: PasswordError) -> Self {
        AuthError::Internal(err.to_string())
    }
}
