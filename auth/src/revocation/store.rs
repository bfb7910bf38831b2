use async_trait::async_trait;
use chrono::DateTime;
use chrono::Utc;
use thiserror::Error;

use crate::jwt::Claims;

/// Error for revocation store operations.
#[derive(Debug, Clone, Error)]
pub enum RevocationError {
    #[error("Revocation store unavailable: {0}")]
    Unavailable(String),
}

/// A revoked token, keyed by its token id.
///
/// `expires_at` is always the revoked token's own expiry, so the record can be
/// dropped once that instant has passed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RevocationRecord {
    pub token_id: String,
    pub subject_id: String,
    pub expires_at: DateTime<Utc>,
}

impl RevocationRecord {
    pub fn from_claims(claims: &Claims) -> Self {
        Self {
            token_id: claims.jti.clone(),
            subject_id: claims.sub.clone(),
            expires_at: claims.expires_at(),
        }
    }
}

/// Durable record of revoked token ids.
///
/// Implementations must be safe under concurrent `revoke`/`is_revoked`/`gc`
/// from many callers and, when several service instances share a signing
/// secret, must give read-your-writes visibility across all of them.
#[async_trait]
pub trait RevocationStore: Send + Sync + 'static {
    /// Mark a token id as revoked.
    ///
    /// # Arguments
    /// * `record` - Token id, subject and the token's original expiry
    ///
    /// # Returns
    /// Unit on success; revoking an already revoked id is also a success
    /// and never extends the stored expiry
    ///
    /// # Errors
    /// * `Unavailable` - Store could not be reached
    async fn revoke(&self, record: &RevocationRecord) -> Result<(), RevocationError>;

    /// Check whether a token id has been revoked.
    ///
    /// # Errors
    /// * `Unavailable` - Store could not be reached; callers must fail closed
    async fn is_revoked(&self, token_id: &str) -> Result<bool, RevocationError>;

    /// Remove every record with `expires_at <= now`.
    ///
    /// # Returns
    /// Number of records removed
    ///
    /// # Errors
    /// * `Unavailable` - Store could not be reached
    async fn gc(&self, now: DateTime<Utc>) -> Result<u64, RevocationError>;
}
