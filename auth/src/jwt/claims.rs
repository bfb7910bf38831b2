use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;
use uuid::Uuid;

/// Claims carried by an access token.
///
/// Timestamps are whole seconds since the Unix epoch, UTC. Every expiry
/// comparison in the crate goes through [`Claims::is_expired`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Claims {
    /// Subject (user identifier)
    pub sub: String,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration time (Unix timestamp)
    pub exp: i64,

    /// Token identifier, unique per issuance
    pub jti: String,
}

impl Claims {
    /// Create claims for a fresh token.
    ///
    /// `now` is truncated to whole seconds; `exp` is `iat + ttl`.
    /// The token id is a random UUID v4 (122 bits of entropy).
    pub fn issue(subject_id: impl ToString, now: DateTime<Utc>, ttl: Duration) -> Self {
        let iat = now.timestamp();

        Self {
            sub: subject_id.to_string(),
            iat,
            exp: iat + ttl.num_seconds(),
            jti: Uuid::new_v4().to_string(),
        }
    }

    /// A token is valid only while `now < exp`.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now.timestamp() >= self.exp
    }

    /// Expiry as an instant. Out-of-range values clamp to the nearest bound.
    pub fn expires_at(&self) -> DateTime<Utc> {
        DateTime::from_timestamp(self.exp, 0).unwrap_or(if self.exp > 0 {
            DateTime::<Utc>::MAX_UTC
        } else {
            DateTime::<Utc>::MIN_UTC
        })
    }
}
