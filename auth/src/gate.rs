use std::future::Future;
use std::sync::Arc;

use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;

use crate::errors::AuthError;
use crate::identity::Credential;
use crate::identity::Identity;
use crate::identity::IdentityProvider;
use crate::jwt::Claims;
use crate::jwt::IssuedToken;
use crate::jwt::TokenCodec;
use crate::jwt::TokenError;
use crate::password::PasswordHasher;
use crate::revocation::RevocationRecord;
use crate::revocation::RevocationStore;

/// Default upper bound on a single store or identity lookup call.
pub const DEFAULT_STORE_TIMEOUT: std::time::Duration = std::time::Duration::from_secs(2);

/// Result of a successful login.
#[derive(Debug, Clone)]
pub struct LoginOutcome<U> {
    pub user: U,
    pub token: IssuedToken,
}

/// Authentication coordinator.
///
/// Combines password hashing, token signing, the revocation store and the
/// service's identity lookup to answer who is making a request and whether
/// their token is still good. Holds no lock across store calls; every store
/// call is bounded by `store_timeout` and fails closed.
pub struct AuthGate<IP, RS>
where
    IP: IdentityProvider,
    RS: RevocationStore,
{
    password_hasher: PasswordHasher,
    token_codec: TokenCodec,
    identities: Arc<IP>,
    revocations: Arc<RS>,
    token_ttl: Duration,
    store_timeout: std::time::Duration,
}

impl<IP, RS> AuthGate<IP, RS>
where
    IP: IdentityProvider,
    RS: RevocationStore,
{
    /// Create a new gate with injected dependencies.
    ///
    /// # Arguments
    /// * `password_hasher` - Hasher configured with the process cost parameters
    /// * `token_codec` - Codec holding the signing secret
    /// * `identities` - User lookup collaborator
    /// * `revocations` - Revocation store shared by all instances
    /// * `token_ttl` - Lifetime of issued access tokens
    pub fn new(
        password_hasher: PasswordHasher,
        token_codec: TokenCodec,
        identities: Arc<IP>,
        revocations: Arc<RS>,
        token_ttl: Duration,
    ) -> Self {
        Self {
            password_hasher,
            token_codec,
            identities,
            revocations,
            token_ttl,
            store_timeout: DEFAULT_STORE_TIMEOUT,
        }
    }

    pub fn with_store_timeout(mut self, store_timeout: std::time::Duration) -> Self {
        self.store_timeout = store_timeout;
        self
    }

    /// Register a new account.
    ///
    /// # Errors
    /// * `DuplicateUser` - Username already taken
    /// * `StoreUnavailable` - Identity store unreachable or timed out
    pub async fn signup(&self, username: &str, password: &str) -> Result<IP::User, AuthError> {
        if self
            .guarded(self.identities.exists_by_username(username))
            .await?
        {
            return Err(AuthError::DuplicateUser);
        }

        let password_hash = self.hash_password(password).await?;

        let user = self
            .guarded(self.identities.create_user(Credential {
                username: username.to_string(),
                password_hash,
            }))
            .await?;

        tracing::info!(subject_id = %user.subject_id(), "User registered");
        Ok(user)
    }

    /// Check credentials and issue an access token.
    ///
    /// Unknown usernames and wrong passwords are indistinguishable to the caller.
    ///
    /// # Errors
    /// * `InvalidCredentials` - No such user or password mismatch
    /// * `StoreUnavailable` - Identity store unreachable or timed out
    pub async fn login(
        &self,
        username: &str,
        password: &str,
        now: DateTime<Utc>,
    ) -> Result<LoginOutcome<IP::User>, AuthError> {
        let user = self
            .guarded(self.identities.find_by_username(username))
            .await?;

        let Some(user) = user else {
            self.burn_verification(password).await?;
            tracing::warn!(reason = "unknown_user", "Login rejected");
            return Err(AuthError::InvalidCredentials);
        };

        if !self.verify_password(password, user.password_hash()).await? {
            tracing::warn!(reason = "password_mismatch", "Login rejected");
            return Err(AuthError::InvalidCredentials);
        }

        let token = self
            .token_codec
            .issue(&user.subject_id(), now, self.token_ttl)?;

        tracing::info!(subject_id = %user.subject_id(), "Access token issued");
        Ok(LoginOutcome { user, token })
    }

    /// Verify signature and expiry only, without consulting revocations.
    pub fn verify_token(&self, raw_token: &str, now: DateTime<Utc>) -> Result<Claims, AuthError> {
        Ok(self.token_codec.verify(raw_token, now)?)
    }

    /// Resolve the user behind a bearer token.
    ///
    /// # Errors
    /// * `Malformed` / `SignatureInvalid` / `Expired` - Token rejected by the codec
    /// * `Revoked` - Token was logged out
    /// * `UserNotFound` - Subject no longer exists
    /// * `StoreUnavailable` - Revocation or identity store unreachable
    pub async fn authenticate(
        &self,
        raw_token: &str,
        now: DateTime<Utc>,
    ) -> Result<IP::User, AuthError> {
        let claims = self.token_codec.verify(raw_token, now)?;

        if self
            .guarded(self.revocations.is_revoked(&claims.jti))
            .await?
        {
            return Err(AuthError::Revoked);
        }

        self.guarded(self.identities.find_by_subject_id(&claims.sub))
            .await?
            .ok_or(AuthError::UserNotFound)
    }

    /// Revoke a token before its natural expiry.
    ///
    /// An already expired token is unusable anyway, so logging it out succeeds
    /// without touching the store.
    ///
    /// # Errors
    /// * `Malformed` / `SignatureInvalid` - Token rejected by the codec
    /// * `StoreUnavailable` - Revocation store unreachable
    pub async fn logout(&self, raw_token: &str, now: DateTime<Utc>) -> Result<(), AuthError> {
        let claims = match self.token_codec.verify(raw_token, now) {
            Ok(claims) => claims,
            Err(TokenError::Expired) => {
                tracing::debug!("Logout of expired token ignored");
                return Ok(());
            }
            Err(e) => return Err(e.into()),
        };

        self.guarded(
            self.revocations
                .revoke(&RevocationRecord::from_claims(&claims)),
        )
        .await?;

        tracing::info!(subject_id = %claims.sub, "Token revoked");
        Ok(())
    }

    async fn guarded<T, E>(
        &self,
        operation: impl Future<Output = Result<T, E>>,
    ) -> Result<T, AuthError>
    where
        AuthError: From<E>,
    {
        match tokio::time::timeout(self.store_timeout, operation).await {
            Ok(result) => result.map_err(AuthError::from),
            Err(_) => {
                tracing::error!(
                    timeout_ms = self.store_timeout.as_millis() as u64,
                    "Store call timed out"
                );
                Err(AuthError::StoreUnavailable)
            }
        }
    }

    // Argon2 is CPU-bound; keep it off the async workers.
    async fn hash_password(&self, password: &str) -> Result<String, AuthError> {
        let hasher = self.password_hasher.clone();
        let password = password.to_owned();

        tokio::task::spawn_blocking(move || hasher.hash(&password))
            .await
            .map_err(|e| AuthError::Internal(e.to_string()))?
            .map_err(AuthError::from)
    }

    async fn verify_password(&self, password: &str, hash: &str) -> Result<bool, AuthError> {
        let hasher = self.password_hasher.clone();
        let password = password.to_owned();
        let hash = hash.to_owned();

        tokio::task::spawn_blocking(move || hasher.verify(&password, &hash))
            .await
            .map_err(|e| AuthError::Internal(e.to_string()))
    }

    async fn burn_verification(&self, password: &str) -> Result<(), AuthError> {
        let hasher = self.password_hasher.clone();
        let password = password.to_owned();

        tokio::task::spawn_blocking(move || hasher.verify_dummy(&password))
            .await
            .map_err(|e| AuthError::Internal(e.to_string()))
    }
}
