use async_trait::async_trait;
use thiserror::Error;

/// Error reported by the identity collaborator.
#[derive(Debug, Clone, Error)]
pub enum IdentityError {
    #[error("User already exists")]
    Duplicate,

    #[error("Credential rejected: {0}")]
    Rejected(String),

    #[error("Identity store unavailable: {0}")]
    Unavailable(String),
}

/// New account to be persisted. The password is already hashed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credential {
    pub username: String,
    pub password_hash: String,
}

/// What the gate needs to know about a user record.
pub trait Identity: Send + Sync + 'static {
    /// Identifier carried in the token `sub` claim.
    fn subject_id(&self) -> String;

    /// Stored PHC password hash.
    fn password_hash(&self) -> &str;
}

/// User lookup and creation, owned by the service embedding the gate.
#[async_trait]
pub trait IdentityProvider: Send + Sync + 'static {
    type User: Identity;

    /// Resolve a token subject to a user.
    ///
    /// # Returns
    /// Optional user (None if the subject no longer exists)
    ///
    /// # Errors
    /// * `Unavailable` - Backing store could not be reached
    async fn find_by_subject_id(&self, subject_id: &str)
        -> Result<Option<Self::User>, IdentityError>;

    /// Look up a user by login name.
    ///
    /// # Errors
    /// * `Unavailable` - Backing store could not be reached
    async fn find_by_username(&self, username: &str) -> Result<Option<Self::User>, IdentityError>;

    /// Check whether a login name is taken.
    ///
    /// # Errors
    /// * `Unavailable` - Backing store could not be reached
    async fn exists_by_username(&self, username: &str) -> Result<bool, IdentityError>;

    /// Persist a new user.
    ///
    /// # Errors
    /// * `Duplicate` - Username taken (including a concurrent signup race)
    /// * `Rejected` - Credential fails the collaborator's own validation
    /// * `Unavailable` - Backing store could not be reached
    async fn create_user(&self, credential: Credential) -> Result<Self::User, IdentityError>;
}
