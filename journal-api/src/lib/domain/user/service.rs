use std::sync::Arc;

use async_trait::async_trait;
use auth::Credential;
use auth::IdentityError;
use auth::IdentityProvider;
use chrono::Utc;

use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::domain::user::models::Username;
use crate::user::ports::UserRepository;

/// Domain service implementation for user lookup and registration.
///
/// Adapts the user repository to the identity collaborator expected by the
/// authentication gate.
pub struct UserService<UR>
where
    UR: UserRepository,
{
    repository: Arc<UR>,
}

impl<UR> UserService<UR>
where
    UR: UserRepository,
{
    /// Create a new user service with injected dependencies.
    ///
    /// # Arguments
    /// * `repository` - User persistence implementation
    pub fn new(repository: Arc<UR>) -> Self {
        Self { repository }
    }
}

#[async_trait]
impl<UR> IdentityProvider for UserService<UR>
where
    UR: UserRepository,
{
    type User = User;

    async fn find_by_subject_id(&self, subject_id: &str) -> Result<Option<User>, IdentityError> {
        let Ok(id) = UserId::from_string(subject_id) else {
            tracing::warn!("Token subject is not a user id");
            return Ok(None);
        };

        Ok(self.repository.find_by_id(&id).await?)
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, IdentityError> {
        // A name that fails validation cannot belong to any stored user.
        let Ok(username) = Username::new(username.to_string()) else {
            return Ok(None);
        };

        Ok(self.repository.find_by_username(&username).await?)
    }

    async fn exists_by_username(&self, username: &str) -> Result<bool, IdentityError> {
        let Ok(username) = Username::new(username.to_string()) else {
            return Ok(false);
        };

        Ok(self.repository.exists_by_username(&username).await?)
    }

    async fn create_user(&self, credential: Credential) -> Result<User, IdentityError> {
        let username =
            Username::new(credential.username).map_err(|e| IdentityError::Rejected(e.to_string()))?;

        let user = User {
            id: UserId::new(),
            username,
            password_hash: credential.password_hash,
            created_at: Utc::now(),
        };

        let created_user = self.repository.create(user).await?;

        tracing::info!(user_id = %created_user.id, "User created");
        Ok(created_user)
    }
}
