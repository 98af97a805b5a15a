//! Change Password Use Case
//!
//! Replaces the password of an authenticated user after re-verifying the
//! current one.

use std::sync::Arc;

use platform::password::PlainPassword;

use crate::application::bounded;
use crate::application::config::AuthConfig;
use crate::domain::repository::UserRepository;
use crate::domain::value_object::UserId;
use crate::error::{AuthError, AuthResult};

/// Change password use case
pub struct ChangePasswordUseCase<U>
where
    U: UserRepository,
{
    users: Arc<U>,
    config: Arc<AuthConfig>,
}

impl<U> ChangePasswordUseCase<U>
where
    U: UserRepository,
{
    pub fn new(users: Arc<U>, config: Arc<AuthConfig>) -> Self {
        Self { users, config }
    }

    pub async fn execute(
        &self,
        user_id: &UserId,
        current_password: String,
        new_password: String,
    ) -> AuthResult<()> {
        let limit = self.config.store_timeout;

        let user = bounded(limit, self.users.find_by_id(user_id))
            .await?
            .ok_or(AuthError::Unauthenticated)?;

        let current = PlainPassword::new_unchecked(current_password);
        if !user.password_hash.verify(&current) {
            return Err(AuthError::InvalidCredentials);
        }

        // The new password does go through the policy
        let new = PlainPassword::new(new_password)
            .map_err(|e| AuthError::Validation(e.to_string()))?;
        let new_hash = new.hash().map_err(|e| AuthError::Internal(e.to_string()))?;

        bounded(limit, self.users.update_password(user_id, &new_hash)).await?;

        tracing::info!(user_id = %user_id, "Password changed");

        Ok(())
    }
}
