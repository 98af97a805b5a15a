//! Register Use Case
//!
//! Creates a new user account. Registration does not issue a session; the
//! client logs in afterwards.

use std::sync::Arc;

use platform::password::PlainPassword;

use crate::application::bounded;
use crate::application::config::AuthConfig;
use crate::domain::entity::User;
use crate::domain::repository::UserRepository;
use crate::domain::value_object::{Email, UserId, UserName};
use crate::error::{AuthError, AuthResult};

/// Registration input
pub struct RegisterInput {
    pub email: String,
    pub user_name: String,
    pub password: String,
    pub phone_number: Option<String>,
    pub photo_url: Option<String>,
    pub is_private: bool,
}

/// Registration output
pub struct RegisterOutput {
    pub user_id: UserId,
}

/// Register use case
pub struct RegisterUseCase<U>
where
    U: UserRepository,
{
    users: Arc<U>,
    config: Arc<AuthConfig>,
}

impl<U> RegisterUseCase<U>
where
    U: UserRepository,
{
    pub fn new(users: Arc<U>, config: Arc<AuthConfig>) -> Self {
        Self { users, config }
    }

    pub async fn execute(&self, input: RegisterInput) -> AuthResult<RegisterOutput> {
        let email =
            Email::new(&input.email).map_err(|e| AuthError::Validation(e.to_string()))?;
        let user_name =
            UserName::new(&input.user_name).map_err(|e| AuthError::Validation(e.to_string()))?;
        let password =
            PlainPassword::new(input.password).map_err(|e| AuthError::Validation(e.to_string()))?;

        let limit = self.config.store_timeout;

        // Early duplicate checks for a friendlier error; the unique indexes
        // remain the source of truth under concurrent registration
        if bounded(limit, self.users.find_by_email(&email))
            .await?
            .is_some()
        {
            return Err(AuthError::AlreadyExists);
        }
        if bounded(limit, self.users.find_by_user_name(&user_name))
            .await?
            .is_some()
        {
            return Err(AuthError::AlreadyExists);
        }

        let password_hash = password
            .hash()
            .map_err(|e| AuthError::Internal(e.to_string()))?;

        let user = User::new(
            user_name,
            email,
            password_hash,
            input.phone_number,
            input.photo_url,
            input.is_private,
        );

        let user_id = bounded(limit, self.users.insert(&user)).await?;

        tracing::info!(user_id = %user_id, "User registered");

        Ok(RegisterOutput { user_id })
    }
}
