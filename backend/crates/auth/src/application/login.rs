//! Login Use Case
//!
//! Authenticates an email/password pair and creates a session.
//!
//! The session record is written to the store before the token is handed
//! back, so a token the client holds always has a matching server-side
//! record. Malformed email, unknown email, and wrong password all surface
//! as the same [`AuthError::InvalidCredentials`].

use std::sync::Arc;

use chrono::{DateTime, Utc};
use platform::password::PlainPassword;
use platform::token::TokenSigner;

use crate::application::bounded;
use crate::application::config::AuthConfig;
use crate::domain::entity::Session;
use crate::domain::repository::{SessionStore, UserRepository};
use crate::domain::value_object::{Email, UserId};
use crate::error::{AuthError, AuthResult};

/// Login input
pub struct LoginInput {
    pub email: String,
    pub password: String,
}

/// An established session, as returned to the client
pub struct SessionHandle {
    /// Signed bearer token
    pub token: String,
    pub user_id: UserId,
    pub user_name: String,
    pub expires_at: DateTime<Utc>,
}

/// Login use case
pub struct LoginUseCase<U, S>
where
    U: UserRepository,
    S: SessionStore,
{
    users: Arc<U>,
    sessions: Arc<S>,
    signer: Arc<TokenSigner>,
    config: Arc<AuthConfig>,
}

impl<U, S> LoginUseCase<U, S>
where
    U: UserRepository,
    S: SessionStore,
{
    pub fn new(
        users: Arc<U>,
        sessions: Arc<S>,
        signer: Arc<TokenSigner>,
        config: Arc<AuthConfig>,
    ) -> Self {
        Self {
            users,
            sessions,
            signer,
            config,
        }
    }

    pub async fn execute(&self, input: LoginInput) -> AuthResult<SessionHandle> {
        let email = Email::new(&input.email).map_err(|_| AuthError::InvalidCredentials)?;

        let user = bounded(self.config.store_timeout, self.users.find_by_email(&email))
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        // The stored hash must be checked even against guesses that violate
        // the current policy, hence no validation here
        let password = PlainPassword::new_unchecked(input.password);
        if !user.password_hash.verify(&password) {
            return Err(AuthError::InvalidCredentials);
        }

        let ttl = chrono::Duration::from_std(self.config.session_ttl)
            .map_err(|e| AuthError::Internal(e.to_string()))?;
        let expires_at = Utc::now() + ttl;

        let issued = self.signer.issue(*user.user_id.as_uuid(), expires_at)?;

        let session = Session::new(
            issued.claims.jti.clone(),
            user.user_id,
            DateTime::from_timestamp(issued.claims.iat, 0).unwrap_or_else(Utc::now),
            issued.claims.expires_at(),
        );

        // Ordering matters: the record must exist before the token leaves
        // the server
        bounded(self.config.store_timeout, self.sessions.put(&session)).await?;

        tracing::info!(
            user_id = %user.user_id,
            expires_at = %session.expires_at,
            "User logged in"
        );

        Ok(SessionHandle {
            token: issued.token,
            user_id: user.user_id,
            user_name: user.user_name.original().to_string(),
            expires_at: session.expires_at,
        })
    }
}
