//! Logout Use Case
//!
//! Revokes a session by deleting its server-side record. The token itself
//! stays cryptographically valid until its expiry, but validation fails
//! once the record is gone.

use std::sync::Arc;

use platform::token::TokenSigner;

use crate::application::bounded;
use crate::application::config::AuthConfig;
use crate::domain::repository::SessionStore;
use crate::error::AuthResult;

/// Logout use case
pub struct LogoutUseCase<S>
where
    S: SessionStore,
{
    sessions: Arc<S>,
    signer: Arc<TokenSigner>,
    config: Arc<AuthConfig>,
}

impl<S> LogoutUseCase<S>
where
    S: SessionStore,
{
    pub fn new(sessions: Arc<S>, signer: Arc<TokenSigner>, config: Arc<AuthConfig>) -> Self {
        Self {
            sessions,
            signer,
            config,
        }
    }

    /// Revoke the session behind `token`. Idempotent: logging out an
    /// already-revoked session succeeds.
    pub async fn execute(&self, token: &str) -> AuthResult<()> {
        // Only a holder of a validly signed token may revoke its session
        let claims = self.signer.verify(token)?;

        bounded(self.config.store_timeout, self.sessions.delete(&claims.jti)).await?;

        tracing::info!(user_id = %claims.sub, "User logged out");

        Ok(())
    }
}
