//! Validate Session Use Case
//!
//! Checks a bearer token and its server-side session record. Both must
//! hold: a cryptographically valid token whose session was revoked fails
//! exactly like a forged or expired one.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use platform::token::TokenSigner;

use crate::application::bounded;
use crate::application::config::AuthConfig;
use crate::domain::repository::SessionStore;
use crate::domain::value_object::UserId;
use crate::error::{AuthError, AuthResult};

/// A successfully validated session
#[derive(Debug, Clone)]
pub struct ValidatedSession {
    pub user_id: UserId,
    pub expires_at: DateTime<Utc>,
}

/// Validate session use case
pub struct ValidateSessionUseCase<S>
where
    S: SessionStore,
{
    sessions: Arc<S>,
    signer: Arc<TokenSigner>,
    config: Arc<AuthConfig>,
}

impl<S> ValidateSessionUseCase<S>
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

    pub async fn execute(&self, token: &str) -> AuthResult<ValidatedSession> {
        // Signature and expiry first; a store lookup never happens for a
        // token we would not accept anyway
        let claims = self.signer.verify(token)?;
        let subject = claims.subject()?;

        let session = bounded(self.config.store_timeout, self.sessions.get(&claims.jti))
            .await?
            .ok_or(AuthError::Unauthenticated)?;

        // A record under this key must belong to the token's subject
        if *session.user_id.as_uuid() != subject {
            return Err(AuthError::Unauthenticated);
        }

        // The store purges on TTL, but a record read back right at the
        // boundary still fails closed
        if session.is_expired(Utc::now()) {
            return Err(AuthError::Unauthenticated);
        }

        Ok(ValidatedSession {
            user_id: session.user_id,
            expires_at: session.expires_at,
        })
    }
}
