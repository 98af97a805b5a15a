//! Session Entity
//!
//! A server-side session record keyed by the token id (jti) of the signed
//! token that was handed to the client. A token is only accepted while its
//! session record exists, so deleting the record revokes the token.

use chrono::{DateTime, Utc};

use crate::domain::value_object::UserId;

/// Active session record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    /// Unique session key (token id of the issued token)
    pub session_key: String,
    pub user_id: UserId,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl Session {
    pub fn new(
        session_key: impl Into<String>,
        user_id: UserId,
        issued_at: DateTime<Utc>,
        expires_at: DateTime<Utc>,
    ) -> Self {
        Self {
            session_key: session_key.into(),
            user_id,
            issued_at,
            expires_at,
        }
    }

    /// Whether the session has passed its expiry
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }

    /// Remaining lifetime in whole seconds, at least 1 so a store TTL
    /// never rounds down to "no expiry"
    pub fn remaining_secs(&self, now: DateTime<Utc>) -> u64 {
        let secs = (self.expires_at - now).num_seconds();
        secs.max(1) as u64
    }
}
