//! Redis Session Store Implementation
//!
//! Session records are JSON values under `session:{key}` with a TTL equal
//! to the session's remaining lifetime, so Redis expires a record on its
//! own at the instant the token would stop verifying anyway.

use chrono::{DateTime, Utc};
use redis::AsyncCommands;
use redis::aio::ConnectionManager;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::entity::Session;
use crate::domain::repository::SessionStore;
use crate::domain::value_object::UserId;
use crate::error::{AuthError, AuthResult};

const SESSION_KEY_PREFIX: &str = "session:";

/// Redis-backed session store
#[derive(Clone)]
pub struct RedisSessionStore {
    conn: ConnectionManager,
}

impl RedisSessionStore {
    pub fn new(conn: ConnectionManager) -> Self {
        Self { conn }
    }

    fn storage_key(session_key: &str) -> String {
        format!("{SESSION_KEY_PREFIX}{session_key}")
    }
}

impl SessionStore for RedisSessionStore {
    async fn put(&self, session: &Session) -> AuthResult<()> {
        let record = SessionRecord::from_session(session);
        let payload = serde_json::to_string(&record)
            .map_err(|e| AuthError::Internal(format!("Session serialization failed: {}", e)))?;

        let ttl_secs = session.remaining_secs(Utc::now());

        let mut conn = self.conn.clone();
        let _: () = conn
            .set_ex(Self::storage_key(&session.session_key), payload, ttl_secs)
            .await?;

        Ok(())
    }

    async fn get(&self, session_key: &str) -> AuthResult<Option<Session>> {
        let mut conn = self.conn.clone();
        let payload: Option<String> = conn.get(Self::storage_key(session_key)).await?;

        let Some(payload) = payload else {
            return Ok(None);
        };

        let record: SessionRecord = serde_json::from_str(&payload)
            .map_err(|e| AuthError::Internal(format!("Session deserialization failed: {}", e)))?;

        Ok(Some(record.into_session(session_key)))
    }

    async fn delete(&self, session_key: &str) -> AuthResult<()> {
        let mut conn = self.conn.clone();
        // DEL returns the number of keys removed; zero is fine
        let _: u64 = conn.del(Self::storage_key(session_key)).await?;

        Ok(())
    }
}

/// Wire format of a stored session record
#[derive(Serialize, Deserialize)]
struct SessionRecord {
    user_id: Uuid,
    issued_at: DateTime<Utc>,
    expires_at: DateTime<Utc>,
}

impl SessionRecord {
    fn from_session(session: &Session) -> Self {
        Self {
            user_id: *session.user_id.as_uuid(),
            issued_at: session.issued_at,
            expires_at: session.expires_at,
        }
    }

    fn into_session(self, session_key: &str) -> Session {
        Session::new(
            session_key,
            UserId::from_uuid(self.user_id),
            self.issued_at,
            self.expires_at,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_key_prefix() {
        assert_eq!(
            RedisSessionStore::storage_key("abc-123"),
            "session:abc-123"
        );
    }

    #[test]
    fn test_record_wire_format() {
        let now = Utc::now();
        let session = Session::new("k", UserId::new(), now, now + chrono::Duration::hours(1));

        let payload = serde_json::to_string(&SessionRecord::from_session(&session)).unwrap();
        let record: SessionRecord = serde_json::from_str(&payload).unwrap();

        assert_eq!(record.into_session("k"), session);
    }
}
