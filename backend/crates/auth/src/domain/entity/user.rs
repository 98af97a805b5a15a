//! User Entity
//!
//! An account holder. The password is only ever held here as a PHC-format
//! Argon2id hash; plaintext never reaches this type.

use chrono::{DateTime, Utc};
use platform::password::HashedPassword;

use crate::domain::value_object::{Email, UserId, UserName};

/// User account entity
#[derive(Debug, Clone)]
pub struct User {
    pub user_id: UserId,
    pub user_name: UserName,
    pub email: Email,
    pub password_hash: HashedPassword,
    pub phone_number: Option<String>,
    pub photo_url: Option<String>,
    pub is_private: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Soft-delete marker. A deleted user is invisible to all lookups.
    pub deleted_at: Option<DateTime<Utc>>,
}

impl User {
    /// Create a new user with a fresh id and timestamps
    pub fn new(
        user_name: UserName,
        email: Email,
        password_hash: HashedPassword,
        phone_number: Option<String>,
        photo_url: Option<String>,
        is_private: bool,
    ) -> Self {
        let now = Utc::now();
        Self {
            user_id: UserId::new(),
            user_name,
            email,
            password_hash,
            phone_number,
            photo_url,
            is_private,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        }
    }

    /// Whether the user has been soft-deleted
    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }

    /// Replace the password hash, touching the updated timestamp
    pub fn set_password(&mut self, password_hash: HashedPassword) {
        self.password_hash = password_hash;
        self.updated_at = Utc::now();
    }
}
