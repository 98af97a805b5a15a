//! Repository Traits
//!
//! Persistence boundaries for the auth domain. `trait_variant::make`
//! generates a `Send` variant of each trait so implementations can be
//! shared across tasks; the `Local*` form stays available for
//! single-threaded contexts.

use platform::password::HashedPassword;

use crate::domain::entity::{Session, User};
use crate::domain::value_object::{Email, UserId, UserName};
use crate::error::AuthResult;

/// User persistence operations
///
/// All lookups must ignore soft-deleted users.
#[trait_variant::make(UserRepository: Send)]
pub trait LocalUserRepository {
    async fn find_by_email(&self, email: &Email) -> AuthResult<Option<User>>;

    async fn find_by_id(&self, user_id: &UserId) -> AuthResult<Option<User>>;

    async fn find_by_user_name(&self, user_name: &UserName) -> AuthResult<Option<User>>;

    /// Insert a new user. Returns `AuthError::AlreadyExists` if the email
    /// or user name is already taken.
    async fn insert(&self, user: &User) -> AuthResult<UserId>;

    async fn update_password(
        &self,
        user_id: &UserId,
        password_hash: &HashedPassword,
    ) -> AuthResult<()>;
}

/// Session persistence operations
///
/// Records are keyed by session key and expire on their own after the
/// session TTL.
#[trait_variant::make(SessionStore: Send)]
pub trait LocalSessionStore {
    async fn put(&self, session: &Session) -> AuthResult<()>;

    async fn get(&self, session_key: &str) -> AuthResult<Option<Session>>;

    /// Delete a session record. Deleting a missing key is not an error.
    async fn delete(&self, session_key: &str) -> AuthResult<()>;
}
