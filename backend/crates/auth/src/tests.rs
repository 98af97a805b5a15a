//! Auth crate scenario tests
//!
//! Exercises the use cases end to end against in-memory store
//! implementations.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use chrono::Utc;

use crate::application::config::AuthConfig;
use crate::application::{
    ChangePasswordUseCase, LoginInput, LoginUseCase, LogoutUseCase, RegisterInput,
    RegisterUseCase, ValidateSessionUseCase,
};
use crate::domain::entity::{Session, User};
use crate::domain::repository::{SessionStore, UserRepository};
use crate::domain::value_object::{Email, UserId, UserName};
use crate::error::{AuthError, AuthResult};
use platform::password::HashedPassword;
use platform::token::TokenSigner;

// ============================================================================
// In-memory stores
// ============================================================================

#[derive(Clone, Default)]
struct InMemoryUsers {
    users: Arc<Mutex<Vec<User>>>,
}

impl UserRepository for InMemoryUsers {
    async fn find_by_email(&self, email: &Email) -> AuthResult<Option<User>> {
        let users = self.users.lock().unwrap();
        Ok(users
            .iter()
            .find(|u| u.email == *email && !u.is_deleted())
            .cloned())
    }

    async fn find_by_id(&self, user_id: &UserId) -> AuthResult<Option<User>> {
        let users = self.users.lock().unwrap();
        Ok(users
            .iter()
            .find(|u| u.user_id == *user_id && !u.is_deleted())
            .cloned())
    }

    async fn find_by_user_name(&self, user_name: &UserName) -> AuthResult<Option<User>> {
        let users = self.users.lock().unwrap();
        Ok(users
            .iter()
            .find(|u| u.user_name.canonical() == user_name.canonical() && !u.is_deleted())
            .cloned())
    }

    async fn insert(&self, user: &User) -> AuthResult<UserId> {
        let mut users = self.users.lock().unwrap();
        let taken = users.iter().any(|u| {
            !u.is_deleted()
                && (u.email == user.email
                    || u.user_name.canonical() == user.user_name.canonical())
        });
        if taken {
            return Err(AuthError::AlreadyExists);
        }
        users.push(user.clone());
        Ok(user.user_id)
    }

    async fn update_password(
        &self,
        user_id: &UserId,
        password_hash: &HashedPassword,
    ) -> AuthResult<()> {
        let mut users = self.users.lock().unwrap();
        match users
            .iter_mut()
            .find(|u| u.user_id == *user_id && !u.is_deleted())
        {
            Some(user) => {
                user.set_password(password_hash.clone());
                Ok(())
            }
            None => Err(AuthError::Unauthenticated),
        }
    }
}

impl InMemoryUsers {
    fn soft_delete(&self, user_id: &UserId) {
        let mut users = self.users.lock().unwrap();
        if let Some(user) = users.iter_mut().find(|u| u.user_id == *user_id) {
            user.deleted_at = Some(Utc::now());
        }
    }
}

#[derive(Clone, Default)]
struct InMemorySessions {
    sessions: Arc<Mutex<HashMap<String, Session>>>,
}

impl InMemorySessions {
    fn len(&self) -> usize {
        self.sessions.lock().unwrap().len()
    }

    fn put_raw(&self, session: Session) {
        self.sessions
            .lock()
            .unwrap()
            .insert(session.session_key.clone(), session);
    }
}

impl SessionStore for InMemorySessions {
    async fn put(&self, session: &Session) -> AuthResult<()> {
        self.put_raw(session.clone());
        Ok(())
    }

    async fn get(&self, session_key: &str) -> AuthResult<Option<Session>> {
        Ok(self.sessions.lock().unwrap().get(session_key).cloned())
    }

    async fn delete(&self, session_key: &str) -> AuthResult<()> {
        self.sessions.lock().unwrap().remove(session_key);
        Ok(())
    }
}

/// User repository that stalls on every call, for deadline tests
#[derive(Clone)]
struct SlowUsers {
    inner: InMemoryUsers,
    delay: Duration,
}

impl UserRepository for SlowUsers {
    async fn find_by_email(&self, email: &Email) -> AuthResult<Option<User>> {
        tokio::time::sleep(self.delay).await;
        self.inner.find_by_email(email).await
    }

    async fn find_by_id(&self, user_id: &UserId) -> AuthResult<Option<User>> {
        tokio::time::sleep(self.delay).await;
        self.inner.find_by_id(user_id).await
    }

    async fn find_by_user_name(&self, user_name: &UserName) -> AuthResult<Option<User>> {
        tokio::time::sleep(self.delay).await;
        self.inner.find_by_user_name(user_name).await
    }

    async fn insert(&self, user: &User) -> AuthResult<UserId> {
        tokio::time::sleep(self.delay).await;
        self.inner.insert(user).await
    }

    async fn update_password(
        &self,
        user_id: &UserId,
        password_hash: &HashedPassword,
    ) -> AuthResult<()> {
        tokio::time::sleep(self.delay).await;
        self.inner.update_password(user_id, password_hash).await
    }
}

/// Session store that stalls on every call, for deadline tests
#[derive(Clone)]
struct SlowSessions {
    inner: InMemorySessions,
    delay: Duration,
}

impl SessionStore for SlowSessions {
    async fn put(&self, session: &Session) -> AuthResult<()> {
        tokio::time::sleep(self.delay).await;
        self.inner.put(session).await
    }

    async fn get(&self, session_key: &str) -> AuthResult<Option<Session>> {
        tokio::time::sleep(self.delay).await;
        self.inner.get(session_key).await
    }

    async fn delete(&self, session_key: &str) -> AuthResult<()> {
        tokio::time::sleep(self.delay).await;
        self.inner.delete(session_key).await
    }
}

// ============================================================================
// Fixture
// ============================================================================

struct Fixture {
    users: Arc<InMemoryUsers>,
    sessions: Arc<InMemorySessions>,
    signer: Arc<TokenSigner>,
    config: Arc<AuthConfig>,
}

impl Fixture {
    fn new() -> Self {
        let config = AuthConfig::with_random_secret();
        let signer = Arc::new(config.signer().unwrap());
        Self {
            users: Arc::new(InMemoryUsers::default()),
            sessions: Arc::new(InMemorySessions::default()),
            signer,
            config: Arc::new(config),
        }
    }

    fn register(&self) -> RegisterUseCase<InMemoryUsers> {
        RegisterUseCase::new(self.users.clone(), self.config.clone())
    }

    fn login(&self) -> LoginUseCase<InMemoryUsers, InMemorySessions> {
        LoginUseCase::new(
            self.users.clone(),
            self.sessions.clone(),
            self.signer.clone(),
            self.config.clone(),
        )
    }

    fn validate(&self) -> ValidateSessionUseCase<InMemorySessions> {
        ValidateSessionUseCase::new(self.sessions.clone(), self.signer.clone(), self.config.clone())
    }

    fn logout(&self) -> LogoutUseCase<InMemorySessions> {
        LogoutUseCase::new(self.sessions.clone(), self.signer.clone(), self.config.clone())
    }

    async fn register_user(&self, email: &str, user_name: &str, password: &str) -> UserId {
        self.register()
            .execute(register_input(email, user_name, password))
            .await
            .unwrap()
            .user_id
    }
}

fn register_input(email: &str, user_name: &str, password: &str) -> RegisterInput {
    RegisterInput {
        email: email.to_string(),
        user_name: user_name.to_string(),
        password: password.to_string(),
        phone_number: None,
        photo_url: None,
        is_private: false,
    }
}

fn login_input(email: &str, password: &str) -> LoginInput {
    LoginInput {
        email: email.to_string(),
        password: password.to_string(),
    }
}

// ============================================================================
// Scenarios
// ============================================================================

#[tokio::test]
async fn test_register_login_validate_logout_roundtrip() {
    let fx = Fixture::new();
    let user_id = fx
        .register_user("alice@example.com", "alice", "sup3r secret pw")
        .await;

    let handle = fx
        .login()
        .execute(login_input("alice@example.com", "sup3r secret pw"))
        .await
        .unwrap();

    assert_eq!(handle.user_id, user_id);
    assert_eq!(handle.user_name, "alice");
    assert_eq!(fx.sessions.len(), 1);

    let validated = fx.validate().execute(&handle.token).await.unwrap();
    assert_eq!(validated.user_id, user_id);
    assert_eq!(validated.expires_at.timestamp(), handle.expires_at.timestamp());

    fx.logout().execute(&handle.token).await.unwrap();
    assert_eq!(fx.sessions.len(), 0);

    // The token still verifies cryptographically, but its session is gone
    assert!(matches!(
        fx.validate().execute(&handle.token).await,
        Err(AuthError::Unauthenticated)
    ));
}

#[tokio::test]
async fn test_wrong_password_and_unknown_email_are_indistinguishable() {
    let fx = Fixture::new();
    fx.register_user("alice@example.com", "alice", "sup3r secret pw")
        .await;

    let wrong_password = fx
        .login()
        .execute(login_input("alice@example.com", "not the password"))
        .await;
    let unknown_email = fx
        .login()
        .execute(login_input("nobody@example.com", "sup3r secret pw"))
        .await;
    let malformed_email = fx
        .login()
        .execute(login_input("not-an-email", "sup3r secret pw"))
        .await;

    assert!(matches!(wrong_password, Err(AuthError::InvalidCredentials)));
    assert!(matches!(unknown_email, Err(AuthError::InvalidCredentials)));
    assert!(matches!(malformed_email, Err(AuthError::InvalidCredentials)));
    assert_eq!(fx.sessions.len(), 0);
}

#[tokio::test]
async fn test_duplicate_registration_rejected() {
    let fx = Fixture::new();
    fx.register_user("alice@example.com", "alice", "sup3r secret pw")
        .await;

    // Same email, different name
    let same_email = fx
        .register()
        .execute(register_input("alice@example.com", "alice2", "other pass 99"))
        .await;
    assert!(matches!(same_email, Err(AuthError::AlreadyExists)));

    // Same name (case-insensitive), different email
    let same_name = fx
        .register()
        .execute(register_input("other@example.com", "Alice", "other pass 99"))
        .await;
    assert!(matches!(same_name, Err(AuthError::AlreadyExists)));

    // Original account is untouched
    assert!(
        fx.login()
            .execute(login_input("alice@example.com", "sup3r secret pw"))
            .await
            .is_ok()
    );
}

#[tokio::test]
async fn test_register_rejects_invalid_input() {
    let fx = Fixture::new();

    let bad_email = fx
        .register()
        .execute(register_input("not-an-email", "alice", "sup3r secret pw"))
        .await;
    assert!(matches!(bad_email, Err(AuthError::Validation(_))));

    let bad_name = fx
        .register()
        .execute(register_input("a@example.com", "a", "sup3r secret pw"))
        .await;
    assert!(matches!(bad_name, Err(AuthError::Validation(_))));

    let bad_password = fx
        .register()
        .execute(register_input("a@example.com", "alice", "short"))
        .await;
    assert!(matches!(bad_password, Err(AuthError::Validation(_))));
}

#[tokio::test]
async fn test_expired_token_rejected_even_with_live_record() {
    let fx = Fixture::new();
    let user_id = UserId::new();

    let issued = fx
        .signer
        .issue(*user_id.as_uuid(), Utc::now() - chrono::Duration::minutes(1))
        .unwrap();

    // Record exists, so only the token expiry can fail this
    fx.sessions.put_raw(Session::new(
        issued.claims.jti.clone(),
        user_id,
        Utc::now(),
        Utc::now() + chrono::Duration::hours(1),
    ));

    assert!(matches!(
        fx.validate().execute(&issued.token).await,
        Err(AuthError::Unauthenticated)
    ));
}

#[tokio::test]
async fn test_session_record_must_match_token_subject() {
    let fx = Fixture::new();
    let issued = fx
        .signer
        .issue(*UserId::new().as_uuid(), Utc::now() + chrono::Duration::hours(1))
        .unwrap();

    // A record under the token's key but for a different user
    fx.sessions.put_raw(Session::new(
        issued.claims.jti.clone(),
        UserId::new(),
        Utc::now(),
        Utc::now() + chrono::Duration::hours(1),
    ));

    assert!(matches!(
        fx.validate().execute(&issued.token).await,
        Err(AuthError::Unauthenticated)
    ));
}

#[tokio::test]
async fn test_logout_is_idempotent() {
    let fx = Fixture::new();
    fx.register_user("alice@example.com", "alice", "sup3r secret pw")
        .await;
    let handle = fx
        .login()
        .execute(login_input("alice@example.com", "sup3r secret pw"))
        .await
        .unwrap();

    fx.logout().execute(&handle.token).await.unwrap();
    fx.logout().execute(&handle.token).await.unwrap();
}

#[tokio::test]
async fn test_logout_requires_valid_token() {
    let fx = Fixture::new();
    assert!(matches!(
        fx.logout().execute("not.a.token").await,
        Err(AuthError::Unauthenticated)
    ));
}

#[tokio::test]
async fn test_relogin_creates_independent_sessions() {
    let fx = Fixture::new();
    fx.register_user("alice@example.com", "alice", "sup3r secret pw")
        .await;

    let first = fx
        .login()
        .execute(login_input("alice@example.com", "sup3r secret pw"))
        .await
        .unwrap();
    let second = fx
        .login()
        .execute(login_input("alice@example.com", "sup3r secret pw"))
        .await
        .unwrap();

    assert_ne!(first.token, second.token);
    assert_eq!(fx.sessions.len(), 2);

    // Revoking one session leaves the other valid
    fx.logout().execute(&first.token).await.unwrap();
    assert!(fx.validate().execute(&first.token).await.is_err());
    assert!(fx.validate().execute(&second.token).await.is_ok());
}

#[tokio::test]
async fn test_slow_store_cancels_login_without_leaking_session() {
    let fx = Fixture::new();
    fx.register_user("alice@example.com", "alice", "sup3r secret pw")
        .await;

    let slow = Arc::new(SlowSessions {
        inner: InMemorySessions::default(),
        delay: Duration::from_millis(200),
    });
    let config = Arc::new(AuthConfig {
        store_timeout: Duration::from_millis(20),
        ..(*fx.config).clone()
    });

    let login = LoginUseCase::new(
        fx.users.clone(),
        slow.clone(),
        fx.signer.clone(),
        config,
    );

    let result = login
        .execute(login_input("alice@example.com", "sup3r secret pw"))
        .await;

    assert!(matches!(result, Err(AuthError::Canceled)));
    // No token was handed out, so no record may linger either once the
    // stalled write is dropped
    assert_eq!(slow.inner.len(), 0);
}

#[tokio::test]
async fn test_change_password_invalidates_old_credential() {
    let fx = Fixture::new();
    let user_id = fx
        .register_user("alice@example.com", "alice", "sup3r secret pw")
        .await;

    let change = ChangePasswordUseCase::new(fx.users.clone(), fx.config.clone());

    // Wrong current password is refused
    assert!(matches!(
        change
            .execute(&user_id, "wrong current".into(), "brand new pass 7".into())
            .await,
        Err(AuthError::InvalidCredentials)
    ));

    // New password must satisfy the policy
    assert!(matches!(
        change
            .execute(&user_id, "sup3r secret pw".into(), "short".into())
            .await,
        Err(AuthError::Validation(_))
    ));

    change
        .execute(&user_id, "sup3r secret pw".into(), "brand new pass 7".into())
        .await
        .unwrap();

    assert!(matches!(
        fx.login()
            .execute(login_input("alice@example.com", "sup3r secret pw"))
            .await,
        Err(AuthError::InvalidCredentials)
    ));
    assert!(
        fx.login()
            .execute(login_input("alice@example.com", "brand new pass 7"))
            .await
            .is_ok()
    );
}

#[tokio::test]
async fn test_slow_credential_store_cancels_all_operations() {
    let fx = Fixture::new();
    let user_id = fx
        .register_user("alice@example.com", "alice", "sup3r secret pw")
        .await;

    let slow = Arc::new(SlowUsers {
        inner: (*fx.users).clone(),
        delay: Duration::from_millis(200),
    });
    let config = Arc::new(AuthConfig {
        store_timeout: Duration::from_millis(20),
        ..(*fx.config).clone()
    });

    // Login must hit the deadline, not wait out the stalled lookup
    let login = LoginUseCase::new(
        slow.clone(),
        fx.sessions.clone(),
        fx.signer.clone(),
        config.clone(),
    );
    let started = tokio::time::Instant::now();
    let result = login
        .execute(login_input("alice@example.com", "sup3r secret pw"))
        .await;
    assert!(matches!(result, Err(AuthError::Canceled)));
    assert!(started.elapsed() < Duration::from_millis(200));
    assert_eq!(fx.sessions.len(), 0);

    let register = RegisterUseCase::new(slow.clone(), config.clone());
    assert!(matches!(
        register
            .execute(register_input("bob@example.com", "bob01", "other pass 99"))
            .await,
        Err(AuthError::Canceled)
    ));

    let change = ChangePasswordUseCase::new(slow, config);
    assert!(matches!(
        change
            .execute(&user_id, "sup3r secret pw".into(), "brand new pass 7".into())
            .await,
        Err(AuthError::Canceled)
    ));
}

#[tokio::test]
async fn test_password_update_refused_for_deleted_user() {
    let fx = Fixture::new();
    let user_id = fx
        .register_user("alice@example.com", "alice", "sup3r secret pw")
        .await;

    fx.users.soft_delete(&user_id);

    // The lookup no longer sees the user
    let change = ChangePasswordUseCase::new(fx.users.clone(), fx.config.clone());
    assert!(matches!(
        change
            .execute(&user_id, "sup3r secret pw".into(), "brand new pass 7".into())
            .await,
        Err(AuthError::Unauthenticated)
    ));

    // And a write racing the deletion reports failure, not silent success
    let new_hash = platform::password::PlainPassword::new_unchecked("brand new pass 7".into())
        .hash()
        .unwrap();
    assert!(matches!(
        fx.users.update_password(&user_id, &new_hash).await,
        Err(AuthError::Unauthenticated)
    ));
}
