//! Application Layer
//!
//! Use cases and application services.

pub mod change_password;
pub mod config;
pub mod login;
pub mod logout;
pub mod register;
pub mod validate_session;

// Re-exports
pub use change_password::ChangePasswordUseCase;
pub use config::AuthConfig;
pub use login::{LoginInput, LoginUseCase, SessionHandle};
pub use logout::LogoutUseCase;
pub use register::{RegisterInput, RegisterOutput, RegisterUseCase};
pub use validate_session::{ValidateSessionUseCase, ValidatedSession};

use std::future::Future;
use std::time::Duration;

use crate::error::{AuthError, AuthResult};

/// Run a store call under a deadline.
///
/// Store latency must never hold an auth request open indefinitely; an
/// elapsed deadline surfaces as [`AuthError::Canceled`].
pub(crate) async fn bounded<T, F>(limit: Duration, fut: F) -> AuthResult<T>
where
    F: Future<Output = AuthResult<T>>,
{
    match tokio::time::timeout(limit, fut).await {
        Ok(result) => result,
        Err(_) => Err(AuthError::Canceled),
    }
}
