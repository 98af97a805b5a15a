//! Auth Error Types
//!
//! Auth-specific error variants that integrate with the unified
//! `kernel::error::AppError` system.
//!
//! The taxonomy is deliberately coarse at the boundary: credential and
//! lookup failures all surface as [`AuthError::InvalidCredentials`], and
//! every token/session failure as [`AuthError::Unauthenticated`], so the
//! precise internal cause is never observable externally.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use kernel::error::{app_error::AppError, kind::ErrorKind};
use thiserror::Error;

/// Auth-specific result type alias
pub type AuthResult<T> = Result<T, AuthError>;

/// Auth-specific error variants
#[derive(Debug, Error)]
pub enum AuthError {
    /// Bad email/password pair. Covers both "no such user" and "wrong
    /// password" to prevent account enumeration.
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// Registration conflict: email or user name already in use
    #[error("Account already exists")]
    AlreadyExists,

    /// Token invalid, expired, or session revoked; never distinguished
    #[error("Not authenticated")]
    Unauthenticated,

    /// Caller-supplied deadline elapsed before a store call completed
    #[error("Operation canceled")]
    Canceled,

    /// Malformed registration input (email, user name, password policy)
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Credential store I/O failure
    #[error("Credential store error: {0}")]
    Database(#[from] sqlx::Error),

    /// Session store I/O failure
    #[error("Session store error: {0}")]
    SessionStore(#[from] redis::RedisError),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AuthError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            AuthError::InvalidCredentials | AuthError::Unauthenticated => StatusCode::UNAUTHORIZED,
            AuthError::AlreadyExists => StatusCode::CONFLICT,
            AuthError::Canceled => StatusCode::REQUEST_TIMEOUT,
            AuthError::Validation(_) => StatusCode::BAD_REQUEST,
            AuthError::Database(_) | AuthError::SessionStore(_) => StatusCode::SERVICE_UNAVAILABLE,
            AuthError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the ErrorKind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            AuthError::InvalidCredentials | AuthError::Unauthenticated => ErrorKind::Unauthorized,
            AuthError::AlreadyExists => ErrorKind::Conflict,
            AuthError::Canceled => ErrorKind::RequestTimeout,
            AuthError::Validation(_) => ErrorKind::BadRequest,
            AuthError::Database(_) | AuthError::SessionStore(_) => ErrorKind::ServiceUnavailable,
            AuthError::Internal(_) => ErrorKind::InternalServerError,
        }
    }

    /// Convert to AppError
    ///
    /// Store and internal errors get a fixed message; their details stay
    /// in the logs and never reach the client.
    pub fn to_app_error(&self) -> AppError {
        match self {
            AuthError::Database(_) | AuthError::SessionStore(_) => {
                AppError::service_unavailable("Store temporarily unavailable")
            }
            AuthError::Internal(_) => AppError::internal("Internal error"),
            other => AppError::new(other.kind(), other.to_string()),
        }
    }

    /// Log the error with appropriate level
    fn log(&self) {
        match self {
            AuthError::Database(e) => {
                tracing::error!(error = %e, "Credential store error");
            }
            AuthError::SessionStore(e) => {
                tracing::error!(error = %e, "Session store error");
            }
            AuthError::Internal(msg) => {
                tracing::error!(message = %msg, "Auth internal error");
            }
            AuthError::InvalidCredentials => {
                tracing::warn!("Rejected login attempt");
            }
            AuthError::Canceled => {
                tracing::warn!("Auth operation canceled before completion");
            }
            _ => {
                tracing::debug!(error = %self, "Auth error");
            }
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        self.log();
        self.to_app_error().into_response()
    }
}

impl From<AppError> for AuthError {
    fn from(err: AppError) -> Self {
        AuthError::Internal(err.to_string())
    }
}

impl From<platform::token::TokenError> for AuthError {
    fn from(err: platform::token::TokenError) -> Self {
        match err {
            platform::token::TokenError::Invalid => AuthError::Unauthenticated,
            platform::token::TokenError::Signing(msg) => AuthError::Internal(msg),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uniform_credential_kind() {
        // "no such user" and "wrong password" are the same variant, so
        // this only documents the mapping
        assert_eq!(
            AuthError::InvalidCredentials.kind(),
            AuthError::Unauthenticated.kind()
        );
        assert_eq!(
            AuthError::InvalidCredentials.status_code(),
            StatusCode::UNAUTHORIZED
        );
    }

    #[test]
    fn test_store_errors_do_not_leak_detail() {
        let err = AuthError::Database(sqlx::Error::PoolTimedOut);
        let app = err.to_app_error();
        assert_eq!(app.status_code(), 503);
        assert_eq!(app.message(), "Store temporarily unavailable");
    }

    #[test]
    fn test_canceled_maps_to_timeout() {
        assert_eq!(
            AuthError::Canceled.status_code(),
            StatusCode::REQUEST_TIMEOUT
        );
    }
}
