//! HTTP Handlers

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode, header};
use axum::{Extension, Json};
use platform::token::TokenSigner;
use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::application::{
    ChangePasswordUseCase, LoginInput, LoginUseCase, LogoutUseCase, RegisterInput,
    RegisterUseCase, ValidateSessionUseCase,
};
use crate::domain::repository::{SessionStore, UserRepository};
use crate::error::{AuthError, AuthResult};
use crate::presentation::dto::{
    ChangePasswordRequest, LoginRequest, LoginResponse, RegisterRequest, RegisterResponse,
    SessionStatusResponse,
};
use crate::presentation::middleware::CurrentUser;

/// Shared state for auth handlers
#[derive(Clone)]
pub struct AuthAppState<U, S>
where
    U: UserRepository + Clone + Send + Sync + 'static,
    S: SessionStore + Clone + Send + Sync + 'static,
{
    pub users: Arc<U>,
    pub sessions: Arc<S>,
    pub signer: Arc<TokenSigner>,
    pub config: Arc<AuthConfig>,
}

// ============================================================================
// Register
// ============================================================================

/// POST /api/auth/register
pub async fn register<U, S>(
    State(state): State<AuthAppState<U, S>>,
    Json(req): Json<RegisterRequest>,
) -> AuthResult<(StatusCode, Json<RegisterResponse>)>
where
    U: UserRepository + Clone + Send + Sync + 'static,
    S: SessionStore + Clone + Send + Sync + 'static,
{
    let use_case = RegisterUseCase::new(state.users.clone(), state.config.clone());

    let input = RegisterInput {
        email: req.email,
        user_name: req.user_name,
        password: req.password,
        phone_number: req.phone_number,
        photo_url: req.photo_url,
        is_private: req.is_private,
    };

    let output = use_case.execute(input).await?;

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            user_id: output.user_id.to_string(),
        }),
    ))
}

// ============================================================================
// Login
// ============================================================================

/// POST /api/auth/login
pub async fn login<U, S>(
    State(state): State<AuthAppState<U, S>>,
    Json(req): Json<LoginRequest>,
) -> AuthResult<Json<LoginResponse>>
where
    U: UserRepository + Clone + Send + Sync + 'static,
    S: SessionStore + Clone + Send + Sync + 'static,
{
    let use_case = LoginUseCase::new(
        state.users.clone(),
        state.sessions.clone(),
        state.signer.clone(),
        state.config.clone(),
    );

    let input = LoginInput {
        email: req.email,
        password: req.password,
    };

    let handle = use_case.execute(input).await?;

    Ok(Json(LoginResponse {
        token: handle.token,
        user_id: handle.user_id.to_string(),
        user_name: handle.user_name,
        expires_at_ms: handle.expires_at.timestamp_millis(),
    }))
}

// ============================================================================
// Logout
// ============================================================================

/// POST /api/auth/logout
pub async fn logout<U, S>(
    State(state): State<AuthAppState<U, S>>,
    headers: HeaderMap,
) -> AuthResult<StatusCode>
where
    U: UserRepository + Clone + Send + Sync + 'static,
    S: SessionStore + Clone + Send + Sync + 'static,
{
    let token = extract_bearer_token(&headers).ok_or(AuthError::Unauthenticated)?;

    let use_case = LogoutUseCase::new(
        state.sessions.clone(),
        state.signer.clone(),
        state.config.clone(),
    );

    use_case.execute(&token).await?;

    Ok(StatusCode::NO_CONTENT)
}

// ============================================================================
// Session Status
// ============================================================================

/// GET /api/auth/session
pub async fn session_status<U, S>(
    State(state): State<AuthAppState<U, S>>,
    headers: HeaderMap,
) -> AuthResult<Json<SessionStatusResponse>>
where
    U: UserRepository + Clone + Send + Sync + 'static,
    S: SessionStore + Clone + Send + Sync + 'static,
{
    let use_case = ValidateSessionUseCase::new(
        state.sessions.clone(),
        state.signer.clone(),
        state.config.clone(),
    );

    let validated = match extract_bearer_token(&headers) {
        // A store outage must not report "not authenticated"
        Some(token) => match use_case.execute(&token).await {
            Ok(v) => Some(v),
            Err(e @ (AuthError::SessionStore(_) | AuthError::Canceled)) => return Err(e),
            Err(_) => None,
        },
        None => None,
    };

    match validated {
        Some(v) => Ok(Json(SessionStatusResponse {
            authenticated: true,
            user_id: Some(v.user_id.to_string()),
            expires_at_ms: Some(v.expires_at.timestamp_millis()),
        })),
        None => Ok(Json(SessionStatusResponse {
            authenticated: false,
            user_id: None,
            expires_at_ms: None,
        })),
    }
}

// ============================================================================
// Change Password (requires authentication)
// ============================================================================

/// POST /api/auth/password
pub async fn change_password<U, S>(
    State(state): State<AuthAppState<U, S>>,
    Extension(current_user): Extension<CurrentUser>,
    Json(req): Json<ChangePasswordRequest>,
) -> AuthResult<StatusCode>
where
    U: UserRepository + Clone + Send + Sync + 'static,
    S: SessionStore + Clone + Send + Sync + 'static,
{
    let use_case = ChangePasswordUseCase::new(state.users.clone(), state.config.clone());

    use_case
        .execute(
            &current_user.user_id,
            req.current_password,
            req.new_password,
        )
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

// ============================================================================
// Helper Functions
// ============================================================================

/// Pull the bearer token out of the Authorization header
pub fn extract_bearer_token(headers: &HeaderMap) -> Option<String> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let token = value.strip_prefix("Bearer ")?.trim();

    if token.is_empty() {
        None
    } else {
        Some(token.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_extract_bearer_token() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::AUTHORIZATION,
            HeaderValue::from_static("Bearer abc.def.ghi"),
        );
        assert_eq!(
            extract_bearer_token(&headers).as_deref(),
            Some("abc.def.ghi")
        );
    }

    #[test]
    fn test_extract_bearer_token_missing_or_malformed() {
        assert!(extract_bearer_token(&HeaderMap::new()).is_none());

        let mut headers = HeaderMap::new();
        headers.insert(
            header::AUTHORIZATION,
            HeaderValue::from_static("Basic dXNlcjpwYXNz"),
        );
        assert!(extract_bearer_token(&headers).is_none());

        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer "));
        assert!(extract_bearer_token(&headers).is_none());
    }
}
