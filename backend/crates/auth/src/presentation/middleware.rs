//! Auth Middleware
//!
//! Middleware for requiring a valid session on protected routes.

use axum::body::Body;
use axum::http::Request;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use platform::token::TokenSigner;
use std::sync::Arc;

use crate::application::ValidateSessionUseCase;
use crate::application::config::AuthConfig;
use crate::domain::repository::SessionStore;
use crate::domain::value_object::UserId;
use crate::error::AuthError;
use crate::presentation::handlers::extract_bearer_token;

/// Middleware state
#[derive(Clone)]
pub struct AuthMiddlewareState<S>
where
    S: SessionStore + Clone + Send + Sync + 'static,
{
    pub sessions: Arc<S>,
    pub signer: Arc<TokenSigner>,
    pub config: Arc<AuthConfig>,
}

/// The authenticated user, stored in request extensions by
/// [`require_session`]
#[derive(Clone, Copy)]
pub struct CurrentUser {
    pub user_id: UserId,
}

/// Middleware that requires a valid session
pub async fn require_session<S>(
    state: AuthMiddlewareState<S>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, Response>
where
    S: SessionStore + Clone + Send + Sync + 'static,
{
    let token = extract_bearer_token(req.headers())
        .ok_or_else(|| AuthError::Unauthenticated.into_response())?;

    let use_case = ValidateSessionUseCase::new(
        state.sessions.clone(),
        state.signer.clone(),
        state.config.clone(),
    );

    let validated = use_case
        .execute(&token)
        .await
        .map_err(|e| e.into_response())?;

    req.extensions_mut().insert(CurrentUser {
        user_id: validated.user_id,
    });

    Ok(next.run(req).await)
}
