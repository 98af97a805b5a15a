//! Auth Router

use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::domain::repository::{SessionStore, UserRepository};
use crate::error::{AuthError, AuthResult};
use crate::infra::postgres::PgUserRepository;
use crate::infra::redis::RedisSessionStore;
use crate::presentation::handlers::{self, AuthAppState};
use crate::presentation::middleware::{AuthMiddlewareState, require_session};

/// Create the Auth router backed by PostgreSQL and Redis
pub fn auth_router(
    users: PgUserRepository,
    sessions: RedisSessionStore,
    config: AuthConfig,
) -> AuthResult<Router> {
    auth_router_generic(users, sessions, config)
}

/// Create a generic Auth router for any store implementations
pub fn auth_router_generic<U, S>(users: U, sessions: S, config: AuthConfig) -> AuthResult<Router>
where
    U: UserRepository + Clone + Send + Sync + 'static,
    S: SessionStore + Clone + Send + Sync + 'static,
{
    let signer = Arc::new(
        config
            .signer()
            .map_err(|e| AuthError::Internal(e.to_string()))?,
    );
    let config = Arc::new(config);

    let state = AuthAppState {
        users: Arc::new(users),
        sessions: Arc::new(sessions),
        signer: signer.clone(),
        config: config.clone(),
    };

    let middleware_state = AuthMiddlewareState {
        sessions: state.sessions.clone(),
        signer,
        config,
    };

    let protected = Router::new()
        .route("/password", post(handlers::change_password::<U, S>))
        .layer(axum::middleware::from_fn(
            move |req: axum::extract::Request, next: axum::middleware::Next| {
                require_session(middleware_state.clone(), req, next)
            },
        ));

    Ok(Router::new()
        .route("/register", post(handlers::register::<U, S>))
        .route("/login", post(handlers::login::<U, S>))
        .route("/logout", post(handlers::logout::<U, S>))
        .route("/session", get(handlers::session_status::<U, S>))
        .merge(protected)
        .with_state(state))
}
