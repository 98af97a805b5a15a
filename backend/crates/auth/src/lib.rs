//! Auth (Authentication) Backend Module
//!
//! Clean Architecture structure:
//! - `domain/` - Entities, value objects, repository traits
//! - `application/` - Use cases composing the stores and crypto
//! - `infra/` - PostgreSQL and Redis implementations
//! - `presentation/` - HTTP handlers, DTOs, router, middleware
//!
//! ## Features
//! - User registration and login with email + password
//! - Signed, time-bounded bearer tokens (JWT HS256)
//! - Server-side sessions in a TTL key-value store, revocable before
//!   token expiry via logout
//! - Session validation consumable by other services
//!
//! ## Security Model
//! - Passwords hashed with Argon2id (NIST SP 800-63B compliant),
//!   plaintext zeroized after use
//! - "Unknown email" and "wrong password" are indistinguishable to
//!   callers; so are "bad signature", "expired" and "revoked"
//! - Signing secret supplied via configuration, never hard-coded

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;

#[cfg(test)]
mod tests;

// Re-exports for convenience
pub use application::config::AuthConfig;
pub use error::{AuthError, AuthResult};
pub use infra::postgres::PgUserRepository;
pub use infra::redis::RedisSessionStore;
pub use presentation::router::auth_router;

// Re-export kernel error types for unified error handling
pub use kernel::error::{
    app_error::{AppError, AppResult},
    kind::ErrorKind,
};

// Convenience re-exports
pub mod config {
    pub use crate::application::config::*;
}

pub mod models {
    pub use crate::domain::entity::*;
    pub use crate::domain::value_object::*;
    pub use crate::presentation::dto::*;
}

pub mod handlers {
    pub use crate::presentation::handlers::*;
}

pub mod router {
    pub use crate::presentation::router::*;
}

pub mod middleware {
    pub use crate::presentation::middleware::*;
}
