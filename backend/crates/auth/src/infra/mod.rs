//! Infrastructure Layer
//!
//! Concrete store implementations: PostgreSQL for users, Redis for
//! sessions.

pub mod postgres;
pub mod redis;

pub use postgres::PgUserRepository;
pub use redis::RedisSessionStore;
