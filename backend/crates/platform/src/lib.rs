//! Platform Crate - Technical Infrastructure
//!
//! This crate provides shared technical foundations with no domain
//! knowledge:
//! - Password hashing (Argon2id, NIST SP 800-63B compliant)
//! - Signed token issuance and verification (JWT, HS256)

pub mod password;
pub mod token;
