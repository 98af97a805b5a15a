//! Value Object Module

pub mod email;
pub mod user_id;
pub mod user_name;

pub use email::Email;
pub use user_id::UserId;
pub use user_name::UserName;
