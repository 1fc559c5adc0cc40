//! Accounts and bearer sessions.
//!
//! Registration and login live in [`handlers`]; route handlers gate access
//! with the extractors in [`middleware`]. Passwords are salted hashes,
//! session tokens are UUIDs with a TTL.

pub mod handlers;
pub mod middleware;
pub mod password;
pub mod sessions;

pub use middleware::{BearerToken, RequireStaff, SessionUser};
