//! Authentication and authorization for Depot.
//!
//! Covers Argon2id password hashing, HS256 JWT issuance and validation,
//! and the folder access checker that gates every file and folder
//! operation.

pub mod access;
pub mod jwt;
pub mod password;

pub use access::AccessChecker;
pub use jwt::{Claims, JwtDecoder, JwtEncoder};
pub use password::PasswordHasher;
