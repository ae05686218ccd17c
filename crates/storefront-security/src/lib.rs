//! # Storefront Security
//!
//! JWT issuance and validation, Argon2 password hashing, and the
//! ownership checks that guard catalog writes.

pub mod access;
pub mod jwt;
pub mod password;

pub use access::*;
pub use jwt::*;
pub use password::*;
