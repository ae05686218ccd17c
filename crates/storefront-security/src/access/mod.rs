//! Authorization checks over validated claims.

mod ownership;

pub use ownership::*;
