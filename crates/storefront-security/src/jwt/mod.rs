//! Signed bearer tokens.

mod claims;
mod token_provider;

pub use claims::*;
pub use token_provider::*;
