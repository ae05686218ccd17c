//! Domain entities.

mod category;
mod product;
mod revoked_token;
mod user;

pub use category::*;
pub use product::*;
pub use revoked_token::*;
pub use user::*;
