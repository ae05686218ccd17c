//! MySQL implementations of the repository traits.

mod category_repository;
mod product_repository;
mod revoked_token_repository;
mod user_repository;

pub use category_repository::MySqlCategoryRepository;
pub use product_repository::MySqlProductRepository;
pub use revoked_token_repository::MySqlRevokedTokenRepository;
pub use user_repository::MySqlUserRepository;

use storefront_core::{StorefrontError, StorefrontResult, UserId};

/// Parses a `CHAR(36)` user id column.
fn parse_user_id(value: &str) -> StorefrontResult<UserId> {
    UserId::parse(value).map_err(|e| StorefrontError::Internal(format!("Invalid UUID in database: {}", e)))
}
