//! Result type aliases for Storefront.

use crate::StorefrontError;

/// A specialized `Result` type for Storefront operations.
pub type StorefrontResult<T> = Result<T, StorefrontError>;
