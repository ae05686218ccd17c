//! Cache key generators for consistent key naming.

use super::FilterSignature;
use std::fmt::Display;
use storefront_core::UserId;

/// Key segment of the global category list.
pub const CATEGORIES_LIST: &str = "categories_list";

/// Key segment of per-user product lists.
pub const PRODUCTS_LIST: &str = "products_list";

/// Key segment of cached profiles.
pub const USER_PROFILE: &str = "user_profile";

/// User segment for requests without credentials.
pub const ANONYMOUS: &str = "anonymous";

/// Joins `prefix` and each argument's string form with `:`.
///
/// Identical inputs always produce identical keys.
pub fn build_key<I>(prefix: &str, args: I) -> String
where
    I: IntoIterator,
    I::Item: Display,
{
    let mut key = prefix.to_string();
    for arg in args {
        key.push(':');
        key.push_str(&arg.to_string());
    }
    key
}

/// Builds the keys the list endpoints read and the write paths invalidate.
///
/// Every key starts with the configured namespace so several deployments
/// can share one Redis database.
#[derive(Debug, Clone)]
pub struct CacheKeys {
    namespace: String,
}

impl CacheKeys {
    /// Creates a key builder under `namespace`.
    #[must_use]
    pub fn new(namespace: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
        }
    }

    /// The single key holding the category list.
    #[must_use]
    pub fn categories_list(&self) -> String {
        build_key(&self.namespace, [CATEGORIES_LIST])
    }

    /// Key of one product-list result, scoped to the viewer.
    #[must_use]
    pub fn products_list(&self, viewer: Option<UserId>, signature: &FilterSignature) -> String {
        let user = viewer.map_or_else(|| ANONYMOUS.to_string(), |id| id.to_string());
        build_key(&self.namespace, [PRODUCTS_LIST, user.as_str(), signature.as_str()])
    }

    /// Pattern covering every cached product list of `user_id`.
    #[must_use]
    pub fn products_list_pattern(&self, user_id: UserId) -> String {
        build_key(&self.namespace, [PRODUCTS_LIST.to_string(), user_id.to_string(), "*".to_string()])
    }

    /// Pattern covering every cached product list of every viewer.
    #[must_use]
    pub fn all_products_lists_pattern(&self) -> String {
        build_key(&self.namespace, [PRODUCTS_LIST, "*"])
    }

    /// Key of a user's cached profile.
    #[must_use]
    pub fn user_profile(&self, user_id: UserId) -> String {
        build_key(&self.namespace, [USER_PROFILE.to_string(), user_id.to_string()])
    }
}
