//! Which cached entries each write makes stale.

use super::{CacheAside, CacheKeys};
use storefront_core::UserId;
use tracing::debug;

/// Deletes the cache entries a committed write has made stale.
///
/// | Write | Invalidated |
/// |---|---|
/// | product create/update/delete by U | U's product lists, U's profile |
/// | category create | category list |
/// | category update/delete | category list, every product list |
/// | profile update, password change by U | U's profile |
#[derive(Debug, Clone)]
pub struct InvalidationPolicy {
    cache: CacheAside,
    keys: CacheKeys,
}

impl InvalidationPolicy {
    /// Creates a policy over `cache` using `keys`.
    #[must_use]
    pub fn new(cache: CacheAside, keys: CacheKeys) -> Self {
        Self { cache, keys }
    }

    /// After a product owned by `owner` was created, changed or removed.
    pub async fn product_written(&self, owner: UserId) {
        debug!("Invalidating product lists of user {}", owner);
        self.cache.delete_pattern(&self.keys.products_list_pattern(owner)).await;
        // The profile carries the owner's product count.
        self.cache.delete(&self.keys.user_profile(owner)).await;
    }

    /// After a category was created.
    pub async fn category_created(&self) {
        self.cache.delete(&self.keys.categories_list()).await;
    }

    /// After a category was renamed or removed.
    ///
    /// Product list items embed the category name, so every product list
    /// is dropped as well.
    pub async fn category_changed(&self) {
        self.cache.delete(&self.keys.categories_list()).await;
        self.cache.delete_pattern(&self.keys.all_products_lists_pattern()).await;
    }

    /// After a user's profile or password changed.
    pub async fn profile_written(&self, user_id: UserId) {
        self.cache.delete(&self.keys.user_profile(user_id)).await;
    }
}
