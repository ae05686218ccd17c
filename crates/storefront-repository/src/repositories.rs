//! The full set of repositories a running service needs.

use crate::{
    CategoryRepository, SqlPool, MySqlCategoryRepository, MySqlProductRepository,
    MySqlRevokedTokenRepository, MySqlUserRepository, ProductRepository, RevokedTokenRepository, UserRepository,
};
use std::sync::Arc;

/// One handle per table, all over the same backing store.
#[derive(Clone)]
pub struct Repositories {
    pub users: Arc<dyn UserRepository>,
    pub categories: Arc<dyn CategoryRepository>,
    pub products: Arc<dyn ProductRepository>,
    pub revoked_tokens: Arc<dyn RevokedTokenRepository>,
}

impl Repositories {
    /// MySQL repositories sharing `pool`.
    #[must_use]
    pub fn mysql(pool: Arc<dyn SqlPool>) -> Self {
        Self {
            users: Arc::new(MySqlUserRepository::new(pool.clone())),
            categories: Arc::new(MySqlCategoryRepository::new(pool.clone())),
            products: Arc::new(MySqlProductRepository::new(pool.clone())),
            revoked_tokens: Arc::new(MySqlRevokedTokenRepository::new(pool)),
        }
    }

    /// In-memory repositories sharing `db`.
    #[cfg(any(test, feature = "memory"))]
    #[must_use]
    pub fn in_memory(db: &Arc<crate::memory::InMemoryDatabase>) -> Self {
        Self {
            users: Arc::new(db.users()),
            categories: Arc::new(db.categories()),
            products: Arc::new(db.products()),
            revoked_tokens: Arc::new(db.revoked_tokens()),
        }
    }
}

impl std::fmt::Debug for Repositories {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Repositories").finish_non_exhaustive()
    }
}
