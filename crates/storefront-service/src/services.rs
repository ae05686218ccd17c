//! Service construction from repositories, a cache store and configuration.

use crate::cache::{CacheAside, CacheInterface, CacheKeys};
use crate::{
    AuthService, AuthServiceImpl, CategoryService, CategoryServiceImpl, ProductService, ProductServiceImpl,
};
use std::sync::Arc;
use storefront_config::{CacheConfig, SecurityConfig};
use storefront_repository::Repositories;
use storefront_security::{PasswordHasher, TokenProvider};

/// Every business service, wired to shared dependencies.
#[derive(Clone)]
pub struct Services {
    pub auth: Arc<dyn AuthService>,
    pub categories: Arc<dyn CategoryService>,
    pub products: Arc<dyn ProductService>,
    pub token_provider: Arc<TokenProvider>,
    pub cache_store: Arc<dyn CacheInterface>,
}

impl Services {
    /// Builds the services over `repositories` and `cache_store`.
    #[must_use]
    pub fn new(
        repositories: &Repositories,
        cache_store: Arc<dyn CacheInterface>,
        cache_config: &CacheConfig,
        security_config: &SecurityConfig,
    ) -> Self {
        let cache = CacheAside::with_ttl(cache_store.clone(), cache_config.default_ttl());
        let keys = CacheKeys::new(cache_config.key_prefix.clone());
        let password_hasher = Arc::new(PasswordHasher::with_cost(security_config.password_hash_cost));
        let token_provider = Arc::new(TokenProvider::new(Arc::new(security_config.clone())));

        let auth = Arc::new(AuthServiceImpl::new(
            repositories.users.clone(),
            repositories.products.clone(),
            repositories.revoked_tokens.clone(),
            password_hasher,
            token_provider.clone(),
            cache.clone(),
            keys.clone(),
        ));
        let categories = Arc::new(CategoryServiceImpl::new(
            repositories.categories.clone(),
            cache.clone(),
            keys.clone(),
        ));
        let products = Arc::new(ProductServiceImpl::new(
            repositories.products.clone(),
            repositories.categories.clone(),
            cache,
            keys,
        ));

        Self {
            auth,
            categories,
            products,
            token_provider,
            cache_store,
        }
    }
}

impl std::fmt::Debug for Services {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Services").finish_non_exhaustive()
    }
}
