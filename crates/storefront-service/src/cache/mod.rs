//! List caching for the service layer.
//!
//! Cache-aside: list reads go through [`CacheAside`], which consults a
//! [`CacheInterface`] store before the repositories and fills it on a
//! miss. Writes call [`InvalidationPolicy`] after they commit. Keys are
//! built by [`CacheKeys`] so readers and invalidators agree on them.

mod accessor;
mod cache_interface;
pub mod cache_keys;
mod filter_signature;
mod invalidation;
mod memory_cache;
mod redis_cache;

pub use accessor::CacheAside;
pub use cache_interface::CacheInterface;
pub use cache_keys::{build_key, CacheKeys};
pub use filter_signature::FilterSignature;
pub use invalidation::InvalidationPolicy;
pub use memory_cache::InMemoryCacheService;
pub use redis_cache::{create_redis_pool, RedisCacheService};

#[cfg(test)]
pub use cache_interface::MockCacheInterface;

use std::sync::Arc;
use std::time::Duration;
use storefront_config::{CacheBackend, CacheConfig};
use storefront_core::{HealthCheck, StorefrontResult};
use tracing::info;

/// Entry lifetime when the configuration does not set one (15 minutes).
pub const DEFAULT_TTL: Duration = Duration::from_secs(900);

/// A configured cache store plus its health probe.
#[derive(Clone)]
pub struct CacheStore {
    pub store: Arc<dyn CacheInterface>,
    pub health: Arc<dyn HealthCheck>,
}

impl CacheStore {
    fn from_arc<S>(store: Arc<S>) -> Self
    where
        S: CacheInterface + HealthCheck + 'static,
    {
        Self {
            store: store.clone(),
            health: store,
        }
    }
}

impl std::fmt::Debug for CacheStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CacheStore")
            .field("enabled", &self.store.is_enabled())
            .finish_non_exhaustive()
    }
}

/// Builds the cache store selected by configuration.
///
/// A disabled cache yields a store that never hits.
pub fn create_cache_store(config: &CacheConfig) -> StorefrontResult<CacheStore> {
    if !config.enabled {
        info!("List cache disabled");
        return Ok(CacheStore::from_arc(Arc::new(RedisCacheService::disabled())));
    }

    match config.backend {
        CacheBackend::Redis => {
            let pool = create_redis_pool(config)?;
            info!("List cache backed by Redis at {}", config.url);
            Ok(CacheStore::from_arc(Arc::new(RedisCacheService::new(Arc::new(pool)))))
        }
        CacheBackend::Memory => {
            info!("List cache backed by in-process store");
            Ok(CacheStore::from_arc(Arc::new(InMemoryCacheService::new())))
        }
    }
}
