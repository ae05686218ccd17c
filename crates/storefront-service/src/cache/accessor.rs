//! Best-effort cache access.

use super::{CacheInterface, DEFAULT_TTL};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// Cache-aside accessor over a [`CacheInterface`] store.
///
/// No method here returns an error: a failing store is logged and treated
/// as a miss, so an outage degrades to reading the database every time.
#[derive(Clone)]
pub struct CacheAside {
    store: Arc<dyn CacheInterface>,
    default_ttl: Duration,
}

impl CacheAside {
    /// Wraps `store`, caching for [`DEFAULT_TTL`] unless told otherwise.
    #[must_use]
    pub fn new(store: Arc<dyn CacheInterface>) -> Self {
        Self::with_ttl(store, DEFAULT_TTL)
    }

    /// Wraps `store` with a custom default TTL.
    #[must_use]
    pub fn with_ttl(store: Arc<dyn CacheInterface>, default_ttl: Duration) -> Self {
        Self { store, default_ttl }
    }

    /// The TTL applied by [`set`](Self::set).
    #[must_use]
    pub const fn default_ttl(&self) -> Duration {
        self.default_ttl
    }

    /// The wrapped store.
    #[must_use]
    pub fn store(&self) -> &Arc<dyn CacheInterface> {
        &self.store
    }

    /// Reads and decodes `key`. Absent, undecodable and unreachable all
    /// come back as `None`.
    pub async fn get<T: DeserializeOwned + Send>(&self, key: &str) -> Option<T> {
        let payload = match self.store.get(key).await {
            Ok(Some(payload)) => payload,
            Ok(None) => {
                debug!("Cache miss for key '{}'", key);
                return None;
            }
            Err(e) => {
                warn!("Cache read failed for key '{}': {}", key, e);
                return None;
            }
        };

        match serde_json::from_str(&payload) {
            Ok(value) => {
                debug!("Cache hit for key '{}'", key);
                Some(value)
            }
            Err(e) => {
                warn!("Discarding undecodable cache entry '{}': {}", key, e);
                None
            }
        }
    }

    /// Stores `value` under `key` for the default TTL.
    pub async fn set<T: Serialize + Send + Sync>(&self, key: &str, value: &T) {
        self.set_with_ttl(key, value, self.default_ttl).await;
    }

    /// Stores `value` under `key` for `ttl`.
    pub async fn set_with_ttl<T: Serialize + Send + Sync>(&self, key: &str, value: &T, ttl: Duration) {
        let payload = match serde_json::to_string(value) {
            Ok(payload) => payload,
            Err(e) => {
                warn!("Cache value for key '{}' not serializable: {}", key, e);
                return;
            }
        };
        if let Err(e) = self.store.set(key, &payload, ttl).await {
            warn!("Cache write failed for key '{}': {}", key, e);
        }
    }

    /// Removes `key`. A missing key is not an error.
    pub async fn delete(&self, key: &str) {
        match self.store.delete(key).await {
            Ok(existed) => debug!("Invalidated key '{}' (present: {})", key, existed),
            Err(e) => warn!("Cache delete failed for key '{}': {}", key, e),
        }
    }

    /// Removes every key matching `pattern`.
    pub async fn delete_pattern(&self, pattern: &str) {
        match self.store.delete_pattern(pattern).await {
            Ok(count) => debug!("Invalidated {} keys matching '{}'", count, pattern),
            Err(e) => warn!("Cache pattern delete failed for '{}': {}", pattern, e),
        }
    }
}

impl std::fmt::Debug for CacheAside {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CacheAside")
            .field("enabled", &self.store.is_enabled())
            .field("default_ttl", &self.default_ttl)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::{InMemoryCacheService, MockCacheInterface};
    use storefront_core::StorefrontError;

    fn failing_store() -> MockCacheInterface {
        let mut store = MockCacheInterface::new();
        store
            .expect_get()
            .returning(|_| Err(StorefrontError::cache("connection refused")));
        store
            .expect_set()
            .returning(|_, _, _| Err(StorefrontError::cache("connection refused")));
        store
            .expect_delete()
            .returning(|_| Err(StorefrontError::cache("connection refused")));
        store
            .expect_delete_pattern()
            .returning(|_| Err(StorefrontError::cache("connection refused")));
        store.expect_is_enabled().return_const(true);
        store
    }

    #[tokio::test]
    async fn test_round_trip_within_ttl() {
        let cache = CacheAside::new(Arc::new(InMemoryCacheService::new()));
        cache.set("k", &vec![1, 2, 3]).await;
        assert_eq!(cache.get::<Vec<i32>>("k").await, Some(vec![1, 2, 3]));
    }

    #[tokio::test]
    async fn test_absent_after_delete_and_expiry() {
        let cache = CacheAside::with_ttl(Arc::new(InMemoryCacheService::new()), Duration::from_millis(20));
        cache.set("deleted", &"v").await;
        cache.delete("deleted").await;
        assert_eq!(cache.get::<String>("deleted").await, None);

        cache.set("expiring", &"v").await;
        tokio::time::sleep(Duration::from_millis(40)).await;
        assert_eq!(cache.get::<String>("expiring").await, None);
    }

    #[tokio::test]
    async fn test_store_failures_are_swallowed() {
        let cache = CacheAside::new(Arc::new(failing_store()));

        cache.set("k", &"v").await;
        assert_eq!(cache.get::<String>("k").await, None);
        cache.delete("k").await;
        cache.delete_pattern("k:*").await;
    }

    #[tokio::test]
    async fn test_undecodable_payload_is_a_miss() {
        let store = Arc::new(InMemoryCacheService::new());
        store.set("k", "not json", DEFAULT_TTL).await.unwrap();

        let cache = CacheAside::new(store);
        assert_eq!(cache.get::<Vec<String>>("k").await, None);
    }

    #[tokio::test]
    async fn test_unrepresentable_ttl_still_caches() {
        let cache = CacheAside::with_ttl(Arc::new(InMemoryCacheService::new()), Duration::from_secs(u64::MAX));
        cache.set("k", &1).await;
        assert_eq!(cache.get::<i32>("k").await, Some(1));
    }

    #[tokio::test]
    async fn test_set_uses_default_ttl() {
        let mut store = MockCacheInterface::new();
        store
            .expect_set()
            .withf(|key, value, ttl| key == "k" && value == "42" && *ttl == Duration::from_secs(900))
            .times(1)
            .returning(|_, _, _| Ok(()));

        CacheAside::new(Arc::new(store)).set("k", &42).await;
    }
}
