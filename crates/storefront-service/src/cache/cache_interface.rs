//! The key-value store behind the list cache.

use async_trait::async_trait;
use shaku::Interface;
use std::time::Duration;
use storefront_core::StorefrontResult;

/// String-valued store with per-entry expiry.
///
/// Implementations own storage and expiry only. Key layout, encoding and
/// the decision of when to invalidate live in [`CacheAside`](super::CacheAside)
/// and [`InvalidationPolicy`](super::InvalidationPolicy).
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CacheInterface: Interface + Send + Sync {
    /// Live value under `key`; expired entries read as `None`.
    async fn get(&self, key: &str) -> StorefrontResult<Option<String>>;

    /// Replaces the whole entry under `key`.
    async fn set(&self, key: &str, value: &str, ttl: Duration) -> StorefrontResult<()>;

    /// Whether a live entry was removed.
    async fn delete(&self, key: &str) -> StorefrontResult<bool>;

    async fn exists(&self, key: &str) -> StorefrontResult<bool>;

    /// Removes every key matching a Redis-style glob (`*`, `?`, `\` escapes)
    /// and returns how many went.
    async fn delete_pattern(&self, pattern: &str) -> StorefrontResult<u64>;

    /// `false` for the no-op store used when caching is switched off.
    fn is_enabled(&self) -> bool;
}
