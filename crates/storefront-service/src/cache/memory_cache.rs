//! In-process TTL cache with the same interface as the Redis store.

use super::CacheInterface;
use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::time::{Duration, Instant};
use storefront_core::{HealthCheck, HealthStatus, StorefrontResult};
use tracing::debug;

#[derive(Debug, Clone)]
struct CacheEntry {
    value: String,
    expires_at: Instant,
}

/// Ceiling applied when `now + ttl` does not fit in an `Instant` (one year).
const MAX_TTL: Duration = Duration::from_secs(365 * 24 * 60 * 60);

impl CacheEntry {
    fn new(value: String, ttl: Duration) -> Self {
        let now = Instant::now();
        let expires_at = now
            .checked_add(ttl)
            .or_else(|| now.checked_add(MAX_TTL))
            .unwrap_or(now);
        Self { value, expires_at }
    }

    /// Expired once the full TTL has elapsed.
    fn is_expired(&self) -> bool {
        Instant::now() >= self.expires_at
    }
}

/// In-process cache store.
///
/// Expired entries are dropped lazily on access and swept on every
/// pattern delete.
#[derive(Debug, Default)]
pub struct InMemoryCacheService {
    entries: RwLock<HashMap<String, CacheEntry>>,
}

impl InMemoryCacheService {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.read().values().filter(|e| !e.is_expired()).count()
    }

    /// Whether the store holds no live entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Removes expired entries, returning how many were dropped.
    pub fn cleanup_expired(&self) -> usize {
        let mut entries = self.entries.write();
        let before = entries.len();
        entries.retain(|_, entry| !entry.is_expired());
        before - entries.len()
    }
}

#[async_trait]
impl CacheInterface for InMemoryCacheService {
    fn is_enabled(&self) -> bool {
        true
    }

    async fn get(&self, key: &str) -> StorefrontResult<Option<String>> {
        {
            let entries = self.entries.read();
            match entries.get(key) {
                Some(entry) if !entry.is_expired() => return Ok(Some(entry.value.clone())),
                Some(_) => {}
                None => return Ok(None),
            }
        }
        self.entries.write().remove(key);
        Ok(None)
    }

    async fn set(&self, key: &str, value: &str, ttl: Duration) -> StorefrontResult<()> {
        self.entries
            .write()
            .insert(key.to_string(), CacheEntry::new(value.to_string(), ttl));
        debug!("Cached key '{}' with TTL {}s", key, ttl.as_secs());
        Ok(())
    }

    async fn delete(&self, key: &str) -> StorefrontResult<bool> {
        let removed = self.entries.write().remove(key);
        Ok(removed.is_some_and(|entry| !entry.is_expired()))
    }

    async fn exists(&self, key: &str) -> StorefrontResult<bool> {
        Ok(self.entries.read().get(key).is_some_and(|entry| !entry.is_expired()))
    }

    async fn delete_pattern(&self, pattern: &str) -> StorefrontResult<u64> {
        // Sweep first so expired keys are not counted as deleted.
        self.cleanup_expired();
        let mut entries = self.entries.write();
        let before = entries.len();
        entries.retain(|key, _| !glob_match(pattern, key));
        let deleted = (before - entries.len()) as u64;
        debug!("Deleted {} keys matching pattern '{}'", deleted, pattern);
        Ok(deleted)
    }
}

#[async_trait]
impl HealthCheck for InMemoryCacheService {
    fn name(&self) -> &str {
        "cache"
    }

    async fn check(&self) -> HealthStatus {
        HealthStatus::Healthy
    }
}

/// Redis-style glob matching: `*` any run, `?` one character, `\` escapes.
fn glob_match(pattern: &str, text: &str) -> bool {
    let pattern: Vec<char> = pattern.chars().collect();
    let text: Vec<char> = text.chars().collect();

    let (mut p, mut t) = (0, 0);
    let mut backtrack: Option<(usize, usize)> = None;

    while t < text.len() {
        match pattern.get(p) {
            Some('*') => {
                backtrack = Some((p, t));
                p += 1;
                continue;
            }
            Some('?') => {
                p += 1;
                t += 1;
                continue;
            }
            Some('\\') if p + 1 < pattern.len() && pattern[p + 1] == text[t] => {
                p += 2;
                t += 1;
                continue;
            }
            Some(&c) if c != '\\' && c == text[t] => {
                p += 1;
                t += 1;
                continue;
            }
            _ => {}
        }

        match backtrack {
            Some((star_p, star_t)) => {
                p = star_p + 1;
                t = star_t + 1;
                backtrack = Some((star_p, star_t + 1));
            }
            None => return false,
        }
    }

    pattern[p..].iter().all(|&c| c == '*')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_glob_match() {
        assert!(glob_match("products_list:42:*", "products_list:42:page=1"));
        assert!(glob_match("products_list:42:*", "products_list:42:"));
        assert!(!glob_match("products_list:42:*", "products_list:421:page=1"));
        assert!(!glob_match("products_list:42:*", "user_profile:42"));
        assert!(glob_match("a?c", "abc"));
        assert!(!glob_match("a?c", "ac"));
        assert!(glob_match("*:list:*", "ns:list:x"));
        assert!(glob_match("literal\\*", "literal*"));
        assert!(!glob_match("literal\\*", "literalx"));
    }

    #[tokio::test]
    async fn test_set_get_delete() {
        let cache = InMemoryCacheService::new();
        cache.set("k", "v", Duration::from_secs(60)).await.unwrap();

        assert_eq!(cache.get("k").await.unwrap().as_deref(), Some("v"));
        assert!(cache.exists("k").await.unwrap());
        assert!(cache.delete("k").await.unwrap());
        assert_eq!(cache.get("k").await.unwrap(), None);
        assert!(!cache.delete("k").await.unwrap());
    }

    #[tokio::test]
    async fn test_entries_expire() {
        let cache = InMemoryCacheService::new();
        cache.set("short", "v", Duration::from_millis(20)).await.unwrap();
        cache.set("long", "v", Duration::from_secs(60)).await.unwrap();

        tokio::time::sleep(Duration::from_millis(40)).await;

        assert_eq!(cache.get("short").await.unwrap(), None);
        assert!(!cache.exists("short").await.unwrap());
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.cleanup_expired(), 0);
    }

    #[tokio::test]
    async fn test_delete_pattern_scoped_to_user() {
        let cache = InMemoryCacheService::new();
        let ttl = Duration::from_secs(60);
        cache.set("sf:products_list:u1:page=1", "a", ttl).await.unwrap();
        cache.set("sf:products_list:u1:page=2", "b", ttl).await.unwrap();
        cache.set("sf:products_list:u2:page=1", "c", ttl).await.unwrap();
        cache.set("sf:categories_list", "d", ttl).await.unwrap();

        assert_eq!(cache.delete_pattern("sf:products_list:u1:*").await.unwrap(), 2);
        assert!(cache.exists("sf:products_list:u2:page=1").await.unwrap());
        assert!(cache.exists("sf:categories_list").await.unwrap());
    }

    #[tokio::test]
    async fn test_delete_pattern_ignores_expired() {
        let cache = InMemoryCacheService::new();
        cache.set("sf:products_list:u1:a", "stale", Duration::from_millis(10)).await.unwrap();
        cache.set("sf:products_list:u1:b", "live", Duration::from_secs(60)).await.unwrap();
        tokio::time::sleep(Duration::from_millis(30)).await;

        assert_eq!(cache.delete_pattern("sf:products_list:u1:*").await.unwrap(), 1);
        assert!(cache.is_empty());
    }

    #[tokio::test]
    async fn test_huge_ttl_is_capped() {
        let cache = InMemoryCacheService::new();
        cache.set("k", "v", Duration::from_secs(u64::MAX)).await.unwrap();

        assert_eq!(cache.get("k").await.unwrap().as_deref(), Some("v"));
        assert!(cache.exists("k").await.unwrap());
    }
}
