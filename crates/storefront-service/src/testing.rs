//! Shared fixtures for service tests.

use crate::cache::{CacheInterface, InMemoryCacheService};
use crate::{RegisterRequest, Services};
use std::sync::Arc;
use storefront_config::{CacheConfig, SecurityConfig};
use storefront_repository::memory::InMemoryDatabase;
use storefront_repository::Repositories;
use storefront_security::Claims;

pub(crate) struct Harness {
    pub db: Arc<InMemoryDatabase>,
    pub cache: Arc<InMemoryCacheService>,
    pub services: Services,
}

pub(crate) fn security_config() -> SecurityConfig {
    SecurityConfig {
        jwt_secret: "service-test-secret-key-0123456789abcdef".to_string(),
        jwt_issuer: "storefront-test".to_string(),
        jwt_audience: "storefront-test".to_string(),
        password_hash_cost: 1,
        ..SecurityConfig::default()
    }
}

pub(crate) fn harness_with_store(store: Arc<dyn CacheInterface>) -> (Arc<InMemoryDatabase>, Services) {
    let db = InMemoryDatabase::new();
    let services = Services::new(
        &Repositories::in_memory(&db),
        store,
        &CacheConfig::default(),
        &security_config(),
    );
    (db, services)
}

pub(crate) fn harness() -> Harness {
    let cache = Arc::new(InMemoryCacheService::new());
    let (db, services) = harness_with_store(cache.clone());
    Harness { db, cache, services }
}

pub(crate) fn register_request(username: &str) -> RegisterRequest {
    RegisterRequest {
        username: username.to_string(),
        email: format!("{username}@example.com"),
        password: "Shopping42".to_string(),
        password_confirm: "Shopping42".to_string(),
        first_name: String::new(),
        last_name: String::new(),
    }
}

impl Harness {
    /// Registers `username` and returns the claims of its access token.
    pub async fn sign_up(&self, username: &str) -> Claims {
        let response = self.services.auth.register(register_request(username)).await.unwrap();
        self.services.auth.validate_token(&response.access).await.unwrap()
    }
}
