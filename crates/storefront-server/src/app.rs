//! Application assembly.

use axum::Router;
use std::sync::Arc;
use storefront_config::AppConfig;
use storefront_core::{HealthCheck, StorefrontResult};
use storefront_repository::{create_pool, DatabasePool, SqlPool, Repositories};
use storefront_rest::{create_router, AppState};
use storefront_service::{create_cache_store, Services};
use tracing::info;

/// A fully wired application, ready to serve.
pub struct Application {
    pub router: Router,
    db_pool: Arc<DatabasePool>,
}

impl Application {
    /// Connects to the database and the cache store and builds the router.
    ///
    /// The cache store being unreachable is not fatal; list reads fall back
    /// to the database and `/ready` reports the cache as down.
    pub async fn build(config: &AppConfig) -> StorefrontResult<Self> {
        let db_pool = create_pool(&config.database).await?;
        info!("Database pool ready");

        let cache = create_cache_store(&config.cache)?;
        info!(
            "Cache store ready (enabled: {}, backend: {:?}, ttl: {}s)",
            config.cache.enabled, config.cache.backend, config.cache.default_ttl_secs
        );

        let repositories = Repositories::mysql(db_pool.clone());
        let services = Services::new(&repositories, cache.store, &config.cache, &config.security);

        let db_health: Arc<dyn HealthCheck> = db_pool.clone();
        let state = AppState::new(&services, vec![db_health, cache.health]);
        let router = create_router(state, &config.server);

        Ok(Self { router, db_pool })
    }

    /// Releases the database pool once serving has stopped.
    pub async fn shutdown(&self) {
        self.db_pool.close().await;
    }
}

impl std::fmt::Debug for Application {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Application")
            .field("db_pool", &self.db_pool)
            .finish_non_exhaustive()
    }
}
