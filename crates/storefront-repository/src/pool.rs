//! MySQL connection pool.

use async_trait::async_trait;
use sqlx::mysql::{MySqlPool, MySqlPoolOptions};
use std::sync::Arc;
use storefront_config::DatabaseConfig;
use storefront_core::{HealthCheck, HealthStatus, Interface, StorefrontError, StorefrontResult};
use tracing::{info, warn};

/// The handle every MySQL repository queries through.
#[async_trait]
pub trait SqlPool: Interface + Send + Sync {
    fn mysql(&self) -> &MySqlPool;

    /// Round-trips a trivial query.
    async fn ping(&self) -> StorefrontResult<()>;

    /// Applies everything under `migrations/` that has not run yet.
    async fn migrate(&self) -> StorefrontResult<()>;

    async fn close(&self);
}

pub struct DatabasePool {
    pool: MySqlPool,
}

impl DatabasePool {
    /// Opens a pool sized and timed from `config`.
    pub async fn connect(config: &DatabaseConfig) -> StorefrontResult<Self> {
        let options = MySqlPoolOptions::new()
            .min_connections(config.min_connections)
            .max_connections(config.max_connections)
            .acquire_timeout(config.connect_timeout())
            .idle_timeout(Some(config.idle_timeout()));

        match options.connect(&config.url).await {
            Ok(pool) => {
                info!(
                    min = config.min_connections,
                    max = config.max_connections,
                    "MySQL pool connected"
                );
                Ok(Self { pool })
            }
            Err(e) => {
                warn!(error = %e, "MySQL pool failed to connect");
                Err(StorefrontError::Database(format!("cannot connect to MySQL: {e}")))
            }
        }
    }

    #[must_use]
    pub fn from_pool(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SqlPool for DatabasePool {
    fn mysql(&self) -> &MySqlPool {
        &self.pool
    }

    async fn ping(&self) -> StorefrontResult<()> {
        sqlx::query_scalar::<_, i64>("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .map(|_| ())
            .map_err(|e| StorefrontError::Database(format!("ping failed: {e}")))
    }

    async fn migrate(&self) -> StorefrontResult<()> {
        sqlx::migrate!("../../migrations")
            .run(&self.pool)
            .await
            .map_err(|e| StorefrontError::Database(format!("migrations failed: {e}")))?;
        info!("Schema migrations applied");
        Ok(())
    }

    async fn close(&self) {
        self.pool.close().await;
        info!("MySQL pool closed");
    }
}

#[async_trait]
impl HealthCheck for DatabasePool {
    fn name(&self) -> &str {
        "database"
    }

    async fn check(&self) -> HealthStatus {
        self.ping()
            .await
            .map_or_else(|e| HealthStatus::Unhealthy(e.to_string()), |()| HealthStatus::Healthy)
    }
}

impl std::fmt::Debug for DatabasePool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DatabasePool")
            .field("size", &self.pool.size())
            .field("idle", &self.pool.num_idle())
            .finish()
    }
}

/// Connects and, unless `run_migrations` is off, brings the schema up to date.
pub async fn create_pool(config: &DatabaseConfig) -> StorefrontResult<Arc<DatabasePool>> {
    let pool = DatabasePool::connect(config).await?;
    if config.run_migrations {
        pool.migrate().await?;
    }
    Ok(Arc::new(pool))
}
