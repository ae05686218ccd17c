//! MySQL store of revoked refresh tokens.

use crate::{traits::RevokedTokenRepository, SqlPool};
use async_trait::async_trait;
use chrono::Utc;
use std::sync::Arc;
use storefront_core::{RevokedToken, StorefrontResult};
use tracing::{debug, info};

/// MySQL revoked-token repository implementation.
#[derive(Clone)]
pub struct MySqlRevokedTokenRepository {
    pool: Arc<dyn SqlPool>,
}

impl MySqlRevokedTokenRepository {
    /// Creates a new MySQL revoked-token repository.
    #[must_use]
    pub fn new(pool: Arc<dyn SqlPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RevokedTokenRepository for MySqlRevokedTokenRepository {
    async fn revoke(&self, token: &RevokedToken) -> StorefrontResult<()> {
        debug!("Revoking token {} of user {}", token.jti, token.user_id);

        sqlx::query("INSERT INTO revoked_tokens (jti, user_id, expires_at, revoked_at) VALUES (?, ?, ?, ?)")
            .bind(&token.jti)
            .bind(token.user_id.to_string())
            .bind(token.expires_at)
            .bind(token.revoked_at)
            .execute(self.pool.mysql())
            .await?;

        Ok(())
    }

    async fn is_revoked(&self, jti: &str) -> StorefrontResult<bool> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM revoked_tokens WHERE jti = ?")
            .bind(jti)
            .fetch_one(self.pool.mysql())
            .await?;

        Ok(count > 0)
    }

    async fn purge_expired(&self) -> StorefrontResult<u64> {
        let result = sqlx::query("DELETE FROM revoked_tokens WHERE expires_at < ?")
            .bind(Utc::now())
            .execute(self.pool.mysql())
            .await?;

        let purged = result.rows_affected();
        if purged > 0 {
            info!("Purged {} expired revoked tokens", purged);
        }
        Ok(purged)
    }
}
