//! In-memory store of revoked refresh tokens.

use super::InMemoryDatabase;
use crate::traits::RevokedTokenRepository;
use async_trait::async_trait;
use chrono::Utc;
use std::sync::Arc;
use storefront_core::{RevokedToken, StorefrontError, StorefrontResult};

/// In-memory revoked-token repository.
#[derive(Debug, Clone)]
pub struct InMemoryRevokedTokenRepository {
    db: Arc<InMemoryDatabase>,
}

impl InMemoryRevokedTokenRepository {
    /// Creates a repository over `db`.
    #[must_use]
    pub fn new(db: Arc<InMemoryDatabase>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl RevokedTokenRepository for InMemoryRevokedTokenRepository {
    async fn revoke(&self, token: &RevokedToken) -> StorefrontResult<()> {
        let mut tables = self.db.tables().write();
        if tables.revoked_tokens.contains_key(&token.jti) {
            return Err(StorefrontError::conflict("Token already revoked"));
        }
        tables.revoked_tokens.insert(token.jti.clone(), token.clone());
        Ok(())
    }

    async fn is_revoked(&self, jti: &str) -> StorefrontResult<bool> {
        Ok(self.db.tables().read().revoked_tokens.contains_key(jti))
    }

    async fn purge_expired(&self) -> StorefrontResult<u64> {
        let now = Utc::now();
        let mut tables = self.db.tables().write();
        let before = tables.revoked_tokens.len();
        tables.revoked_tokens.retain(|_, token| token.expires_at >= now);
        Ok((before - tables.revoked_tokens.len()) as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use storefront_core::UserId;

    #[tokio::test]
    async fn test_revoke_and_purge() {
        let repo = InMemoryDatabase::new().revoked_tokens();
        let user_id = UserId::new();
        repo.revoke(&RevokedToken::new("live".to_string(), user_id, Utc::now() + Duration::hours(1)))
            .await
            .unwrap();
        repo.revoke(&RevokedToken::new("stale".to_string(), user_id, Utc::now() - Duration::hours(1)))
            .await
            .unwrap();

        assert!(repo.is_revoked("live").await.unwrap());
        assert!(!repo.is_revoked("unknown").await.unwrap());

        assert_eq!(repo.purge_expired().await.unwrap(), 1);
        assert!(repo.is_revoked("live").await.unwrap());
        assert!(!repo.is_revoked("stale").await.unwrap());
    }
}
