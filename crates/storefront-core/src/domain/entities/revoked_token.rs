//! Revoked refresh token entity.

use crate::UserId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A refresh token revoked by logout, kept until it would have expired.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RevokedToken {
    /// The token's `jti` claim.
    pub jti: String,
    pub user_id: UserId,
    pub expires_at: DateTime<Utc>,
    pub revoked_at: DateTime<Utc>,
}

impl RevokedToken {
    /// Creates a revocation record stamped with the current time.
    #[must_use]
    pub fn new(jti: String, user_id: UserId, expires_at: DateTime<Utc>) -> Self {
        Self {
            jti,
            user_id,
            expires_at,
            revoked_at: Utc::now(),
        }
    }
}
