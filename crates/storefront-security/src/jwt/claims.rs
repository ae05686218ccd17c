//! The payload carried inside access and refresh tokens.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use storefront_core::UserId;
use uuid::Uuid;

/// Registered JWT claims plus the user fields handlers need without a lookup.
///
/// `sub` serializes as the plain UUID string. `jti` is unique per token and is
/// what logout writes to the revocation table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub sub: UserId,
    pub username: String,
    pub email: String,
    #[serde(default)]
    pub is_staff: bool,
    #[serde(rename = "typ")]
    pub token_type: TokenType,
    pub iss: String,
    pub aud: String,
    pub iat: i64,
    pub nbf: i64,
    pub exp: i64,
    pub jti: String,
}

/// Who a token is being issued to.
#[derive(Debug, Clone, Copy)]
pub struct TokenSubject<'a> {
    pub user_id: UserId,
    pub username: &'a str,
    pub email: &'a str,
    pub is_staff: bool,
}

impl Claims {
    #[must_use]
    pub fn new(
        subject: TokenSubject<'_>,
        token_type: TokenType,
        issuer: String,
        audience: String,
        expires_at: DateTime<Utc>,
    ) -> Self {
        let issued_at = Utc::now().timestamp();
        Self {
            sub: subject.user_id,
            username: subject.username.to_owned(),
            email: subject.email.to_owned(),
            is_staff: subject.is_staff,
            token_type,
            iss: issuer,
            aud: audience,
            iat: issued_at,
            nbf: issued_at,
            exp: expires_at.timestamp(),
            jti: Uuid::now_v7().simple().to_string(),
        }
    }

    #[must_use]
    pub const fn user_id(&self) -> UserId {
        self.sub
    }

    #[must_use]
    pub fn is_expired(&self) -> bool {
        self.exp < Utc::now().timestamp()
    }

    /// `exp` as a timestamp; an out-of-range value reads as already expired.
    #[must_use]
    pub fn expires_at(&self) -> DateTime<Utc> {
        DateTime::from_timestamp(self.exp, 0).unwrap_or_default()
    }

    #[must_use]
    pub fn is_access_token(&self) -> bool {
        self.token_type == TokenType::Access
    }

    #[must_use]
    pub fn is_refresh_token(&self) -> bool {
        self.token_type == TokenType::Refresh
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenType {
    Access,
    Refresh,
}

impl TokenType {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Access => "access",
            Self::Refresh => "refresh",
        }
    }
}

impl std::fmt::Display for TokenType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
