//! JWT token provider for creating and validating tokens.

use super::{Claims, TokenSubject, TokenType};
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use std::sync::Arc;
use storefront_config::SecurityConfig;
use storefront_core::{StorefrontError, StorefrontResult};
use tracing::{debug, warn};

/// Token pair containing access and refresh tokens.
#[derive(Debug, Clone)]
pub struct TokenPair {
    /// Access token (short-lived).
    pub access_token: String,
    /// Refresh token (long-lived).
    pub refresh_token: String,
    /// Access token expiration timestamp.
    pub access_expires_at: i64,
    /// Refresh token expiration timestamp.
    pub refresh_expires_at: i64,
    /// Token type (always "Bearer").
    pub token_type: String,
}

/// JWT token provider service.
#[derive(Clone)]
pub struct TokenProvider {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    config: Arc<SecurityConfig>,
    validation: Validation,
}

impl TokenProvider {
    /// Creates a new token provider.
    #[must_use]
    pub fn new(config: Arc<SecurityConfig>) -> Self {
        let encoding_key = EncodingKey::from_secret(config.jwt_secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.jwt_secret.as_bytes());

        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[&config.jwt_issuer]);
        validation.set_audience(&[&config.jwt_audience]);
        validation.validate_exp = true;
        validation.validate_nbf = true;
        validation.leeway = 0;

        Self {
            encoding_key,
            decoding_key,
            config,
            validation,
        }
    }

    /// Generates an access/refresh token pair for a user.
    pub fn generate_tokens(&self, subject: TokenSubject<'_>) -> StorefrontResult<TokenPair> {
        let access_expires_at = Self::expiry(self.config.jwt_access_expiration_secs);
        let refresh_expires_at = Self::expiry(self.config.jwt_refresh_expiration_secs);

        let access_token = self.encode_claims(subject, TokenType::Access, access_expires_at)?;
        let refresh_token = self.encode_claims(subject, TokenType::Refresh, refresh_expires_at)?;

        debug!("Generated token pair for user {}", subject.user_id);
        Ok(TokenPair {
            access_token,
            refresh_token,
            access_expires_at: access_expires_at.timestamp(),
            refresh_expires_at: refresh_expires_at.timestamp(),
            token_type: "Bearer".to_string(),
        })
    }

    fn expiry(secs: u64) -> DateTime<Utc> {
        Utc::now() + Duration::seconds(i64::try_from(secs).unwrap_or(i64::MAX / 1000))
    }

    fn encode_claims(
        &self,
        subject: TokenSubject<'_>,
        token_type: TokenType,
        expires_at: DateTime<Utc>,
    ) -> StorefrontResult<String> {
        let claims = Claims::new(
            subject,
            token_type,
            self.config.jwt_issuer.clone(),
            self.config.jwt_audience.clone(),
            expires_at,
        );

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| StorefrontError::Internal(format!("Failed to generate {} token: {}", token_type, e)))
    }

    /// Validates a token and returns the claims.
    pub fn validate_token(&self, token: &str) -> StorefrontResult<Claims> {
        let token_data = decode::<Claims>(token, &self.decoding_key, &self.validation).map_err(|e| {
            warn!("Token validation failed: {}", e);
            match e.kind() {
                ErrorKind::ExpiredSignature => StorefrontError::TokenExpired,
                ErrorKind::InvalidToken | ErrorKind::InvalidSignature => {
                    StorefrontError::InvalidToken("Invalid token signature".to_string())
                }
                ErrorKind::InvalidIssuer => StorefrontError::InvalidToken("Invalid token issuer".to_string()),
                ErrorKind::InvalidAudience => StorefrontError::InvalidToken("Invalid token audience".to_string()),
                _ => StorefrontError::InvalidToken(e.to_string()),
            }
        })?;

        Ok(token_data.claims)
    }

    /// Validates an access token specifically.
    pub fn validate_access_token(&self, token: &str) -> StorefrontResult<Claims> {
        let claims = self.validate_token(token)?;

        if !claims.is_access_token() {
            return Err(StorefrontError::InvalidToken("Expected access token".to_string()));
        }

        Ok(claims)
    }

    /// Validates a refresh token specifically.
    ///
    /// Revocation is not checked here; that needs the revocation store.
    pub fn validate_refresh_token(&self, token: &str) -> StorefrontResult<Claims> {
        let claims = self.validate_token(token)?;

        if !claims.is_refresh_token() {
            return Err(StorefrontError::InvalidToken("Expected refresh token".to_string()));
        }

        Ok(claims)
    }
}

impl std::fmt::Debug for TokenProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenProvider")
            .field("issuer", &self.config.jwt_issuer)
            .field("audience", &self.config.jwt_audience)
            .finish_non_exhaustive()
    }
}
