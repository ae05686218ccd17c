//! Caller identity extractors.
//!
//! [`auth_middleware`](crate::middleware::auth_middleware) validates the
//! bearer token once and stores the claims in the request extensions;
//! these extractors only read them back.

use crate::responses::AppError;
use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};
use storefront_core::{StorefrontError, UserId};
use storefront_security::Claims;

/// Claims of a caller that presented a valid access token.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser(pub Claims);

impl std::ops::Deref for AuthenticatedUser {
    type Target = Claims;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthenticatedUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        if let Some(claims) = parts.extensions.get::<Claims>() {
            return Ok(Self(claims.clone()));
        }

        let message = match parts.headers.get(AUTHORIZATION).and_then(|h| h.to_str().ok()) {
            None => "Authentication credentials were not provided.",
            Some(header) if !header.starts_with("Bearer ") => "Invalid authorization format",
            Some(_) => "Given token not valid for any token type",
        };
        Err(AppError(StorefrontError::unauthorized(message)))
    }
}

/// Claims of the caller when a valid token was presented, `None` otherwise.
#[derive(Debug, Clone)]
pub struct OptionalUser(pub Option<Claims>);

impl OptionalUser {
    /// The caller's id, if authenticated.
    #[must_use]
    pub fn user_id(&self) -> Option<UserId> {
        self.0.as_ref().map(Claims::user_id)
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for OptionalUser
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self(parts.extensions.get::<Claims>().cloned()))
    }
}
