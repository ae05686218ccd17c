//! Registration, credentials and the caller's own profile.

use crate::cache::{CacheAside, CacheKeys, InvalidationPolicy};
use crate::dto::{
    AuthResponse, ChangePasswordRequest, LoginRequest, LogoutRequest, MessageResponse, ProfileResponse,
    ProfileUpdateRequest, RefreshTokenRequest, RegisterRequest, TokenRefreshResponse,
};
use async_trait::async_trait;
use std::sync::Arc;
use storefront_core::{
    Email, Interface, ProfileChanges, RevokedToken, StorefrontError, StorefrontResult, User, ValidateExt,
};
use storefront_repository::{ProductRepository, RevokedTokenRepository, UserRepository};
use storefront_security::{Claims, PasswordHasher, TokenPair, TokenProvider, TokenSubject};
use tracing::{debug, info, warn};

/// Authentication and profile service.
#[async_trait]
pub trait AuthService: Interface + Send + Sync {
    /// Creates an account and issues credentials for it.
    async fn register(&self, request: RegisterRequest) -> StorefrontResult<AuthResponse>;

    /// Authenticates by email and password.
    async fn login(&self, request: LoginRequest) -> StorefrontResult<AuthResponse>;

    /// Exchanges a refresh token for a new pair. The used token is revoked.
    async fn refresh_token(&self, request: RefreshTokenRequest) -> StorefrontResult<TokenRefreshResponse>;

    /// Validates an access token and returns its claims.
    async fn validate_token(&self, token: &str) -> StorefrontResult<Claims>;

    /// Revokes the caller's refresh token.
    async fn logout(&self, claims: &Claims, request: LogoutRequest) -> StorefrontResult<MessageResponse>;

    /// Returns the caller's profile.
    async fn get_profile(&self, claims: &Claims) -> StorefrontResult<ProfileResponse>;

    /// Applies a profile update and returns the new profile.
    async fn update_profile(
        &self,
        claims: &Claims,
        request: ProfileUpdateRequest,
    ) -> StorefrontResult<ProfileResponse>;

    /// Changes the caller's password after checking the current one.
    async fn change_password(
        &self,
        claims: &Claims,
        request: ChangePasswordRequest,
    ) -> StorefrontResult<MessageResponse>;
}

/// Authentication service implementation.
pub struct AuthServiceImpl {
    users: Arc<dyn UserRepository>,
    products: Arc<dyn ProductRepository>,
    revoked_tokens: Arc<dyn RevokedTokenRepository>,
    password_hasher: Arc<PasswordHasher>,
    token_provider: Arc<TokenProvider>,
    cache: CacheAside,
    keys: CacheKeys,
    invalidation: InvalidationPolicy,
}

impl AuthServiceImpl {
    /// Creates a new authentication service.
    pub fn new(
        users: Arc<dyn UserRepository>,
        products: Arc<dyn ProductRepository>,
        revoked_tokens: Arc<dyn RevokedTokenRepository>,
        password_hasher: Arc<PasswordHasher>,
        token_provider: Arc<TokenProvider>,
        cache: CacheAside,
        keys: CacheKeys,
    ) -> Self {
        let invalidation = InvalidationPolicy::new(cache.clone(), keys.clone());
        Self {
            users,
            products,
            revoked_tokens,
            password_hasher,
            token_provider,
            cache,
            keys,
            invalidation,
        }
    }

    fn issue_tokens(&self, user: &User) -> StorefrontResult<TokenPair> {
        self.token_provider.generate_tokens(TokenSubject {
            user_id: user.id,
            username: &user.username,
            email: user.email.as_str(),
            is_staff: user.is_staff,
        })
    }

    async fn auth_response(&self, user: &User, message: &str) -> StorefrontResult<AuthResponse> {
        let tokens = self.issue_tokens(user)?;
        let list_count = self.products.count_by_owner(user.id).await?;

        Ok(AuthResponse {
            user: ProfileResponse::new(user, list_count),
            refresh: tokens.refresh_token,
            access: tokens.access_token,
            message: message.to_string(),
        })
    }

    async fn current_user(&self, claims: &Claims) -> StorefrontResult<User> {
        let user_id = claims.user_id();
        self.users
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| StorefrontError::not_found("User", user_id))
    }

    async fn load_profile(&self, user: &User) -> StorefrontResult<ProfileResponse> {
        let list_count = self.products.count_by_owner(user.id).await?;
        Ok(ProfileResponse::new(user, list_count))
    }

    /// Decodes a refresh token and checks it has not been revoked.
    async fn live_refresh_claims(&self, token: &str) -> StorefrontResult<Claims> {
        let claims = self.token_provider.validate_refresh_token(token)?;
        if self.revoked_tokens.is_revoked(&claims.jti).await? {
            warn!("Revoked refresh token presented for user {}", claims.user_id());
            return Err(StorefrontError::InvalidToken("Token is blacklisted".to_string()));
        }
        Ok(claims)
    }

    async fn revoke(&self, claims: &Claims) -> StorefrontResult<()> {
        let token = RevokedToken::new(claims.jti.clone(), claims.user_id(), claims.expires_at());
        self.revoked_tokens.revoke(&token).await
    }
}

/// Rejects passwords equal to the username or the email's local part.
fn check_password_similarity(password: &str, username: &str, email: &Email) -> StorefrontResult<()> {
    let password = password.to_lowercase();
    if password == username.to_lowercase() || password == email.local_part() {
        return Err(StorefrontError::invalid_field(
            "password",
            "The password is too similar to the username or email.",
            "password_too_similar",
        ));
    }
    Ok(())
}

#[async_trait]
impl AuthService for AuthServiceImpl {
    async fn register(&self, request: RegisterRequest) -> StorefrontResult<AuthResponse> {
        debug!("Registering user: {}", request.username);

        request.validate_request()?;

        if request.password != request.password_confirm {
            return Err(StorefrontError::invalid_field(
                "password",
                "Password fields didn't match",
                "password_mismatch",
            ));
        }

        let email = Email::new(&request.email)
            .map_err(|e| StorefrontError::invalid_field("email", &e.to_string(), "invalid_email"))?;
        check_password_similarity(&request.password, &request.username, &email)?;

        if self.users.exists_by_username(&request.username).await? {
            return Err(StorefrontError::Conflict(
                "A user with that username already exists.".to_string(),
            ));
        }
        if self.users.exists_by_email(email.as_str()).await? {
            return Err(StorefrontError::Conflict("A user with that email already exists.".to_string()));
        }

        let password_hash = self.password_hasher.hash(&request.password)?;
        let user = User::new(
            request.username,
            email,
            password_hash,
            request.first_name,
            request.last_name,
        );
        let saved = self.users.save(&user).await?;

        info!("User registered: {}", saved.id);
        self.auth_response(&saved, "User registered successfully").await
    }

    async fn login(&self, request: LoginRequest) -> StorefrontResult<AuthResponse> {
        debug!("Login attempt for: {}", request.email);

        request.validate_request()?;

        let user = self
            .users
            .find_by_email(&request.email.trim().to_lowercase())
            .await?
            .ok_or_else(|| {
                warn!("Login failed: no account for {}", request.email);
                StorefrontError::InvalidCredentials
            })?;

        if !self.password_hasher.verify(&request.password, &user.password_hash)? {
            warn!("Login failed: invalid password - {}", user.id);
            return Err(StorefrontError::InvalidCredentials);
        }

        if !user.can_login() {
            warn!("Login failed: inactive account - {}", user.id);
            return Err(StorefrontError::unauthorized("User is not active"));
        }

        info!("User logged in: {}", user.id);
        self.auth_response(&user, "User logged in successfully").await
    }

    async fn refresh_token(&self, request: RefreshTokenRequest) -> StorefrontResult<TokenRefreshResponse> {
        debug!("Refreshing token");

        let claims = self.live_refresh_claims(&request.refresh).await?;
        let user = self
            .users
            .find_by_id(claims.user_id())
            .await?
            .ok_or_else(|| StorefrontError::InvalidToken("User no longer exists".to_string()))?;

        if !user.can_login() {
            return Err(StorefrontError::unauthorized("User is not active"));
        }

        self.revoke(&claims).await?;
        let tokens = self.issue_tokens(&user)?;

        info!("Token refreshed for user: {}", user.id);
        Ok(TokenRefreshResponse {
            access: tokens.access_token,
            refresh: tokens.refresh_token,
        })
    }

    async fn validate_token(&self, token: &str) -> StorefrontResult<Claims> {
        self.token_provider.validate_access_token(token)
    }

    async fn logout(&self, claims: &Claims, request: LogoutRequest) -> StorefrontResult<MessageResponse> {
        let user_id = claims.user_id();
        debug!("Logging out user: {}", user_id);

        let token = request
            .refresh_token
            .filter(|t| !t.trim().is_empty())
            .ok_or_else(|| StorefrontError::validation("Refresh token is required"))?;

        let refresh_claims = match self.live_refresh_claims(&token).await {
            Ok(refresh_claims) if refresh_claims.user_id() == user_id => refresh_claims,
            Ok(_) | Err(StorefrontError::InvalidToken(_) | StorefrontError::TokenExpired) => {
                return Err(StorefrontError::validation("Invalid refresh token"));
            }
            Err(e) => return Err(e),
        };

        match self.revoke(&refresh_claims).await {
            Ok(()) => {}
            // Revoked concurrently by another request.
            Err(StorefrontError::Conflict(_)) => return Err(StorefrontError::validation("Invalid refresh token")),
            Err(e) => return Err(e),
        }

        info!("User logged out: {}", user_id);
        Ok(MessageResponse::new("Logout successful!"))
    }

    async fn get_profile(&self, claims: &Claims) -> StorefrontResult<ProfileResponse> {
        let key = self.keys.user_profile(claims.user_id());
        if let Some(profile) = self.cache.get::<ProfileResponse>(&key).await {
            return Ok(profile);
        }

        let user = self.current_user(claims).await?;
        let profile = self.load_profile(&user).await?;
        self.cache.set(&key, &profile).await;
        Ok(profile)
    }

    async fn update_profile(
        &self,
        claims: &Claims,
        request: ProfileUpdateRequest,
    ) -> StorefrontResult<ProfileResponse> {
        request.validate_request()?;

        let mut user = self.current_user(claims).await?;
        user.update_profile(ProfileChanges {
            first_name: request.first_name,
            last_name: request.last_name,
            avatar: request.avatar,
            bio: request.bio,
        });
        let updated = self.users.update(&user).await?;
        self.invalidation.profile_written(updated.id).await;

        info!("Profile updated: {}", updated.id);
        self.load_profile(&updated).await
    }

    async fn change_password(
        &self,
        claims: &Claims,
        request: ChangePasswordRequest,
    ) -> StorefrontResult<MessageResponse> {
        let mut user = self.current_user(claims).await?;

        if !self.password_hasher.verify(&request.old_password, &user.password_hash)? {
            warn!("Password change rejected: wrong current password - {}", user.id);
            return Err(StorefrontError::invalid_field(
                "old_password",
                "Old password is incorrect",
                "invalid_password",
            ));
        }

        request.validate_request()?;

        if request.new_password != request.new_password_confirm {
            return Err(StorefrontError::invalid_field(
                "new_password",
                "Password fields didn't match.",
                "password_mismatch",
            ));
        }
        check_password_similarity(&request.new_password, &user.username, &user.email)
            .map_err(|_| {
                StorefrontError::invalid_field(
                    "new_password",
                    "The password is too similar to the username or email.",
                    "password_too_similar",
                )
            })?;

        user.update_password(self.password_hasher.hash(&request.new_password)?);
        let updated = self.users.update(&user).await?;
        self.invalidation.profile_written(updated.id).await;

        info!("Password changed for user: {}", updated.id);
        Ok(MessageResponse::new("Password changed successfully"))
    }
}

impl std::fmt::Debug for AuthServiceImpl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthServiceImpl").finish_non_exhaustive()
    }
}
