//! Account and credential endpoints.

use crate::{
    extractors::{AuthenticatedUser, JsonBody, ValidatedJson},
    responses::{created, ok, ApiResult, CreatedResult},
    state::AppState,
};
use axum::{
    extract::State,
    routing::{get, post},
    Router,
};
use storefront_service::{
    AuthResponse, ChangePasswordRequest, LoginRequest, LogoutRequest, MessageResponse, ProfileResponse,
    ProfileUpdateRequest, RefreshTokenRequest, RegisterRequest, TokenRefreshResponse,
};
use tracing::debug;

/// Creates the auth router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/refresh", post(refresh_token))
        .route("/logout", post(logout))
        .route("/profile", get(get_profile).put(update_profile).patch(update_profile))
        .route("/change-password", post(change_password))
}

/// Register a new account.
#[utoipa::path(
    post,
    path = "/auth/register",
    tag = "auth",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Account created", body = AuthResponse),
        (status = 400, description = "Invalid fields or password mismatch"),
        (status = 409, description = "Username or email taken")
    )
)]
pub async fn register(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<RegisterRequest>,
) -> CreatedResult<AuthResponse> {
    debug!("Registration request for: {}", request.username);

    let response = state.auth_service.register(request).await?;
    created(response)
}

/// Log in with email and password.
#[utoipa::path(
    post,
    path = "/auth/login",
    tag = "auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Credentials issued", body = AuthResponse),
        (status = 401, description = "Invalid credentials or inactive account")
    )
)]
pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<LoginRequest>,
) -> ApiResult<AuthResponse> {
    debug!("Login request for: {}", request.email);

    let response = state.auth_service.login(request).await?;
    ok(response)
}

/// Exchange a refresh token for a new token pair.
#[utoipa::path(
    post,
    path = "/auth/refresh",
    tag = "auth",
    request_body = RefreshTokenRequest,
    responses(
        (status = 200, description = "Tokens rotated", body = TokenRefreshResponse),
        (status = 401, description = "Invalid, expired or revoked refresh token")
    )
)]
pub async fn refresh_token(
    State(state): State<AppState>,
    JsonBody(request): JsonBody<RefreshTokenRequest>,
) -> ApiResult<TokenRefreshResponse> {
    debug!("Token refresh request");

    let response = state.auth_service.refresh_token(request).await?;
    ok(response)
}

/// Revoke a refresh token.
#[utoipa::path(
    post,
    path = "/auth/logout",
    tag = "auth",
    request_body = LogoutRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Token revoked", body = MessageResponse),
        (status = 400, description = "Missing or invalid refresh token"),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn logout(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    JsonBody(request): JsonBody<LogoutRequest>,
) -> ApiResult<MessageResponse> {
    debug!("Logout request for: {}", user.username);

    let response = state.auth_service.logout(&user, request).await?;
    ok(response)
}

/// Get the caller's profile.
#[utoipa::path(
    get,
    path = "/auth/profile",
    tag = "auth",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Profile", body = ProfileResponse),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn get_profile(State(state): State<AppState>, user: AuthenticatedUser) -> ApiResult<ProfileResponse> {
    let profile = state.auth_service.get_profile(&user).await?;
    ok(profile)
}

/// Update the caller's profile. PUT and PATCH both leave absent fields alone.
#[utoipa::path(
    patch,
    path = "/auth/profile",
    tag = "auth",
    request_body = ProfileUpdateRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Updated profile", body = ProfileResponse),
        (status = 400, description = "Invalid fields"),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn update_profile(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    ValidatedJson(request): ValidatedJson<ProfileUpdateRequest>,
) -> ApiResult<ProfileResponse> {
    debug!("Profile update for: {}", user.username);

    let profile = state.auth_service.update_profile(&user, request).await?;
    ok(profile)
}

/// Change the caller's password.
#[utoipa::path(
    post,
    path = "/auth/change-password",
    tag = "auth",
    request_body = ChangePasswordRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Password changed", body = MessageResponse),
        (status = 400, description = "Wrong current password, mismatch or weak password"),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn change_password(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    JsonBody(request): JsonBody<ChangePasswordRequest>,
) -> ApiResult<MessageResponse> {
    debug!("Password change for: {}", user.username);

    let response = state.auth_service.change_password(&user, request).await?;
    ok(response)
}
