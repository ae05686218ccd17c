//! OpenAPI documentation for the storefront REST API.

use crate::controllers::{ComponentHealth, HealthResponse, ReadinessResponse};
use storefront_core::{CategoryId, ErrorResponse, FieldError, PageInfo, ProductId, UserId};
use storefront_service::{
    AuthResponse, CategoryInfo, CategoryPatchRequest, CategoryRequest, CategoryResponse, ChangePasswordRequest,
    LoginRequest, LogoutRequest, MessageResponse, OwnerInfo, ProductDetail, ProductListItem, ProductPatchRequest,
    ProductRequest, ProfileResponse, ProfileUpdateRequest, RefreshTokenRequest, RegisterRequest,
    TokenRefreshResponse,
};
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

/// OpenAPI documentation root.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Storefront API",
        version = "1.0.0",
        description = "Catalog of categories and products with account management",
        license(
            name = "MIT",
            url = "https://opensource.org/licenses/MIT"
        )
    ),
    servers(
        (url = "/api/v1", description = "API v1")
    ),
    paths(
        // Auth endpoints
        crate::controllers::auth_controller::register,
        crate::controllers::auth_controller::login,
        crate::controllers::auth_controller::refresh_token,
        crate::controllers::auth_controller::logout,
        crate::controllers::auth_controller::get_profile,
        crate::controllers::auth_controller::update_profile,
        crate::controllers::auth_controller::change_password,
        // Category endpoints
        crate::controllers::category_controller::list_categories,
        crate::controllers::category_controller::get_category,
        crate::controllers::category_controller::create_category,
        crate::controllers::category_controller::replace_category,
        crate::controllers::category_controller::patch_category,
        crate::controllers::category_controller::delete_category,
        // Product endpoints
        crate::controllers::product_controller::list_products,
        crate::controllers::product_controller::get_product,
        crate::controllers::product_controller::create_product,
        crate::controllers::product_controller::replace_product,
        crate::controllers::product_controller::patch_product,
        crate::controllers::product_controller::delete_product,
        // Health endpoints
        crate::controllers::health_controller::health_check,
        crate::controllers::health_controller::readiness_check,
        crate::controllers::health_controller::liveness_check,
    ),
    components(
        schemas(
            UserId,
            CategoryId,
            ProductId,
            PageInfo,
            ErrorResponse,
            FieldError,
            RegisterRequest,
            LoginRequest,
            RefreshTokenRequest,
            LogoutRequest,
            ChangePasswordRequest,
            ProfileUpdateRequest,
            ProfileResponse,
            AuthResponse,
            TokenRefreshResponse,
            MessageResponse,
            CategoryRequest,
            CategoryPatchRequest,
            CategoryResponse,
            ProductRequest,
            ProductPatchRequest,
            ProductListItem,
            ProductDetail,
            OwnerInfo,
            CategoryInfo,
            HealthResponse,
            ReadinessResponse,
            ComponentHealth,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "auth", description = "Registration, tokens and profile"),
        (name = "categories", description = "Product categories"),
        (name = "products", description = "Product catalog"),
        (name = "health", description = "Health check endpoints")
    )
)]
pub struct ApiDoc;

/// Security addon for JWT Bearer authentication.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("JWT Bearer token authentication"))
                        .build(),
                ),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_lists_catalog_paths() {
        let doc = ApiDoc::openapi();
        let paths: Vec<&String> = doc.paths.paths.keys().collect();

        for expected in ["/auth/register", "/categories/{slug}", "/products", "/products/{id}", "/ready"] {
            assert!(paths.iter().any(|p| p.as_str() == expected), "missing {expected}");
        }
    }

    #[test]
    fn test_bearer_scheme_registered() {
        let doc = ApiDoc::openapi();
        let components = doc.components.unwrap();
        assert!(components.security_schemes.contains_key("bearer_auth"));
    }
}
