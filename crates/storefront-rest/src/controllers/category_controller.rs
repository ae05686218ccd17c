//! Category endpoints. Categories are addressed by slug; reads are public
//! and writes need an authenticated caller.

use crate::{
    extractors::{AuthenticatedUser, ValidatedJson},
    responses::{created, no_content, ok, ApiResult, AppError, CreatedResult},
    state::AppState,
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, MethodRouter},
    Router,
};
use storefront_service::{CategoryPatchRequest, CategoryRequest, CategoryResponse};

/// Creates the category router. Every path also answers with a trailing slash.
pub fn router() -> Router<AppState> {
    let collection = || get(list_categories).post(create_category);
    let item = || -> MethodRouter<AppState> {
        get(get_category)
            .put(replace_category)
            .patch(patch_category)
            .delete(delete_category)
    };

    Router::new()
        .route("/categories", collection())
        .route("/categories/", collection())
        .route("/categories/:slug", item())
        .route("/categories/:slug/", item())
}

/// List categories with their product counts.
#[utoipa::path(
    get,
    path = "/categories",
    tag = "categories",
    responses(
        (status = 200, description = "All categories", body = Vec<CategoryResponse>)
    )
)]
pub async fn list_categories(State(state): State<AppState>) -> ApiResult<Vec<CategoryResponse>> {
    let categories = state.category_service.list_categories().await?;
    ok(categories)
}

/// Get a category by slug.
#[utoipa::path(
    get,
    path = "/categories/{slug}",
    tag = "categories",
    params(("slug" = String, Path, description = "Category slug")),
    responses(
        (status = 200, description = "Category", body = CategoryResponse),
        (status = 404, description = "Unknown slug")
    )
)]
pub async fn get_category(State(state): State<AppState>, Path(slug): Path<String>) -> ApiResult<CategoryResponse> {
    let category = state.category_service.get_category(&slug).await?;
    ok(category)
}

/// Create a category. The slug is derived from the name.
#[utoipa::path(
    post,
    path = "/categories",
    tag = "categories",
    request_body = CategoryRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 201, description = "Category created", body = CategoryResponse),
        (status = 400, description = "Invalid name"),
        (status = 401, description = "Not authenticated"),
        (status = 409, description = "Slug already taken")
    )
)]
pub async fn create_category(
    State(state): State<AppState>,
    _user: AuthenticatedUser,
    ValidatedJson(request): ValidatedJson<CategoryRequest>,
) -> CreatedResult<CategoryResponse> {
    let category = state.category_service.create_category(request).await?;
    created(category)
}

/// Replace a category's name and description.
#[utoipa::path(
    put,
    path = "/categories/{slug}",
    tag = "categories",
    params(("slug" = String, Path, description = "Category slug")),
    request_body = CategoryRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Category replaced", body = CategoryResponse),
        (status = 400, description = "Invalid name"),
        (status = 404, description = "Unknown slug")
    )
)]
pub async fn replace_category(
    State(state): State<AppState>,
    _user: AuthenticatedUser,
    Path(slug): Path<String>,
    ValidatedJson(request): ValidatedJson<CategoryRequest>,
) -> ApiResult<CategoryResponse> {
    let category = state.category_service.replace_category(&slug, request).await?;
    ok(category)
}

/// Update the supplied category fields.
#[utoipa::path(
    patch,
    path = "/categories/{slug}",
    tag = "categories",
    params(("slug" = String, Path, description = "Category slug")),
    request_body = CategoryPatchRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Category updated", body = CategoryResponse),
        (status = 400, description = "Invalid name"),
        (status = 404, description = "Unknown slug")
    )
)]
pub async fn patch_category(
    State(state): State<AppState>,
    _user: AuthenticatedUser,
    Path(slug): Path<String>,
    ValidatedJson(request): ValidatedJson<CategoryPatchRequest>,
) -> ApiResult<CategoryResponse> {
    let category = state.category_service.patch_category(&slug, request).await?;
    ok(category)
}

/// Delete a category. Its products keep existing without a category.
#[utoipa::path(
    delete,
    path = "/categories/{slug}",
    tag = "categories",
    params(("slug" = String, Path, description = "Category slug")),
    security(("bearer_auth" = [])),
    responses(
        (status = 204, description = "Category deleted"),
        (status = 404, description = "Unknown slug")
    )
)]
pub async fn delete_category(
    State(state): State<AppState>,
    _user: AuthenticatedUser,
    Path(slug): Path<String>,
) -> Result<StatusCode, AppError> {
    state.category_service.delete_category(&slug).await?;
    Ok(no_content())
}
