//! Product endpoints.
//!
//! Anyone may read. Creating needs credentials and binds the caller as
//! owner; only the owner may change or delete a product.

use crate::{
    extractors::{AuthenticatedUser, OptionalUser, ValidatedJson},
    responses::{created, no_content, ok, ApiResult, AppError, CreatedResult},
    state::AppState,
};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, MethodRouter},
    Router,
};
use storefront_core::{Page, ProductId};
use storefront_service::{ProductDetail, ProductListItem, ProductListQuery, ProductPatchRequest, ProductRequest};
use tracing::debug;

/// Creates the product router. Every path also answers with a trailing slash.
pub fn router() -> Router<AppState> {
    let collection = || get(list_products).post(create_product);
    let item = || -> MethodRouter<AppState> {
        get(get_product)
            .put(replace_product)
            .patch(patch_product)
            .delete(delete_product)
    };

    Router::new()
        .route("/products", collection())
        .route("/products/", collection())
        .route("/products/:id", item())
        .route("/products/:id/", item())
}

/// Search products.
///
/// Results are cached per caller and per filter, so anonymous and
/// authenticated callers never share an entry.
#[utoipa::path(
    get,
    path = "/products",
    tag = "products",
    params(ProductListQuery),
    responses(
        (status = 200, description = "A page of products", body = Page<ProductListItem>)
    )
)]
pub async fn list_products(
    State(state): State<AppState>,
    viewer: OptionalUser,
    Query(query): Query<ProductListQuery>,
) -> ApiResult<Page<ProductListItem>> {
    debug!("Listing products: {:?}", query);

    let page = state.product_service.list_products(viewer.user_id(), &query).await?;
    ok(page)
}

/// Get a product with its owner and category.
#[utoipa::path(
    get,
    path = "/products/{id}",
    tag = "products",
    params(("id" = i64, Path, description = "Product id")),
    responses(
        (status = 200, description = "Product", body = ProductDetail),
        (status = 404, description = "Unknown product")
    )
)]
pub async fn get_product(State(state): State<AppState>, Path(id): Path<i64>) -> ApiResult<ProductDetail> {
    let product = state.product_service.get_product(ProductId(id)).await?;
    ok(product)
}

/// Create a product owned by the caller.
#[utoipa::path(
    post,
    path = "/products",
    tag = "products",
    request_body = ProductRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 201, description = "Product created", body = ProductDetail),
        (status = 400, description = "Negative price, bad url or unknown category"),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn create_product(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    ValidatedJson(request): ValidatedJson<ProductRequest>,
) -> CreatedResult<ProductDetail> {
    debug!("Create product request from: {}", user.username);

    let product = state.product_service.create_product(&user, request).await?;
    created(product)
}

/// Replace every writable product field.
#[utoipa::path(
    put,
    path = "/products/{id}",
    tag = "products",
    params(("id" = i64, Path, description = "Product id")),
    request_body = ProductRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Product replaced", body = ProductDetail),
        (status = 400, description = "Invalid fields"),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Not the owner"),
        (status = 404, description = "Unknown product")
    )
)]
pub async fn replace_product(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<i64>,
    ValidatedJson(request): ValidatedJson<ProductRequest>,
) -> ApiResult<ProductDetail> {
    let product = state
        .product_service
        .replace_product(&user, ProductId(id), request)
        .await?;
    ok(product)
}

/// Update the supplied product fields.
#[utoipa::path(
    patch,
    path = "/products/{id}",
    tag = "products",
    params(("id" = i64, Path, description = "Product id")),
    request_body = ProductPatchRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Product updated", body = ProductDetail),
        (status = 400, description = "Invalid fields"),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Not the owner"),
        (status = 404, description = "Unknown product")
    )
)]
pub async fn patch_product(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<i64>,
    ValidatedJson(request): ValidatedJson<ProductPatchRequest>,
) -> ApiResult<ProductDetail> {
    let product = state
        .product_service
        .patch_product(&user, ProductId(id), request)
        .await?;
    ok(product)
}

/// Delete a product.
#[utoipa::path(
    delete,
    path = "/products/{id}",
    tag = "products",
    params(("id" = i64, Path, description = "Product id")),
    security(("bearer_auth" = [])),
    responses(
        (status = 204, description = "Product deleted"),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Not the owner"),
        (status = 404, description = "Unknown product")
    )
)]
pub async fn delete_product(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    debug!("Delete product {} request from: {}", id, user.username);

    state.product_service.delete_product(&user, ProductId(id)).await?;
    Ok(no_content())
}
