//! Product payloads and the list query.

use super::{deserialize_optional_price, deserialize_price, deserialize_some, format_price};
use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use storefront_core::validation::rules::{http_url, non_negative_price, not_blank, price_precision};
use storefront_core::{
    CategoryId, PageRequest, ProductFilter, ProductId, ProductOrdering, ProductView, UserId,
};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

/// Create (POST) and replace (PUT) body. The owner always comes from the
/// caller's credentials.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct ProductRequest {
    #[validate(length(min = 1, max = 100), custom(function = "not_blank"))]
    pub name: String,

    #[serde(deserialize_with = "deserialize_price")]
    #[schema(value_type = String, example = "19.99")]
    #[validate(custom(function = "non_negative_price"), custom(function = "price_precision"))]
    pub price: BigDecimal,

    #[validate(length(max = 255), custom(function = "http_url"))]
    pub url: String,

    #[serde(default)]
    #[validate(length(max = 255))]
    pub image: Option<String>,

    #[serde(default)]
    pub category: Option<CategoryId>,
}

/// Partial update (PATCH) body.
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct ProductPatchRequest {
    #[validate(length(min = 1, max = 100), custom(function = "not_blank"))]
    pub name: Option<String>,

    #[serde(default, deserialize_with = "deserialize_optional_price")]
    #[schema(value_type = Option<String>, example = "19.99")]
    #[validate(custom(function = "non_negative_price"), custom(function = "price_precision"))]
    pub price: Option<BigDecimal>,

    #[validate(length(max = 255), custom(function = "http_url"))]
    pub url: Option<String>,

    /// `null` clears the image.
    #[serde(default, deserialize_with = "deserialize_some")]
    #[schema(value_type = Option<String>)]
    #[validate(length(max = 255))]
    pub image: Option<Option<String>>,

    /// `null` removes the product from its category.
    #[serde(default, deserialize_with = "deserialize_some")]
    #[schema(value_type = Option<i64>)]
    pub category: Option<Option<CategoryId>>,
}

/// Compact product row for list responses.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
pub struct ProductListItem {
    pub id: ProductId,
    pub name: String,
    /// Owner's username.
    pub user: String,
    /// Category name.
    pub category: Option<String>,
    pub image: Option<String>,
    #[schema(example = "19.99")]
    pub price: String,
}

impl From<ProductView> for ProductListItem {
    fn from(view: ProductView) -> Self {
        Self {
            id: view.product.id,
            name: view.product.name,
            user: view.owner.username,
            category: view.category.map(|c| c.name),
            image: view.product.image,
            price: format_price(&view.product.price),
        }
    }
}

/// Owner block of the product detail.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
pub struct OwnerInfo {
    pub id: UserId,
    pub username: String,
    pub full_name: String,
    pub avatar: Option<String>,
}

/// Category block of the product detail.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
pub struct CategoryInfo {
    pub id: CategoryId,
    pub slug: String,
    pub name: String,
}

/// Full product representation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
pub struct ProductDetail {
    pub id: ProductId,
    pub name: String,
    #[schema(example = "19.99")]
    pub price: String,
    pub url: String,
    /// Owner id.
    pub user: UserId,
    pub user_info: OwnerInfo,
    /// Category id.
    pub category: Option<CategoryId>,
    pub category_info: Option<CategoryInfo>,
    pub image: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<ProductView> for ProductDetail {
    fn from(view: ProductView) -> Self {
        let ProductView {
            product,
            owner,
            category,
        } = view;
        Self {
            id: product.id,
            name: product.name,
            price: format_price(&product.price),
            url: product.url,
            user: product.user_id,
            user_info: OwnerInfo {
                id: owner.id,
                full_name: owner.full_name(),
                username: owner.username,
                avatar: owner.avatar,
            },
            category: product.category_id,
            category_info: category.map(|c| CategoryInfo {
                id: c.id,
                slug: c.slug,
                name: c.name,
            }),
            image: product.image,
            created_at: product.created_at,
            updated_at: product.updated_at,
        }
    }
}

/// Query string accepted by the product list endpoint.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ProductListQuery {
    /// Free-text search over name, url, category name and owner username.
    pub q: Option<String>,
    /// Category id filter.
    pub category: Option<i64>,
    /// One of `created_at`, `updated_at`, `name`, `price`, optionally prefixed
    /// with `-`. Unrecognized values fall back to `-created_at`.
    pub ordering: Option<String>,
    /// Page number, starting at 1.
    pub page: Option<u32>,
    /// Page size, at most 100.
    pub size: Option<u32>,
}

impl ProductListQuery {
    /// Builds the repository filter from the recognized parameters.
    #[must_use]
    pub fn filter(&self) -> ProductFilter {
        let search = self
            .q
            .as_deref()
            .map(str::trim)
            .filter(|q| !q.is_empty())
            .map(ToString::to_string);

        ProductFilter {
            search,
            category_id: self.category.map(CategoryId),
            ordering: self
                .ordering
                .as_deref()
                .and_then(ProductOrdering::parse)
                .unwrap_or_default(),
        }
    }

    /// Returns the requested page, clamped to valid bounds.
    #[must_use]
    pub fn page_request(&self) -> PageRequest {
        PageRequest::new(
            self.page.unwrap_or(1),
            self.size.unwrap_or(PageRequest::DEFAULT_SIZE),
        )
    }
}
