//! Category payloads.

use super::deserialize_some;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use storefront_core::validation::rules::not_blank;
use storefront_core::{CategoryId, CategoryWithCount};
use utoipa::ToSchema;
use validator::Validate;

/// Create (POST) and replace (PUT) body. The slug is derived from the
/// name at creation and never changes afterwards.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CategoryRequest {
    #[validate(length(min = 1, max = 100), custom(function = "not_blank"))]
    pub name: String,

    #[serde(default)]
    pub description: Option<String>,
}

/// Partial update (PATCH) body.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
pub struct CategoryPatchRequest {
    #[validate(length(min = 1, max = 100), custom(function = "not_blank"))]
    pub name: Option<String>,

    /// `null` clears the description.
    #[serde(default, deserialize_with = "deserialize_some")]
    #[schema(value_type = Option<String>)]
    pub description: Option<Option<String>>,
}

/// Category as returned by list and detail endpoints.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
pub struct CategoryResponse {
    pub id: CategoryId,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub products_count: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<CategoryWithCount> for CategoryResponse {
    fn from(value: CategoryWithCount) -> Self {
        let CategoryWithCount {
            category,
            products_count,
        } = value;
        Self {
            id: category.id,
            name: category.name,
            slug: category.slug,
            description: category.description,
            products_count,
            created_at: category.created_at,
            updated_at: category.updated_at,
        }
    }
}
