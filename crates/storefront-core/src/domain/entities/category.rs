//! Category entity.

use crate::{slugify, CategoryId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A product category, addressed by its slug.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    /// Unique, derived from the name when the category is created.
    pub slug: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A category that has not been persisted yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCategory {
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
}

impl NewCategory {
    /// Builds a new category, assigning the slug from the name.
    #[must_use]
    pub fn new(name: String, description: Option<String>) -> Self {
        let slug = slugify(&name);
        Self {
            name,
            slug,
            description,
        }
    }
}

/// A category together with the number of products filed under it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryWithCount {
    pub category: Category,
    pub products_count: i64,
}

/// The category fields embedded in product responses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategorySummary {
    pub id: CategoryId,
    pub slug: String,
    pub name: String,
}

impl From<&Category> for CategorySummary {
    fn from(category: &Category) -> Self {
        Self {
            id: category.id,
            slug: category.slug.clone(),
            name: category.name.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_category_assigns_slug() {
        let category = NewCategory::new("Electronics".to_string(), None);
        assert_eq!(category.slug, "electronics");
        assert_eq!(category.name, "Electronics");
    }

    #[test]
    fn test_new_category_multi_word_slug() {
        let category = NewCategory::new("Sports & Outdoors".to_string(), Some("Gear".to_string()));
        assert_eq!(category.slug, "sports-outdoors");
        assert_eq!(category.description.as_deref(), Some("Gear"));
    }
}
