//! Product entity and listing filters.

use super::{CategorySummary, UserSummary};
use crate::{CategoryId, ProductId, UserId};
use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A catalog product owned by the user who created it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    /// `DECIMAL(10, 2)`, never negative.
    pub price: BigDecimal,
    /// Unique http(s) URL of the product page.
    pub url: String,
    pub image: Option<String>,
    /// Cleared when the category is deleted.
    pub category_id: Option<CategoryId>,
    pub user_id: UserId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Checks whether `user_id` owns this product.
    #[must_use]
    pub fn is_owned_by(&self, user_id: UserId) -> bool {
        self.user_id == user_id
    }
}

/// A product that has not been persisted yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewProduct {
    pub name: String,
    pub price: BigDecimal,
    pub url: String,
    pub image: Option<String>,
    pub category_id: Option<CategoryId>,
    pub user_id: UserId,
}

/// A product loaded together with its owner and category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductView {
    pub product: Product,
    pub owner: UserSummary,
    pub category: Option<CategorySummary>,
}

/// Sortable product columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProductSortField {
    CreatedAt,
    UpdatedAt,
    Name,
    Price,
}

impl ProductSortField {
    /// Column name as accepted in the `ordering` parameter.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::CreatedAt => "created_at",
            Self::UpdatedAt => "updated_at",
            Self::Name => "name",
            Self::Price => "price",
        }
    }

    fn parse(field: &str) -> Option<Self> {
        match field {
            "created_at" => Some(Self::CreatedAt),
            "updated_at" => Some(Self::UpdatedAt),
            "name" => Some(Self::Name),
            "price" => Some(Self::Price),
            _ => None,
        }
    }
}

/// An ordering directive drawn from the allow-list of sortable columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ProductOrdering {
    pub field: ProductSortField,
    pub descending: bool,
}

impl ProductOrdering {
    /// Parses `name` or `-name` style directives.
    ///
    /// Returns `None` for anything outside the allow-list so callers fall
    /// back to the default ordering instead of passing it to a query.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        let value = value.trim();
        let (descending, field) = match value.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, value),
        };
        ProductSortField::parse(field).map(|field| Self { field, descending })
    }
}

impl Default for ProductOrdering {
    /// Newest first.
    fn default() -> Self {
        Self {
            field: ProductSortField::CreatedAt,
            descending: true,
        }
    }
}

impl fmt::Display for ProductOrdering {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.descending {
            write!(f, "-{}", self.field.as_str())
        } else {
            f.write_str(self.field.as_str())
        }
    }
}

/// Recognized filters of the product listing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct ProductFilter {
    /// Free-text search over name, url, category name and owner username.
    pub search: Option<String>,
    /// Exact category filter.
    pub category_id: Option<CategoryId>,
    pub ordering: ProductOrdering,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ordering_allow_list() {
        let asc = ProductOrdering::parse("price").unwrap();
        assert_eq!(asc.field, ProductSortField::Price);
        assert!(!asc.descending);

        let desc = ProductOrdering::parse("-updated_at").unwrap();
        assert_eq!(desc.field, ProductSortField::UpdatedAt);
        assert!(desc.descending);

        assert!(ProductOrdering::parse("password_hash").is_none());
        assert!(ProductOrdering::parse("price; DROP TABLE products").is_none());
        assert!(ProductOrdering::parse("--price").is_none());
    }

    #[test]
    fn test_ordering_display_round_trips() {
        for value in ["created_at", "-created_at", "name", "-price"] {
            assert_eq!(ProductOrdering::parse(value).unwrap().to_string(), value);
        }
    }

    #[test]
    fn test_default_ordering_newest_first() {
        assert_eq!(ProductOrdering::default().to_string(), "-created_at");
        assert_eq!(ProductFilter::default().ordering, ProductOrdering::default());
    }
}
