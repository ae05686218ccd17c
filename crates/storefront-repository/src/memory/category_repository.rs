//! In-memory category repository.

use super::{InMemoryDatabase, Tables};
use crate::traits::CategoryRepository;
use async_trait::async_trait;
use chrono::Utc;
use std::sync::Arc;
use storefront_core::{Category, CategoryId, CategoryWithCount, NewCategory, StorefrontError, StorefrontResult};

/// In-memory category repository.
#[derive(Debug, Clone)]
pub struct InMemoryCategoryRepository {
    db: Arc<InMemoryDatabase>,
}

impl InMemoryCategoryRepository {
    /// Creates a repository over `db`.
    #[must_use]
    pub fn new(db: Arc<InMemoryDatabase>) -> Self {
        Self { db }
    }
}

fn with_count(tables: &Tables, category: &Category) -> CategoryWithCount {
    let products_count = tables
        .products
        .values()
        .filter(|p| p.category_id == Some(category.id))
        .count();
    CategoryWithCount {
        category: category.clone(),
        products_count: i64::try_from(products_count).unwrap_or(i64::MAX),
    }
}

#[async_trait]
impl CategoryRepository for InMemoryCategoryRepository {
    async fn list_with_counts(&self) -> StorefrontResult<Vec<CategoryWithCount>> {
        self.db.record_list_query();
        let tables = self.db.tables().read();
        let mut categories: Vec<_> = tables.categories.values().map(|c| with_count(&tables, c)).collect();
        categories.sort_by(|a, b| {
            a.category
                .name
                .cmp(&b.category.name)
                .then(a.category.id.cmp(&b.category.id))
        });
        Ok(categories)
    }

    async fn find_by_slug(&self, slug: &str) -> StorefrontResult<Option<CategoryWithCount>> {
        let tables = self.db.tables().read();
        Ok(tables
            .categories
            .values()
            .find(|c| c.slug == slug)
            .map(|c| with_count(&tables, c)))
    }

    async fn find_by_id(&self, id: CategoryId) -> StorefrontResult<Option<Category>> {
        Ok(self.db.tables().read().categories.get(&id).cloned())
    }

    async fn create(&self, category: &NewCategory) -> StorefrontResult<Category> {
        let mut tables = self.db.tables().write();
        if tables.categories.values().any(|c| c.slug == category.slug) {
            return Err(StorefrontError::conflict(format!(
                "A category with slug '{}' already exists",
                category.slug
            )));
        }

        let now = Utc::now();
        let created = Category {
            id: tables.next_category_id(),
            name: category.name.clone(),
            slug: category.slug.clone(),
            description: category.description.clone(),
            created_at: now,
            updated_at: now,
        };
        tables.categories.insert(created.id, created.clone());
        Ok(created)
    }

    async fn update(&self, category: &Category) -> StorefrontResult<Category> {
        let mut tables = self.db.tables().write();
        match tables.categories.get_mut(&category.id) {
            Some(stored) => {
                stored.name = category.name.clone();
                stored.description = category.description.clone();
                stored.updated_at = category.updated_at;
                Ok(stored.clone())
            }
            None => Err(StorefrontError::not_found("Category", &category.slug)),
        }
    }

    async fn delete(&self, id: CategoryId) -> StorefrontResult<bool> {
        let mut tables = self.db.tables().write();
        if tables.categories.remove(&id).is_none() {
            return Ok(false);
        }
        // ON DELETE SET NULL
        for product in tables.products.values_mut() {
            if product.category_id == Some(id) {
                product.category_id = None;
            }
        }
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_create_assigns_ids_and_lists_by_name() {
        let db = InMemoryDatabase::new();
        let repo = db.categories();
        let toys = repo.create(&NewCategory::new("Toys".to_string(), None)).await.unwrap();
        let books = repo.create(&NewCategory::new("Books".to_string(), None)).await.unwrap();
        assert_ne!(toys.id, books.id);

        let listed = repo.list_with_counts().await.unwrap();
        let names: Vec<_> = listed.iter().map(|c| c.category.name.as_str()).collect();
        assert_eq!(names, ["Books", "Toys"]);
        assert!(listed.iter().all(|c| c.products_count == 0));
        assert_eq!(db.list_queries(), 1);
    }

    #[tokio::test]
    async fn test_duplicate_slug_conflicts() {
        let repo = InMemoryDatabase::new().categories();
        repo.create(&NewCategory::new("Electronics".to_string(), None)).await.unwrap();
        let err = repo
            .create(&NewCategory::new("electronics".to_string(), None))
            .await
            .unwrap_err();
        assert!(matches!(err, StorefrontError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_update_keeps_slug() {
        let repo = InMemoryDatabase::new().categories();
        let mut category = repo.create(&NewCategory::new("Garden".to_string(), None)).await.unwrap();
        category.name = "Garden Tools".to_string();
        category.slug = "ignored".to_string();

        let updated = repo.update(&category).await.unwrap();
        assert_eq!(updated.name, "Garden Tools");
        assert_eq!(updated.slug, "garden");
        assert!(repo.find_by_slug("garden").await.unwrap().is_some());
    }
}
