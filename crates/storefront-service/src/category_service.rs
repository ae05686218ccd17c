//! Category catalog service.

use crate::cache::{CacheAside, CacheKeys, InvalidationPolicy};
use crate::dto::{CategoryPatchRequest, CategoryRequest, CategoryResponse};
use async_trait::async_trait;
use chrono::{SubsecRound, Utc};
use std::sync::Arc;
use storefront_core::{CategoryWithCount, Interface, NewCategory, StorefrontError, StorefrontResult, ValidateExt};
use storefront_repository::CategoryRepository;
use tracing::{debug, info};

/// Category service trait.
#[async_trait]
pub trait CategoryService: Interface + Send + Sync {
    /// Lists every category with its product count. Served from cache when warm.
    async fn list_categories(&self) -> StorefrontResult<Vec<CategoryResponse>>;

    /// Gets a category by slug.
    async fn get_category(&self, slug: &str) -> StorefrontResult<CategoryResponse>;

    /// Creates a category; the slug is derived from the name.
    async fn create_category(&self, request: CategoryRequest) -> StorefrontResult<CategoryResponse>;

    /// Replaces name and description (PUT).
    async fn replace_category(&self, slug: &str, request: CategoryRequest) -> StorefrontResult<CategoryResponse>;

    /// Updates the supplied fields (PATCH).
    async fn patch_category(&self, slug: &str, request: CategoryPatchRequest) -> StorefrontResult<CategoryResponse>;

    /// Deletes a category. Its products stay, without a category.
    async fn delete_category(&self, slug: &str) -> StorefrontResult<()>;
}

/// Category service implementation.
pub struct CategoryServiceImpl {
    categories: Arc<dyn CategoryRepository>,
    cache: CacheAside,
    keys: CacheKeys,
    invalidation: InvalidationPolicy,
}

impl CategoryServiceImpl {
    /// Creates a new category service.
    pub fn new(categories: Arc<dyn CategoryRepository>, cache: CacheAside, keys: CacheKeys) -> Self {
        let invalidation = InvalidationPolicy::new(cache.clone(), keys.clone());
        Self {
            categories,
            cache,
            keys,
            invalidation,
        }
    }

    async fn apply(
        &self,
        slug: &str,
        name: Option<String>,
        description: Option<Option<String>>,
    ) -> StorefrontResult<CategoryResponse> {
        let current = self
            .categories
            .find_by_slug(slug)
            .await?
            .ok_or_else(|| StorefrontError::not_found("Category", slug))?;

        let mut category = current.category;
        if let Some(name) = name {
            category.name = name.trim().to_string();
        }
        if let Some(description) = description {
            category.description = description;
        }
        category.updated_at = Utc::now().trunc_subsecs(6);

        let updated = self.categories.update(&category).await?;
        self.invalidation.category_changed().await;

        info!("Category updated: {}", updated.slug);
        Ok(CategoryResponse::from(CategoryWithCount {
            category: updated,
            products_count: current.products_count,
        }))
    }
}

#[async_trait]
impl CategoryService for CategoryServiceImpl {
    async fn list_categories(&self) -> StorefrontResult<Vec<CategoryResponse>> {
        let key = self.keys.categories_list();
        if let Some(cached) = self.cache.get::<Vec<CategoryResponse>>(&key).await {
            return Ok(cached);
        }

        debug!("Loading categories from the database");
        let categories: Vec<CategoryResponse> = self
            .categories
            .list_with_counts()
            .await?
            .into_iter()
            .map(CategoryResponse::from)
            .collect();

        self.cache.set(&key, &categories).await;
        Ok(categories)
    }

    async fn get_category(&self, slug: &str) -> StorefrontResult<CategoryResponse> {
        debug!("Getting category: {}", slug);

        self.categories
            .find_by_slug(slug)
            .await?
            .map(CategoryResponse::from)
            .ok_or_else(|| StorefrontError::not_found("Category", slug))
    }

    async fn create_category(&self, request: CategoryRequest) -> StorefrontResult<CategoryResponse> {
        request.validate_request()?;

        let new_category = NewCategory::new(request.name.trim().to_string(), request.description);
        if new_category.slug.is_empty() {
            return Err(StorefrontError::invalid_field(
                "name",
                "Name must contain at least one letter or digit.",
                "invalid_slug",
            ));
        }

        let created = self.categories.create(&new_category).await.map_err(|e| match e {
            StorefrontError::Conflict(_) => StorefrontError::Conflict(format!(
                "A category with slug '{}' already exists.",
                new_category.slug
            )),
            other => other,
        })?;
        self.invalidation.category_created().await;

        info!("Category created: {}", created.slug);
        Ok(CategoryResponse::from(CategoryWithCount {
            category: created,
            products_count: 0,
        }))
    }

    async fn replace_category(&self, slug: &str, request: CategoryRequest) -> StorefrontResult<CategoryResponse> {
        request.validate_request()?;
        self.apply(slug, Some(request.name), Some(request.description)).await
    }

    async fn patch_category(&self, slug: &str, request: CategoryPatchRequest) -> StorefrontResult<CategoryResponse> {
        request.validate_request()?;
        self.apply(slug, request.name, request.description).await
    }

    async fn delete_category(&self, slug: &str) -> StorefrontResult<()> {
        let current = self
            .categories
            .find_by_slug(slug)
            .await?
            .ok_or_else(|| StorefrontError::not_found("Category", slug))?;

        if !self.categories.delete(current.category.id).await? {
            return Err(StorefrontError::not_found("Category", slug));
        }
        self.invalidation.category_changed().await;

        info!("Category deleted: {}", slug);
        Ok(())
    }
}

impl std::fmt::Debug for CategoryServiceImpl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CategoryServiceImpl").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::{CacheInterface, MockCacheInterface};
    use crate::testing::{harness, harness_with_store};
    use storefront_core::StorefrontError;

    fn electronics() -> CategoryRequest {
        CategoryRequest {
            name: "Electronics".to_string(),
            description: Some("Gadgets".to_string()),
        }
    }

    #[tokio::test]
    async fn test_create_assigns_slug_and_second_list_is_cached() {
        let h = harness();
        let created = h.services.categories.create_category(electronics()).await.unwrap();
        assert_eq!(created.slug, "electronics");
        assert_eq!(created.products_count, 0);

        let first = h.services.categories.list_categories().await.unwrap();
        let second = h.services.categories.list_categories().await.unwrap();
        assert_eq!(first, second);
        assert_eq!(h.db.list_queries(), 1);
        assert!(h.cache.exists("storefront:categories_list").await.unwrap());
    }

    #[tokio::test]
    async fn test_create_invalidates_list() {
        let h = harness();
        h.services.categories.create_category(electronics()).await.unwrap();
        assert_eq!(h.services.categories.list_categories().await.unwrap().len(), 1);

        h.services
            .categories
            .create_category(CategoryRequest {
                name: "Home & Garden".to_string(),
                description: None,
            })
            .await
            .unwrap();

        let listed = h.services.categories.list_categories().await.unwrap();
        assert_eq!(listed.len(), 2);
        assert_eq!(h.db.list_queries(), 2);
        assert_eq!(listed[1].slug, "home-garden");
    }

    #[tokio::test]
    async fn test_duplicate_slug_conflicts() {
        let h = harness();
        h.services.categories.create_category(electronics()).await.unwrap();
        let err = h
            .services
            .categories
            .create_category(CategoryRequest {
                name: "  electronics ".to_string(),
                description: None,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, StorefrontError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_create_rejects_unsluggable_name() {
        let h = harness();
        let err = h
            .services
            .categories
            .create_category(CategoryRequest {
                name: "!!!".to_string(),
                description: None,
            })
            .await
            .unwrap_err();
        assert_eq!(err.field_errors().unwrap()[0].field, "name");
    }

    #[tokio::test]
    async fn test_update_keeps_slug() {
        let h = harness();
        h.services.categories.create_category(electronics()).await.unwrap();

        let replaced = h
            .services
            .categories
            .replace_category(
                "electronics",
                CategoryRequest {
                    name: "Consumer Electronics".to_string(),
                    description: None,
                },
            )
            .await
            .unwrap();
        assert_eq!(replaced.slug, "electronics");
        assert_eq!(replaced.name, "Consumer Electronics");
        assert!(replaced.description.is_none());

        let patched = h
            .services
            .categories
            .patch_category(
                "electronics",
                CategoryPatchRequest {
                    description: Some(Some("All things electric".to_string())),
                    ..CategoryPatchRequest::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(patched.name, "Consumer Electronics");
        assert_eq!(patched.description.as_deref(), Some("All things electric"));
    }

    #[tokio::test]
    async fn test_update_and_delete_invalidate_list() {
        let h = harness();
        h.services.categories.create_category(electronics()).await.unwrap();
        h.services.categories.list_categories().await.unwrap();

        h.services
            .categories
            .patch_category(
                "electronics",
                CategoryPatchRequest {
                    name: Some("Devices".to_string()),
                    ..CategoryPatchRequest::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(h.services.categories.list_categories().await.unwrap()[0].name, "Devices");

        h.services.categories.delete_category("electronics").await.unwrap();
        assert!(h.services.categories.list_categories().await.unwrap().is_empty());
        assert!(matches!(
            h.services.categories.get_category("electronics").await,
            Err(StorefrontError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_unknown_slug_not_found() {
        let h = harness();
        let err = h.services.categories.delete_category("missing").await.unwrap_err();
        assert_eq!(err.status_code(), 404);
    }

    #[tokio::test]
    async fn test_list_survives_cache_outage() {
        let mut store = MockCacheInterface::new();
        store
            .expect_get()
            .returning(|_| Err(StorefrontError::cache("connection refused")));
        store
            .expect_set()
            .returning(|_, _, _| Err(StorefrontError::cache("connection refused")));
        store
            .expect_delete()
            .returning(|_| Err(StorefrontError::cache("connection refused")));

        let (db, services) = harness_with_store(std::sync::Arc::new(store));
        services.categories.create_category(electronics()).await.unwrap();

        assert_eq!(services.categories.list_categories().await.unwrap().len(), 1);
        assert_eq!(services.categories.list_categories().await.unwrap().len(), 1);
        assert_eq!(db.list_queries(), 2);
    }
}
