//! MySQL category repository implementation.

use crate::{traits::CategoryRepository, SqlPool};
use async_trait::async_trait;
use chrono::{DateTime, SubsecRound, Utc};
use sqlx::FromRow;
use std::sync::Arc;
use storefront_core::{Category, CategoryId, CategoryWithCount, NewCategory, StorefrontError, StorefrontResult};
use tracing::debug;

/// MySQL category repository implementation.
#[derive(Clone)]
pub struct MySqlCategoryRepository {
    pool: Arc<dyn SqlPool>,
}

impl MySqlCategoryRepository {
    /// Creates a new MySQL category repository.
    #[must_use]
    pub fn new(pool: Arc<dyn SqlPool>) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct CategoryRow {
    id: i64,
    name: String,
    slug: String,
    description: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<CategoryRow> for Category {
    fn from(row: CategoryRow) -> Self {
        Self {
            id: CategoryId(row.id),
            name: row.name,
            slug: row.slug,
            description: row.description,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(Debug, FromRow)]
struct CategoryCountRow {
    #[sqlx(flatten)]
    category: CategoryRow,
    products_count: i64,
}

impl From<CategoryCountRow> for CategoryWithCount {
    fn from(row: CategoryCountRow) -> Self {
        Self {
            category: row.category.into(),
            products_count: row.products_count,
        }
    }
}

const SELECT_WITH_COUNT: &str = r#"
    SELECT c.id, c.name, c.slug, c.description, c.created_at, c.updated_at,
           (SELECT COUNT(*) FROM products p WHERE p.category_id = c.id) AS products_count
    FROM categories c
"#;

#[async_trait]
impl CategoryRepository for MySqlCategoryRepository {
    async fn list_with_counts(&self) -> StorefrontResult<Vec<CategoryWithCount>> {
        debug!("Listing categories with product counts");

        let rows = sqlx::query_as::<_, CategoryCountRow>(&format!("{SELECT_WITH_COUNT} ORDER BY c.name, c.id"))
            .fetch_all(self.pool.mysql())
            .await?;

        Ok(rows.into_iter().map(CategoryWithCount::from).collect())
    }

    async fn find_by_slug(&self, slug: &str) -> StorefrontResult<Option<CategoryWithCount>> {
        debug!("Finding category by slug: {}", slug);

        let row = sqlx::query_as::<_, CategoryCountRow>(&format!("{SELECT_WITH_COUNT} WHERE c.slug = ?"))
            .bind(slug)
            .fetch_optional(self.pool.mysql())
            .await?;

        Ok(row.map(CategoryWithCount::from))
    }

    async fn find_by_id(&self, id: CategoryId) -> StorefrontResult<Option<Category>> {
        let row = sqlx::query_as::<_, CategoryRow>(
            r#"
            SELECT id, name, slug, description, created_at, updated_at
            FROM categories
            WHERE id = ?
            "#,
        )
        .bind(id.value())
        .fetch_optional(self.pool.mysql())
        .await?;

        Ok(row.map(Category::from))
    }

    async fn create(&self, category: &NewCategory) -> StorefrontResult<Category> {
        debug!("Creating category: {}", category.name);
        let now = Utc::now().trunc_subsecs(6);

        let result = sqlx::query(
            r#"
            INSERT INTO categories (name, slug, description, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(&category.name)
        .bind(&category.slug)
        .bind(&category.description)
        .bind(now)
        .bind(now)
        .execute(self.pool.mysql())
        .await?;

        let id = i64::try_from(result.last_insert_id())
            .map_err(|_| StorefrontError::internal("Category id out of range"))?;

        Ok(Category {
            id: CategoryId(id),
            name: category.name.clone(),
            slug: category.slug.clone(),
            description: category.description.clone(),
            created_at: now,
            updated_at: now,
        })
    }

    async fn update(&self, category: &Category) -> StorefrontResult<Category> {
        debug!("Updating category: {}", category.slug);

        let result = sqlx::query("UPDATE categories SET name = ?, description = ?, updated_at = ? WHERE id = ?")
            .bind(&category.name)
            .bind(&category.description)
            .bind(category.updated_at)
            .bind(category.id.value())
            .execute(self.pool.mysql())
            .await?;

        if result.rows_affected() == 0 {
            return Err(StorefrontError::not_found("Category", &category.slug));
        }

        Ok(category.clone())
    }

    async fn delete(&self, id: CategoryId) -> StorefrontResult<bool> {
        debug!("Deleting category: {}", id);

        let result = sqlx::query("DELETE FROM categories WHERE id = ?")
            .bind(id.value())
            .execute(self.pool.mysql())
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
