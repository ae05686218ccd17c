//! MySQL product repository implementation.
//!
//! Listing and detail reads join `users` and `categories` so a page of
//! products is loaded in a single round trip.

use super::parse_user_id;
use crate::{traits::ProductRepository, SqlPool};
use async_trait::async_trait;
use bigdecimal::BigDecimal;
use chrono::{DateTime, SubsecRound, Utc};
use sqlx::{FromRow, MySql, QueryBuilder};
use std::sync::Arc;
use storefront_core::{
    CategoryId, CategorySummary, NewProduct, Page, PageRequest, Product, ProductFilter, ProductId,
    ProductOrdering, ProductSortField, ProductView, StorefrontError, StorefrontResult, UserId, UserSummary,
};
use tracing::debug;

/// MySQL product repository implementation.
#[derive(Clone)]
pub struct MySqlProductRepository {
    pool: Arc<dyn SqlPool>,
}

impl MySqlProductRepository {
    /// Creates a new MySQL product repository.
    #[must_use]
    pub fn new(pool: Arc<dyn SqlPool>) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct ProductRow {
    id: i64,
    name: String,
    price: BigDecimal,
    url: String,
    image: Option<String>,
    category_id: Option<i64>,
    user_id: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<ProductRow> for Product {
    type Error = StorefrontError;

    fn try_from(row: ProductRow) -> Result<Self, Self::Error> {
        Ok(Product {
            id: ProductId(row.id),
            name: row.name,
            price: row.price,
            url: row.url,
            image: row.image,
            category_id: row.category_id.map(CategoryId),
            user_id: parse_user_id(&row.user_id)?,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

/// A product joined with its owner and (optional) category.
#[derive(Debug, FromRow)]
struct ProductViewRow {
    #[sqlx(flatten)]
    product: ProductRow,
    owner_username: String,
    owner_first_name: String,
    owner_last_name: String,
    owner_avatar: Option<String>,
    category_slug: Option<String>,
    category_name: Option<String>,
}

impl TryFrom<ProductViewRow> for ProductView {
    type Error = StorefrontError;

    fn try_from(row: ProductViewRow) -> Result<Self, Self::Error> {
        let product = Product::try_from(row.product)?;

        let owner = UserSummary {
            id: product.user_id,
            username: row.owner_username,
            first_name: row.owner_first_name,
            last_name: row.owner_last_name,
            avatar: row.owner_avatar,
        };

        let category = match (product.category_id, row.category_slug, row.category_name) {
            (Some(id), Some(slug), Some(name)) => Some(CategorySummary { id, slug, name }),
            _ => None,
        };

        Ok(ProductView {
            product,
            owner,
            category,
        })
    }
}

const SELECT_VIEW: &str = r#"
    SELECT p.id, p.name, p.price, p.url, p.image, p.category_id, p.user_id,
           p.created_at, p.updated_at,
           u.username AS owner_username, u.first_name AS owner_first_name,
           u.last_name AS owner_last_name, u.avatar AS owner_avatar,
           c.slug AS category_slug, c.name AS category_name
    FROM products p
    INNER JOIN users u ON u.id = p.user_id
    LEFT JOIN categories c ON c.id = p.category_id
"#;

const FROM_JOINED: &str = r#"
    FROM products p
    INNER JOIN users u ON u.id = p.user_id
    LEFT JOIN categories c ON c.id = p.category_id
"#;

/// Escapes `LIKE` wildcards and wraps the term for a substring match.
fn like_pattern(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len() + 2);
    escaped.push('%');
    for ch in term.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped.push('%');
    escaped
}

fn push_filters(builder: &mut QueryBuilder<'_, MySql>, filter: &ProductFilter) {
    builder.push(" WHERE 1 = 1");

    if let Some(term) = filter.search.as_deref().map(str::trim).filter(|t| !t.is_empty()) {
        let pattern = like_pattern(term);
        builder.push(" AND (p.name LIKE ");
        builder.push_bind(pattern.clone());
        builder.push(" OR p.url LIKE ");
        builder.push_bind(pattern.clone());
        builder.push(" OR c.name LIKE ");
        builder.push_bind(pattern.clone());
        builder.push(" OR u.username LIKE ");
        builder.push_bind(pattern);
        builder.push(")");
    }

    if let Some(category_id) = filter.category_id {
        builder.push(" AND p.category_id = ");
        builder.push_bind(category_id.value());
    }
}

/// Column names come from the sort-field allow-list, never from input.
fn order_clause(ordering: ProductOrdering) -> String {
    let column = match ordering.field {
        ProductSortField::CreatedAt => "p.created_at",
        ProductSortField::UpdatedAt => "p.updated_at",
        ProductSortField::Name => "p.name",
        ProductSortField::Price => "p.price",
    };
    let direction = if ordering.descending { "DESC" } else { "ASC" };
    format!(" ORDER BY {column} {direction}, p.id {direction}")
}

#[async_trait]
impl ProductRepository for MySqlProductRepository {
    async fn search(&self, filter: &ProductFilter, page: PageRequest) -> StorefrontResult<Page<ProductView>> {
        debug!(
            "Searching products: search={:?}, category={:?}, ordering={}, page={}, size={}",
            filter.search, filter.category_id, filter.ordering, page.page, page.size
        );

        let mut count_query = QueryBuilder::<MySql>::new("SELECT COUNT(*)");
        count_query.push(FROM_JOINED);
        push_filters(&mut count_query, filter);
        let total: i64 = count_query.build_query_scalar().fetch_one(self.pool.mysql()).await?;

        let mut query = QueryBuilder::<MySql>::new(SELECT_VIEW);
        push_filters(&mut query, filter);
        query.push(order_clause(filter.ordering));
        query.push(" LIMIT ");
        query.push_bind(page.limit());
        query.push(" OFFSET ");
        query.push_bind(page.offset());

        let rows: Vec<ProductViewRow> = query.build_query_as().fetch_all(self.pool.mysql()).await?;
        let content = rows
            .into_iter()
            .map(ProductView::try_from)
            .collect::<StorefrontResult<Vec<_>>>()?;

        Ok(Page::new(content, page, u64::try_from(total).unwrap_or(0)))
    }

    async fn find_view_by_id(&self, id: ProductId) -> StorefrontResult<Option<ProductView>> {
        debug!("Finding product view by id: {}", id);

        let row = sqlx::query_as::<_, ProductViewRow>(&format!("{SELECT_VIEW} WHERE p.id = ?"))
            .bind(id.value())
            .fetch_optional(self.pool.mysql())
            .await?;

        row.map(ProductView::try_from).transpose()
    }

    async fn find_by_id(&self, id: ProductId) -> StorefrontResult<Option<Product>> {
        let row = sqlx::query_as::<_, ProductRow>(
            r#"
            SELECT id, name, price, url, image, category_id, user_id, created_at, updated_at
            FROM products
            WHERE id = ?
            "#,
        )
        .bind(id.value())
        .fetch_optional(self.pool.mysql())
        .await?;

        row.map(Product::try_from).transpose()
    }

    async fn create(&self, product: &NewProduct) -> StorefrontResult<Product> {
        debug!("Creating product: {} for user {}", product.name, product.user_id);
        let now = Utc::now().trunc_subsecs(6);

        let result = sqlx::query(
            r#"
            INSERT INTO products (name, price, url, image, category_id, user_id, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&product.name)
        .bind(&product.price)
        .bind(&product.url)
        .bind(&product.image)
        .bind(product.category_id.map(CategoryId::value))
        .bind(product.user_id.to_string())
        .bind(now)
        .bind(now)
        .execute(self.pool.mysql())
        .await?;

        let id = i64::try_from(result.last_insert_id())
            .map_err(|_| StorefrontError::internal("Product id out of range"))?;

        Ok(Product {
            id: ProductId(id),
            name: product.name.clone(),
            price: product.price.clone(),
            url: product.url.clone(),
            image: product.image.clone(),
            category_id: product.category_id,
            user_id: product.user_id,
            created_at: now,
            updated_at: now,
        })
    }

    async fn update(&self, product: &Product) -> StorefrontResult<Product> {
        debug!("Updating product: {}", product.id);

        let result = sqlx::query(
            r#"
            UPDATE products
            SET name = ?, price = ?, url = ?, image = ?, category_id = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&product.name)
        .bind(&product.price)
        .bind(&product.url)
        .bind(&product.image)
        .bind(product.category_id.map(CategoryId::value))
        .bind(product.updated_at)
        .bind(product.id.value())
        .execute(self.pool.mysql())
        .await?;

        if result.rows_affected() == 0 {
            return Err(StorefrontError::not_found("Product", product.id));
        }

        Ok(product.clone())
    }

    async fn delete(&self, id: ProductId) -> StorefrontResult<bool> {
        debug!("Deleting product: {}", id);

        let result = sqlx::query("DELETE FROM products WHERE id = ?")
            .bind(id.value())
            .execute(self.pool.mysql())
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn count_by_owner(&self, user_id: UserId) -> StorefrontResult<u64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products WHERE user_id = ?")
            .bind(user_id.to_string())
            .fetch_one(self.pool.mysql())
            .await?;

        Ok(u64::try_from(count).unwrap_or(0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_like_pattern_escapes_wildcards() {
        assert_eq!(like_pattern("phone"), "%phone%");
        assert_eq!(like_pattern("100%_off"), "%100\\%\\_off%");
    }

    #[test]
    fn test_order_clause_uses_allow_listed_columns() {
        assert_eq!(
            order_clause(ProductOrdering::default()),
            " ORDER BY p.created_at DESC, p.id DESC"
        );
        let by_price = ProductOrdering::parse("price").unwrap();
        assert_eq!(order_clause(by_price), " ORDER BY p.price ASC, p.id ASC");
    }
}
