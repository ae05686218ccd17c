//! In-memory product repository.

use super::{InMemoryDatabase, Tables};
use crate::traits::ProductRepository;
use async_trait::async_trait;
use chrono::Utc;
use std::cmp::Ordering;
use std::sync::Arc;
use storefront_core::{
    CategorySummary, NewProduct, Page, PageRequest, Product, ProductFilter, ProductId, ProductOrdering,
    ProductSortField, ProductView, StorefrontError, StorefrontResult, UserId, UserSummary,
};

/// In-memory product repository.
#[derive(Debug, Clone)]
pub struct InMemoryProductRepository {
    db: Arc<InMemoryDatabase>,
}

impl InMemoryProductRepository {
    /// Creates a repository over `db`.
    #[must_use]
    pub fn new(db: Arc<InMemoryDatabase>) -> Self {
        Self { db }
    }
}

/// Joins a product with its owner and category, like the SQL view query.
fn view(tables: &Tables, product: &Product) -> StorefrontResult<ProductView> {
    let owner = tables
        .users
        .get(&product.user_id)
        .map(UserSummary::from)
        .ok_or_else(|| StorefrontError::Database(format!("Product {} has no owner row", product.id)))?;
    let category = product
        .category_id
        .and_then(|id| tables.categories.get(&id))
        .map(CategorySummary::from);

    Ok(ProductView {
        product: product.clone(),
        owner,
        category,
    })
}

fn matches(filter: &ProductFilter, view: &ProductView) -> bool {
    if filter.category_id.is_some() && view.product.category_id != filter.category_id {
        return false;
    }

    match filter.search.as_deref().map(str::trim).filter(|t| !t.is_empty()) {
        Some(term) => {
            let term = term.to_lowercase();
            let contains = |value: &str| value.to_lowercase().contains(&term);
            contains(&view.product.name)
                || contains(&view.product.url)
                || view.category.as_ref().is_some_and(|c| contains(&c.name))
                || contains(&view.owner.username)
        }
        None => true,
    }
}

fn compare(ordering: ProductOrdering, a: &Product, b: &Product) -> Ordering {
    let by_field = match ordering.field {
        ProductSortField::CreatedAt => a.created_at.cmp(&b.created_at),
        ProductSortField::UpdatedAt => a.updated_at.cmp(&b.updated_at),
        ProductSortField::Name => a.name.to_lowercase().cmp(&b.name.to_lowercase()),
        ProductSortField::Price => a.price.cmp(&b.price),
    }
    .then(a.id.cmp(&b.id));

    if ordering.descending {
        by_field.reverse()
    } else {
        by_field
    }
}

fn check_references(tables: &Tables, product: &Product) -> StorefrontResult<()> {
    if !tables.users.contains_key(&product.user_id) {
        return Err(StorefrontError::Database("foreign key constraint fails: user_id".to_string()));
    }
    if let Some(category_id) = product.category_id {
        if !tables.categories.contains_key(&category_id) {
            return Err(StorefrontError::Database("foreign key constraint fails: category_id".to_string()));
        }
    }
    if tables.products.values().any(|p| p.id != product.id && p.url == product.url) {
        return Err(StorefrontError::conflict("A product with this url already exists"));
    }
    Ok(())
}

#[async_trait]
impl ProductRepository for InMemoryProductRepository {
    async fn search(&self, filter: &ProductFilter, page: PageRequest) -> StorefrontResult<Page<ProductView>> {
        self.db.record_list_query();
        let tables = self.db.tables().read();

        let mut views = tables
            .products
            .values()
            .map(|p| view(&tables, p))
            .collect::<StorefrontResult<Vec<_>>>()?;
        views.retain(|v| matches(filter, v));
        views.sort_by(|a, b| compare(filter.ordering, &a.product, &b.product));

        let total = views.len() as u64;
        let offset = usize::try_from(page.offset()).unwrap_or(usize::MAX);
        let limit = usize::try_from(page.limit()).unwrap_or(usize::MAX);
        let content = views.into_iter().skip(offset).take(limit).collect();

        Ok(Page::new(content, page, total))
    }

    async fn find_view_by_id(&self, id: ProductId) -> StorefrontResult<Option<ProductView>> {
        let tables = self.db.tables().read();
        tables.products.get(&id).map(|p| view(&tables, p)).transpose()
    }

    async fn find_by_id(&self, id: ProductId) -> StorefrontResult<Option<Product>> {
        Ok(self.db.tables().read().products.get(&id).cloned())
    }

    async fn create(&self, product: &NewProduct) -> StorefrontResult<Product> {
        let mut tables = self.db.tables().write();
        let now = Utc::now();
        let created = Product {
            id: ProductId(0),
            name: product.name.clone(),
            price: product.price.clone(),
            url: product.url.clone(),
            image: product.image.clone(),
            category_id: product.category_id,
            user_id: product.user_id,
            created_at: now,
            updated_at: now,
        };
        check_references(&tables, &created)?;

        let created = Product {
            id: tables.next_product_id(),
            ..created
        };
        tables.products.insert(created.id, created.clone());
        Ok(created)
    }

    async fn update(&self, product: &Product) -> StorefrontResult<Product> {
        let mut tables = self.db.tables().write();
        if !tables.products.contains_key(&product.id) {
            return Err(StorefrontError::not_found("Product", product.id));
        }
        check_references(&tables, product)?;
        tables.products.insert(product.id, product.clone());
        Ok(product.clone())
    }

    async fn delete(&self, id: ProductId) -> StorefrontResult<bool> {
        Ok(self.db.tables().write().products.remove(&id).is_some())
    }

    async fn count_by_owner(&self, user_id: UserId) -> StorefrontResult<u64> {
        Ok(self
            .db
            .tables()
            .read()
            .products
            .values()
            .filter(|p| p.user_id == user_id)
            .count() as u64)
    }
}
