//! Product catalog service.

use crate::cache::{CacheAside, CacheKeys, FilterSignature, InvalidationPolicy};
use crate::dto::{ProductDetail, ProductListItem, ProductListQuery, ProductPatchRequest, ProductRequest};
use async_trait::async_trait;
use chrono::{SubsecRound, Utc};
use std::sync::Arc;
use storefront_core::{
    CategoryId, Interface, NewProduct, Page, Product, ProductId, StorefrontError, StorefrontResult, UserId,
    ValidateExt,
};
use storefront_repository::{CategoryRepository, ProductRepository};
use storefront_security::{Claims, ClaimsExt};
use tracing::{debug, info};

/// Product service trait.
///
/// Reads are open to everyone. Writes need credentials, and changing or
/// deleting a product needs the credentials of its owner.
#[async_trait]
pub trait ProductService: Interface + Send + Sync {
    /// Searches products. Results are cached per viewer and filter signature.
    async fn list_products(
        &self,
        viewer: Option<UserId>,
        query: &ProductListQuery,
    ) -> StorefrontResult<Page<ProductListItem>>;

    /// Gets a product with its owner and category.
    async fn get_product(&self, id: ProductId) -> StorefrontResult<ProductDetail>;

    /// Creates a product owned by the caller.
    async fn create_product(&self, claims: &Claims, request: ProductRequest) -> StorefrontResult<ProductDetail>;

    /// Replaces every writable field (PUT).
    async fn replace_product(
        &self,
        claims: &Claims,
        id: ProductId,
        request: ProductRequest,
    ) -> StorefrontResult<ProductDetail>;

    /// Updates the supplied fields (PATCH).
    async fn patch_product(
        &self,
        claims: &Claims,
        id: ProductId,
        request: ProductPatchRequest,
    ) -> StorefrontResult<ProductDetail>;

    /// Deletes a product.
    async fn delete_product(&self, claims: &Claims, id: ProductId) -> StorefrontResult<()>;
}

/// Product service implementation.
pub struct ProductServiceImpl {
    products: Arc<dyn ProductRepository>,
    categories: Arc<dyn CategoryRepository>,
    cache: CacheAside,
    keys: CacheKeys,
    invalidation: InvalidationPolicy,
}

impl ProductServiceImpl {
    /// Creates a new product service.
    pub fn new(
        products: Arc<dyn ProductRepository>,
        categories: Arc<dyn CategoryRepository>,
        cache: CacheAside,
        keys: CacheKeys,
    ) -> Self {
        let invalidation = InvalidationPolicy::new(cache.clone(), keys.clone());
        Self {
            products,
            categories,
            cache,
            keys,
            invalidation,
        }
    }

    /// Loads a product the caller is allowed to change.
    async fn owned_product(&self, claims: &Claims, id: ProductId) -> StorefrontResult<Product> {
        let product = self
            .products
            .find_by_id(id)
            .await?
            .ok_or_else(|| StorefrontError::not_found("Product", id))?;
        claims.require_owner(product.user_id)?;
        Ok(product)
    }

    async fn ensure_category(&self, category_id: Option<CategoryId>) -> StorefrontResult<()> {
        let Some(category_id) = category_id else {
            return Ok(());
        };
        if self.categories.find_by_id(category_id).await?.is_none() {
            return Err(StorefrontError::invalid_field(
                "category",
                &format!("Invalid pk \"{category_id}\" - object does not exist."),
                "does_not_exist",
            ));
        }
        Ok(())
    }

    async fn detail(&self, id: ProductId) -> StorefrontResult<ProductDetail> {
        self.products
            .find_view_by_id(id)
            .await?
            .map(ProductDetail::from)
            .ok_or_else(|| StorefrontError::not_found("Product", id))
    }

    async fn save_changes(&self, mut product: Product) -> StorefrontResult<ProductDetail> {
        product.updated_at = Utc::now().trunc_subsecs(6);
        let updated = self.products.update(&product).await?;
        self.invalidation.product_written(updated.user_id).await;

        info!("Product updated: {}", updated.id);
        self.detail(updated.id).await
    }
}

#[async_trait]
impl ProductService for ProductServiceImpl {
    async fn list_products(
        &self,
        viewer: Option<UserId>,
        query: &ProductListQuery,
    ) -> StorefrontResult<Page<ProductListItem>> {
        let filter = query.filter();
        let page = query.page_request();
        let key = self.keys.products_list(viewer, &FilterSignature::new(&filter, page));

        if let Some(cached) = self.cache.get::<Page<ProductListItem>>(&key).await {
            return Ok(cached);
        }

        debug!("Searching products: {:?}, page {}", filter, page.page);
        let result = self.products.search(&filter, page).await?.map(ProductListItem::from);

        self.cache.set(&key, &result).await;
        Ok(result)
    }

    async fn get_product(&self, id: ProductId) -> StorefrontResult<ProductDetail> {
        debug!("Getting product: {}", id);
        self.detail(id).await
    }

    async fn create_product(&self, claims: &Claims, request: ProductRequest) -> StorefrontResult<ProductDetail> {
        request.validate_request()?;
        self.ensure_category(request.category).await?;

        let owner = claims.user_id();
        let created = self
            .products
            .create(&NewProduct {
                name: request.name.trim().to_string(),
                price: request.price.with_scale(2),
                url: request.url,
                image: request.image,
                category_id: request.category,
                user_id: owner,
            })
            .await?;
        self.invalidation.product_written(owner).await;

        info!("Product created: {} by {}", created.id, owner);
        self.detail(created.id).await
    }

    async fn replace_product(
        &self,
        claims: &Claims,
        id: ProductId,
        request: ProductRequest,
    ) -> StorefrontResult<ProductDetail> {
        let mut product = self.owned_product(claims, id).await?;
        request.validate_request()?;
        self.ensure_category(request.category).await?;

        product.name = request.name.trim().to_string();
        product.price = request.price.with_scale(2);
        product.url = request.url;
        product.image = request.image;
        product.category_id = request.category;

        self.save_changes(product).await
    }

    async fn patch_product(
        &self,
        claims: &Claims,
        id: ProductId,
        request: ProductPatchRequest,
    ) -> StorefrontResult<ProductDetail> {
        let mut product = self.owned_product(claims, id).await?;
        request.validate_request()?;
        if let Some(category) = request.category {
            self.ensure_category(category).await?;
            product.category_id = category;
        }

        if let Some(name) = request.name {
            product.name = name.trim().to_string();
        }
        if let Some(price) = request.price {
            product.price = price.with_scale(2);
        }
        if let Some(url) = request.url {
            product.url = url;
        }
        if let Some(image) = request.image {
            product.image = image;
        }

        self.save_changes(product).await
    }

    async fn delete_product(&self, claims: &Claims, id: ProductId) -> StorefrontResult<()> {
        let product = self.owned_product(claims, id).await?;

        if !self.products.delete(product.id).await? {
            return Err(StorefrontError::not_found("Product", id));
        }
        self.invalidation.product_written(product.user_id).await;

        info!("Product deleted: {}", id);
        Ok(())
    }
}

impl std::fmt::Debug for ProductServiceImpl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProductServiceImpl").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dto::CategoryRequest;
    use crate::cache::CacheInterface;
    use crate::testing::{harness, Harness};
    use bigdecimal::BigDecimal;
    use std::str::FromStr;
    use storefront_config::CacheConfig;
    use storefront_core::{PageRequest, ProductFilter};

    fn product(name: &str, price: &str) -> ProductRequest {
        ProductRequest {
            name: name.to_string(),
            price: BigDecimal::from_str(price).unwrap(),
            url: format!("https://shop.example.com/{}", name.to_lowercase().replace(' ', "-")),
            image: None,
            category: None,
        }
    }

    fn ordered_by(ordering: &str) -> ProductListQuery {
        ProductListQuery {
            ordering: Some(ordering.to_string()),
            ..ProductListQuery::default()
        }
    }

    async fn product_count(h: &Harness) -> u64 {
        h.db
            .products()
            .search(&ProductFilter::default(), PageRequest::first())
            .await
            .unwrap()
            .info
            .total_elements
    }

    #[tokio::test]
    async fn test_create_binds_owner_and_formats_price() {
        let h = harness();
        let claims = h.sign_up("seller").await;

        let detail = h.services.products.create_product(&claims, product("Desk Lamp", "19.9")).await.unwrap();
        assert_eq!(detail.user, claims.user_id());
        assert_eq!(detail.user_info.username, "seller");
        assert_eq!(detail.price, "19.90");
        assert!(detail.category_info.is_none());
    }

    #[tokio::test]
    async fn test_negative_price_rejected_and_not_persisted() {
        let h = harness();
        let claims = h.sign_up("seller").await;

        let err = h
            .services
            .products
            .create_product(&claims, product("Desk Lamp", "-10.00"))
            .await
            .unwrap_err();
        assert_eq!(err.status_code(), 400);
        assert_eq!(err.field_errors().unwrap()[0].field, "price");
        assert_eq!(product_count(&h).await, 0);
    }

    #[tokio::test]
    async fn test_invalid_url_rejected() {
        let h = harness();
        let claims = h.sign_up("seller").await;

        let request = ProductRequest {
            url: "invalid-url".to_string(),
            ..product("Desk Lamp", "10.00")
        };
        let err = h.services.products.create_product(&claims, request).await.unwrap_err();
        assert_eq!(err.field_errors().unwrap()[0].field, "url");
    }

    #[tokio::test]
    async fn test_unknown_category_is_field_error() {
        let h = harness();
        let claims = h.sign_up("seller").await;

        let request = ProductRequest {
            category: Some(CategoryId(99)),
            ..product("Desk Lamp", "10.00")
        };
        let err = h.services.products.create_product(&claims, request).await.unwrap_err();
        let field = &err.field_errors().unwrap()[0];
        assert_eq!(field.field, "category");
        assert_eq!(field.code, "does_not_exist");
    }

    #[tokio::test]
    async fn test_create_invalidates_owner_lists() {
        let h = harness();
        let claims = h.sign_up("seller").await;
        let viewer = Some(claims.user_id());

        h.services.products.create_product(&claims, product("Desk Lamp", "30.00")).await.unwrap();
        let query = ordered_by("price");
        let before = h.services.products.list_products(viewer, &query).await.unwrap();
        assert_eq!(before.content.len(), 1);

        let key = CacheKeys::new(CacheConfig::default().key_prefix)
            .products_list(viewer, &FilterSignature::new(&query.filter(), query.page_request()));
        assert!(h.cache.exists(&key).await.unwrap());

        h.services.products.create_product(&claims, product("Pen", "2.50")).await.unwrap();
        assert!(!h.cache.exists(&key).await.unwrap());

        let after = h.services.products.list_products(viewer, &ordered_by("price")).await.unwrap();
        assert_eq!(after.content.len(), 2);
        assert_eq!(after.content[0].name, "Pen");
        assert_eq!(h.db.list_queries(), 2);
    }

    #[tokio::test]
    async fn test_repeat_list_served_from_cache() {
        let h = harness();
        let claims = h.sign_up("seller").await;
        h.services.products.create_product(&claims, product("Desk Lamp", "30.00")).await.unwrap();

        let query = ordered_by("-price");
        let first = h.services.products.list_products(None, &query).await.unwrap();
        let second = h.services.products.list_products(None, &query).await.unwrap();
        assert_eq!(first, second);
        assert_eq!(h.db.list_queries(), 1);

        // A different filter is a different entry.
        h.services.products.list_products(None, &ordered_by("name")).await.unwrap();
        assert_eq!(h.db.list_queries(), 2);
    }

    #[tokio::test]
    async fn test_viewers_get_separate_entries() {
        let h = harness();
        let alice = h.sign_up("alice").await;
        let bob = h.sign_up("bob").await;
        let query = ProductListQuery::default();

        h.services.products.list_products(None, &query).await.unwrap();
        h.services.products.list_products(Some(alice.user_id()), &query).await.unwrap();
        h.services.products.list_products(Some(bob.user_id()), &query).await.unwrap();

        assert_eq!(h.db.list_queries(), 3);
        assert_eq!(h.cache.len(), 3);
    }

    #[tokio::test]
    async fn test_only_owner_may_change() {
        let h = harness();
        let owner = h.sign_up("owner").await;
        let intruder = h.sign_up("intruder").await;
        let created = h.services.products.create_product(&owner, product("Desk Lamp", "30.00")).await.unwrap();

        let err = h
            .services
            .products
            .patch_product(
                &intruder,
                created.id,
                ProductPatchRequest {
                    name: Some("Mine now".to_string()),
                    ..ProductPatchRequest::default()
                },
            )
            .await
            .unwrap_err();
        assert_eq!(err.status_code(), 403);

        let err = h.services.products.delete_product(&intruder, created.id).await.unwrap_err();
        assert_eq!(err.status_code(), 403);
        assert_eq!(product_count(&h).await, 1);
    }

    #[tokio::test]
    async fn test_patch_and_replace() {
        let h = harness();
        let claims = h.sign_up("seller").await;
        let category = h
            .services
            .categories
            .create_category(CategoryRequest {
                name: "Lighting".to_string(),
                description: None,
            })
            .await
            .unwrap();
        let created = h.services.products.create_product(&claims, product("Desk Lamp", "30.00")).await.unwrap();

        let patched = h
            .services
            .products
            .patch_product(
                &claims,
                created.id,
                ProductPatchRequest {
                    price: Some(BigDecimal::from(25)),
                    category: Some(Some(category.id)),
                    ..ProductPatchRequest::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(patched.name, "Desk Lamp");
        assert_eq!(patched.price, "25.00");
        assert_eq!(patched.category_info.as_ref().map(|c| c.slug.as_str()), Some("lighting"));

        let replaced = h
            .services
            .products
            .replace_product(&claims, created.id, product("Floor Lamp", "80.00"))
            .await
            .unwrap();
        assert_eq!(replaced.name, "Floor Lamp");
        assert!(replaced.category.is_none());
    }

    #[tokio::test]
    async fn test_delete_then_missing() {
        let h = harness();
        let claims = h.sign_up("seller").await;
        let created = h.services.products.create_product(&claims, product("Desk Lamp", "30.00")).await.unwrap();

        h.services.products.delete_product(&claims, created.id).await.unwrap();
        assert!(matches!(
            h.services.products.get_product(created.id).await,
            Err(StorefrontError::NotFound { .. })
        ));
        assert_eq!(
            h.services.products.delete_product(&claims, created.id).await.unwrap_err().status_code(),
            404
        );
    }

    #[tokio::test]
    async fn test_product_write_refreshes_profile_count() {
        let h = harness();
        let claims = h.sign_up("seller").await;
        assert_eq!(h.services.auth.get_profile(&claims).await.unwrap().list_count, 0);

        h.services.products.create_product(&claims, product("Desk Lamp", "30.00")).await.unwrap();
        assert_eq!(h.services.auth.get_profile(&claims).await.unwrap().list_count, 1);
    }
}
