//! Repository trait definitions.

use async_trait::async_trait;
use storefront_core::{
    Category, CategoryId, CategoryWithCount, Interface, NewCategory, NewProduct, Page, PageRequest, Product,
    ProductFilter, ProductId, ProductView, RevokedToken, StorefrontResult, User, UserId,
};

/// User repository trait.
#[async_trait]
pub trait UserRepository: Interface + Send + Sync {
    /// Finds a user by ID.
    async fn find_by_id(&self, id: UserId) -> StorefrontResult<Option<User>>;

    /// Finds a user by (normalized) email.
    async fn find_by_email(&self, email: &str) -> StorefrontResult<Option<User>>;

    /// Checks if a username exists.
    async fn exists_by_username(&self, username: &str) -> StorefrontResult<bool>;

    /// Checks if an email exists.
    async fn exists_by_email(&self, email: &str) -> StorefrontResult<bool>;

    /// Saves a new user.
    ///
    /// A duplicate username or email is a `Conflict`.
    async fn save(&self, user: &User) -> StorefrontResult<User>;

    /// Updates an existing user.
    async fn update(&self, user: &User) -> StorefrontResult<User>;
}

/// Category repository trait.
#[async_trait]
pub trait CategoryRepository: Interface + Send + Sync {
    /// Lists every category with its product count, ordered by name.
    async fn list_with_counts(&self) -> StorefrontResult<Vec<CategoryWithCount>>;

    /// Finds a category with its product count by slug.
    async fn find_by_slug(&self, slug: &str) -> StorefrontResult<Option<CategoryWithCount>>;

    /// Finds a category by ID.
    async fn find_by_id(&self, id: CategoryId) -> StorefrontResult<Option<Category>>;

    /// Inserts a category. A duplicate slug is a `Conflict`.
    async fn create(&self, category: &NewCategory) -> StorefrontResult<Category>;

    /// Updates name and description. The slug never changes.
    async fn update(&self, category: &Category) -> StorefrontResult<Category>;

    /// Deletes a category; its products keep existing without one.
    async fn delete(&self, id: CategoryId) -> StorefrontResult<bool>;
}

/// Product repository trait.
#[async_trait]
pub trait ProductRepository: Interface + Send + Sync {
    /// Lists products matching `filter`, with owner and category loaded
    /// in the same query.
    async fn search(&self, filter: &ProductFilter, page: PageRequest) -> StorefrontResult<Page<ProductView>>;

    /// Finds a product with owner and category by ID.
    async fn find_view_by_id(&self, id: ProductId) -> StorefrontResult<Option<ProductView>>;

    /// Finds a bare product by ID.
    async fn find_by_id(&self, id: ProductId) -> StorefrontResult<Option<Product>>;

    /// Inserts a product. A duplicate URL is a `Conflict`.
    async fn create(&self, product: &NewProduct) -> StorefrontResult<Product>;

    /// Updates every mutable column of a product.
    async fn update(&self, product: &Product) -> StorefrontResult<Product>;

    /// Deletes a product by ID.
    async fn delete(&self, id: ProductId) -> StorefrontResult<bool>;

    /// Counts the products owned by a user.
    async fn count_by_owner(&self, user_id: UserId) -> StorefrontResult<u64>;
}

/// Store of refresh tokens revoked by logout.
#[async_trait]
pub trait RevokedTokenRepository: Interface + Send + Sync {
    /// Records a revoked token.
    async fn revoke(&self, token: &RevokedToken) -> StorefrontResult<()>;

    /// Checks whether a token ID has been revoked.
    async fn is_revoked(&self, jti: &str) -> StorefrontResult<bool>;

    /// Removes records whose token has expired anyway. Returns the count removed.
    async fn purge_expired(&self) -> StorefrontResult<u64>;
}
