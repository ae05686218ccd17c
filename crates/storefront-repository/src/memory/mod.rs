//! In-memory repositories.
//!
//! All repositories created from one [`InMemoryDatabase`] share its tables,
//! so joins, unique constraints and foreign-key actions behave the way the
//! MySQL schema defines them.

mod category_repository;
mod product_repository;
mod revoked_token_repository;
mod user_repository;

pub use category_repository::InMemoryCategoryRepository;
pub use product_repository::InMemoryProductRepository;
pub use revoked_token_repository::InMemoryRevokedTokenRepository;
pub use user_repository::InMemoryUserRepository;

use parking_lot::RwLock;
use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use storefront_core::{Category, CategoryId, Product, ProductId, RevokedToken, User, UserId};

#[derive(Debug, Default)]
pub(crate) struct Tables {
    pub(crate) users: HashMap<UserId, User>,
    pub(crate) categories: BTreeMap<CategoryId, Category>,
    pub(crate) products: BTreeMap<ProductId, Product>,
    pub(crate) revoked_tokens: HashMap<String, RevokedToken>,
    next_category_id: i64,
    next_product_id: i64,
}

impl Tables {
    pub(crate) fn next_category_id(&mut self) -> CategoryId {
        self.next_category_id += 1;
        CategoryId(self.next_category_id)
    }

    pub(crate) fn next_product_id(&mut self) -> ProductId {
        self.next_product_id += 1;
        ProductId(self.next_product_id)
    }
}

/// Shared table set behind the in-memory repositories.
#[derive(Debug, Default)]
pub struct InMemoryDatabase {
    tables: RwLock<Tables>,
    list_queries: AtomicU64,
}

impl InMemoryDatabase {
    /// Creates an empty database.
    #[must_use]
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Number of list queries (category list and product search) served so far.
    ///
    /// Lets callers observe whether a list was answered from a cache.
    #[must_use]
    pub fn list_queries(&self) -> u64 {
        self.list_queries.load(Ordering::SeqCst)
    }

    /// Repository over the `users` table.
    #[must_use]
    pub fn users(self: &Arc<Self>) -> InMemoryUserRepository {
        InMemoryUserRepository::new(Arc::clone(self))
    }

    /// Repository over the `categories` table.
    #[must_use]
    pub fn categories(self: &Arc<Self>) -> InMemoryCategoryRepository {
        InMemoryCategoryRepository::new(Arc::clone(self))
    }

    /// Repository over the `products` table.
    #[must_use]
    pub fn products(self: &Arc<Self>) -> InMemoryProductRepository {
        InMemoryProductRepository::new(Arc::clone(self))
    }

    /// Repository over the `revoked_tokens` table.
    #[must_use]
    pub fn revoked_tokens(self: &Arc<Self>) -> InMemoryRevokedTokenRepository {
        InMemoryRevokedTokenRepository::new(Arc::clone(self))
    }

    pub(crate) fn tables(&self) -> &RwLock<Tables> {
        &self.tables
    }

    pub(crate) fn record_list_query(&self) {
        self.list_queries.fetch_add(1, Ordering::SeqCst);
    }
}
