//! # Storefront Service
//!
//! Business logic for accounts and the catalog, plus the list cache the
//! catalog reads go through.

pub mod auth_service;
pub mod cache;
pub mod category_service;
pub mod dto;
pub mod product_service;
mod services;

#[cfg(test)]
mod testing;

pub use auth_service::*;
pub use cache::*;
pub use category_service::*;
pub use dto::*;
pub use product_service::*;
pub use services::Services;
