//! # Storefront Repository
//!
//! Data access for the storefront. Services depend on the traits in
//! [`traits`]; the MySQL implementations in [`mysql`] run on a shared
//! [`DatabasePool`].
//!
//! ```text
//! Service
//!   ↓  Arc<dyn ProductRepository>
//! MySqlProductRepository
//!   ↓  Arc<dyn SqlPool>
//! MySQL
//! ```
//!
//! With the `memory` feature, [`memory`] provides implementations of the
//! same traits over one shared in-process table set.

#[cfg(any(test, feature = "memory"))]
pub mod memory;
pub mod mysql;
pub mod pool;
mod repositories;
pub mod traits;

pub use mysql::*;
pub use pool::*;
pub use repositories::Repositories;
pub use traits::*;
