//! Domain entities and value objects for the storefront catalog.

pub mod entities;
pub mod value_objects;

pub use entities::*;
pub use value_objects::*;
