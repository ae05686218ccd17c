//! # Storefront Core
//!
//! Core types, traits, and error definitions for the Storefront backend.
//! Every other crate in the workspace builds on the abstractions here:
//! the unified error type, typed identifiers, pagination, request
//! validation, and the catalog/user domain entities.

pub mod domain;
pub mod error;
pub mod health;
pub mod id;
pub mod pagination;
pub mod result;
pub mod slug;
pub mod validation;

pub use domain::*;
pub use error::*;
pub use health::*;
pub use id::*;
pub use pagination::*;
pub use result::*;
pub use slug::slugify;
pub use validation::*;

// Re-export shaku for dependency injection
pub use shaku::Interface;
