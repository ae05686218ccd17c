//! # Storefront REST
//!
//! HTTP surface of the storefront: account endpoints, the category and
//! product catalog, health probes and the OpenAPI document. Every route
//! except the probes lives under `/api/v1`.

pub mod controllers;
pub mod extractors;
pub mod middleware;
pub mod openapi;
pub mod responses;
pub mod router;
pub mod state;

pub use router::*;
pub use state::*;
