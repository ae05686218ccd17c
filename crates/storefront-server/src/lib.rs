//! # Storefront Server Library
//!
//! Wiring of configuration, storage, cache and HTTP surface into a
//! runnable application, plus the process-level startup helpers.

pub mod app;
pub mod startup;
