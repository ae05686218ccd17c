//! Application state for Axum handlers.

use std::sync::Arc;
use storefront_core::HealthCheck;
use storefront_security::TokenProvider;
use storefront_service::{AuthService, CategoryService, ProductService, Services};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub auth_service: Arc<dyn AuthService>,
    pub category_service: Arc<dyn CategoryService>,
    pub product_service: Arc<dyn ProductService>,
    pub token_provider: Arc<TokenProvider>,
    /// Probes consulted by `/ready`.
    pub health_checks: Arc<Vec<Arc<dyn HealthCheck>>>,
}

impl AppState {
    /// Creates the state from wired services and readiness probes.
    #[must_use]
    pub fn new(services: &Services, health_checks: Vec<Arc<dyn HealthCheck>>) -> Self {
        Self {
            auth_service: services.auth.clone(),
            category_service: services.categories.clone(),
            product_service: services.products.clone(),
            token_provider: services.token_provider.clone(),
            health_checks: Arc::new(health_checks),
        }
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("health_checks", &self.health_checks.len())
            .finish_non_exhaustive()
    }
}
