//! # Storefront Server
//!
//! Main entry point: loads configuration, wires the application and
//! serves the REST API until Ctrl+C or SIGTERM.

use storefront_config::{ConfigLoader, ObservabilityConfig};
use storefront_core::{StorefrontError, StorefrontResult};
use storefront_server::{
    app::Application,
    startup::{init_logging, print_banner, print_startup_info, shutdown_signal},
};
use tracing::{error, info};

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        error!("Application error: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> StorefrontResult<()> {
    let config_loader = match ConfigLoader::from_default_location() {
        Ok(loader) => loader,
        Err(e) => {
            init_logging(&ObservabilityConfig::default());
            return Err(e);
        }
    };
    let config = config_loader.get().await;
    init_logging(&config.observability);

    print_banner();
    info!("Starting {} v{}", config.app.name, env!("CARGO_PKG_VERSION"));
    info!("Environment: {}", config.app.environment);

    let app = Application::build(&config).await?;

    let addr = config.server.addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| StorefrontError::Internal(format!("Failed to bind {}: {}", addr, e)))?;
    print_startup_info(&config.server);

    axum::serve(listener, app.router.clone())
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| StorefrontError::Internal(format!("REST server error: {}", e)))?;

    app.shutdown().await;
    info!("Server shutdown complete");
    Ok(())
}
