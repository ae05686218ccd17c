//! Configuration loader with layered sources.

use crate::{format_validation_errors, AppConfig, ConfigValidator};
use config::{Config, ConfigError, Environment, File};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use storefront_core::StorefrontError;
use tokio::sync::RwLock;
use tracing::{debug, info};

/// Environment variable prefix for overrides (`STOREFRONT_CACHE__DEFAULT_TTL_SECS=60`).
pub const ENV_PREFIX: &str = "STOREFRONT";

/// Configuration loader with reload support.
#[derive(Clone)]
pub struct ConfigLoader {
    config: Arc<RwLock<AppConfig>>,
    config_dir: PathBuf,
}

impl ConfigLoader {
    /// Creates a new configuration loader.
    ///
    /// Configuration is loaded from multiple sources in order:
    /// 1. `{dir}/default.toml` - Default values
    /// 2. `{dir}/{environment}.toml` - Environment-specific overrides
    /// 3. `{dir}/local.toml` - Local overrides (not committed)
    /// 4. Environment variables with `STOREFRONT_` prefix
    pub fn new(config_dir: impl Into<PathBuf>) -> Result<Self, StorefrontError> {
        let config_dir = config_dir.into();
        let config = Self::load_config(&config_dir)?;

        Ok(Self {
            config: Arc::new(RwLock::new(config)),
            config_dir,
        })
    }

    /// Loads configuration from the default location (`./config`).
    pub fn from_default_location() -> Result<Self, StorefrontError> {
        Self::new("./config")
    }

    /// Returns the current configuration.
    pub async fn get(&self) -> AppConfig {
        self.config.read().await.clone()
    }

    /// Reloads the configuration from disk.
    pub async fn reload(&self) -> Result<(), StorefrontError> {
        let new_config = Self::load_config(&self.config_dir)?;
        let mut config = self.config.write().await;
        *config = new_config;
        info!("Configuration reloaded successfully");
        Ok(())
    }

    fn load_config(config_dir: &Path) -> Result<AppConfig, StorefrontError> {
        if let Err(e) = dotenvy::dotenv() {
            debug!("No .env file found or error loading it: {}", e);
        }

        let environment_override = std::env::var(format!("{ENV_PREFIX}_ENVIRONMENT")).ok();
        let environment = environment_override.clone().unwrap_or_else(|| "development".to_string());

        info!("Loading configuration for environment: {}", environment);

        let mut builder = Config::builder();

        for name in ["default", environment.as_str(), "local"] {
            let path = config_dir.join(format!("{name}.toml"));
            if path.exists() {
                debug!("Loading config file: {}", path.display());
                builder = builder.add_source(File::from(path).required(false));
            }
        }

        builder = builder.add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true)
                .list_separator(",")
                .with_list_parse_key("server.cors_origins"),
        );

        let mut app_config: AppConfig = builder
            .build()
            .and_then(|config| config.try_deserialize())
            .map_err(config_error_to_storefront_error)?;

        if let Some(environment) = environment_override {
            app_config.app.environment = environment;
        }

        ConfigValidator::validate(&app_config)
            .map_err(|errors| StorefrontError::Configuration(format_validation_errors(&errors)))?;

        Ok(app_config)
    }
}

fn config_error_to_storefront_error(err: ConfigError) -> StorefrontError {
    StorefrontError::Configuration(err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::CacheBackend;
    use std::fs;

    #[tokio::test]
    async fn test_missing_directory_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let loader = ConfigLoader::new(dir.path().join("absent")).unwrap();
        let config = loader.get().await;
        assert_eq!(config.cache.default_ttl_secs, 900);
    }

    #[tokio::test]
    async fn test_default_file_is_layered() {
        let dir = tempfile::tempdir().unwrap();
        let mut defaults = AppConfig::default();
        defaults.cache.backend = CacheBackend::Memory;
        defaults.cache.default_ttl_secs = 120;
        fs::write(dir.path().join("default.toml"), toml::to_string(&defaults).unwrap()).unwrap();
        fs::write(dir.path().join("local.toml"), "[server]\nport = 9100\n").unwrap();

        let loader = ConfigLoader::new(dir.path()).unwrap();
        let config = loader.get().await;
        assert_eq!(config.cache.backend, CacheBackend::Memory);
        assert_eq!(config.cache.default_ttl_secs, 120);
        assert_eq!(config.server.port, 9100);
    }

    #[tokio::test]
    async fn test_invalid_file_fails_validation() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("default.toml"), "[cache]\ndefault_ttl_secs = 0\n").unwrap();

        let err = ConfigLoader::new(dir.path()).err().unwrap();
        assert!(matches!(err, StorefrontError::Configuration(ref msg) if msg.contains("cache.default_ttl_secs")));
    }

    #[tokio::test]
    async fn test_reload_picks_up_changes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("default.toml");
        fs::write(&path, "[cache]\nkey_prefix = \"shop\"\n").unwrap();

        let loader = ConfigLoader::new(dir.path()).unwrap();
        assert_eq!(loader.get().await.cache.key_prefix, "shop");

        fs::write(&path, "[cache]\nkey_prefix = \"shop2\"\n").unwrap();
        loader.reload().await.unwrap();
        assert_eq!(loader.get().await.cache.key_prefix, "shop2");
    }
}
