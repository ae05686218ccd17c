//! Configuration validation module.
//!
//! Checks every section once at load time so a bad value stops the
//! process at startup instead of surfacing on the first request.

use crate::{AppConfig, CacheBackend, DEFAULT_JWT_SECRET};
use std::fmt;
use url::Url;

/// Configuration validation error variants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigValidationError {
    /// JWT secret is too short (minimum 32 characters).
    JwtSecretTooShort { actual: usize, minimum: usize },
    /// The shipped development secret is in use in production.
    DefaultJwtSecret,
    /// Port number is invalid.
    InvalidPort { value: u16 },
    /// Pool size configuration is invalid (min must be <= max).
    InvalidPoolSize { min: u32, max: u32 },
    /// Pool size exceeds maximum allowed.
    PoolSizeTooLarge { value: u32, maximum: u32 },
    /// URL format is invalid.
    InvalidUrl { url_type: String, message: String },
    /// Timeout or lifetime must be positive.
    NonPositiveTimeout { name: String },
    /// Password hash cost is invalid.
    InvalidHashCost { value: u32, minimum: u32, maximum: u32 },
    /// Log level is invalid.
    InvalidLogLevel { value: String },
    /// Lifetime above the allowed ceiling.
    TtlTooLong { name: String, value: u64, maximum: u64 },
    /// Cache keys need a prefix without separators or glob metacharacters.
    InvalidKeyPrefix { value: String },
}

impl fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::JwtSecretTooShort { actual, minimum } => {
                write!(f, "JWT secret too short: {} characters (minimum {})", actual, minimum)
            }
            Self::DefaultJwtSecret => write!(f, "The default JWT secret cannot be used in production"),
            Self::InvalidPort { value } => write!(f, "Invalid server port: {}", value),
            Self::InvalidPoolSize { min, max } => {
                write!(f, "Invalid pool size: min ({}) cannot be greater than max ({})", min, max)
            }
            Self::PoolSizeTooLarge { value, maximum } => {
                write!(f, "Pool size {} exceeds maximum allowed ({})", value, maximum)
            }
            Self::InvalidUrl { url_type, message } => write!(f, "Invalid {} URL: {}", url_type, message),
            Self::NonPositiveTimeout { name } => write!(f, "'{}' must be positive", name),
            Self::InvalidHashCost { value, minimum, maximum } => write!(
                f,
                "Invalid password hash cost: {} (must be between {} and {})",
                value, minimum, maximum
            ),
            Self::InvalidLogLevel { value } => write!(
                f,
                "Invalid log level: '{}' (valid: trace, debug, info, warn, error)",
                value
            ),
            Self::TtlTooLong { name, value, maximum } => {
                write!(f, "'{}' is {}s (maximum {}s)", name, value, maximum)
            }
            Self::InvalidKeyPrefix { value } => write!(
                f,
                "Invalid cache key prefix '{}': must be non-empty and contain none of {}",
                value,
                ConfigValidator::KEY_PREFIX_FORBIDDEN.iter().collect::<String>()
            ),
        }
    }
}

impl std::error::Error for ConfigValidationError {}

/// Configuration validator.
pub struct ConfigValidator;

impl ConfigValidator {
    const MIN_JWT_SECRET_LENGTH: usize = 32;
    const MAX_POOL_SIZE: u32 = 1000;
    const MIN_HASH_COST: u32 = 1;
    const MAX_HASH_COST: u32 = 16;
    /// Thirty days.
    const MAX_CACHE_TTL_SECS: u64 = 30 * 24 * 60 * 60;
    /// The key separator plus every Redis `MATCH` metacharacter.
    const KEY_PREFIX_FORBIDDEN: [char; 6] = [':', '*', '?', '[', ']', '\\'];
    const VALID_LOG_LEVELS: &'static [&'static str] = &["trace", "debug", "info", "warn", "error"];

    /// Validates the entire application configuration.
    ///
    /// Returns every problem found, not just the first.
    pub fn validate(config: &AppConfig) -> Result<(), Vec<ConfigValidationError>> {
        let mut errors = Vec::new();

        Self::validate_security(config, &mut errors);
        Self::validate_server(config, &mut errors);
        Self::validate_database(config, &mut errors);
        Self::validate_cache(config, &mut errors);
        Self::validate_observability(config, &mut errors);

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    fn validate_security(config: &AppConfig, errors: &mut Vec<ConfigValidationError>) {
        let security = &config.security;
        if security.jwt_secret.len() < Self::MIN_JWT_SECRET_LENGTH {
            errors.push(ConfigValidationError::JwtSecretTooShort {
                actual: security.jwt_secret.len(),
                minimum: Self::MIN_JWT_SECRET_LENGTH,
            });
        }
        if config.app.is_production() && security.jwt_secret == DEFAULT_JWT_SECRET {
            errors.push(ConfigValidationError::DefaultJwtSecret);
        }
        if !(Self::MIN_HASH_COST..=Self::MAX_HASH_COST).contains(&security.password_hash_cost) {
            errors.push(ConfigValidationError::InvalidHashCost {
                value: security.password_hash_cost,
                minimum: Self::MIN_HASH_COST,
                maximum: Self::MAX_HASH_COST,
            });
        }
        if security.jwt_access_expiration_secs == 0 {
            errors.push(ConfigValidationError::NonPositiveTimeout {
                name: "security.jwt_access_expiration_secs".to_string(),
            });
        }
        if security.jwt_refresh_expiration_secs == 0 {
            errors.push(ConfigValidationError::NonPositiveTimeout {
                name: "security.jwt_refresh_expiration_secs".to_string(),
            });
        }
    }

    fn validate_server(config: &AppConfig, errors: &mut Vec<ConfigValidationError>) {
        if config.server.port == 0 {
            errors.push(ConfigValidationError::InvalidPort { value: 0 });
        }
        if config.server.request_timeout_secs == 0 {
            errors.push(ConfigValidationError::NonPositiveTimeout {
                name: "server.request_timeout_secs".to_string(),
            });
        }
    }

    fn validate_database(config: &AppConfig, errors: &mut Vec<ConfigValidationError>) {
        let database = &config.database;
        match Url::parse(&database.url) {
            Ok(url) if url.scheme() == "mysql" => {}
            Ok(url) => errors.push(ConfigValidationError::InvalidUrl {
                url_type: "database".to_string(),
                message: format!("unsupported scheme '{}', expected mysql://", url.scheme()),
            }),
            Err(e) => errors.push(ConfigValidationError::InvalidUrl {
                url_type: "database".to_string(),
                message: e.to_string(),
            }),
        }

        if database.min_connections > database.max_connections {
            errors.push(ConfigValidationError::InvalidPoolSize {
                min: database.min_connections,
                max: database.max_connections,
            });
        }
        if database.max_connections > Self::MAX_POOL_SIZE {
            errors.push(ConfigValidationError::PoolSizeTooLarge {
                value: database.max_connections,
                maximum: Self::MAX_POOL_SIZE,
            });
        }
        if database.connect_timeout_secs == 0 {
            errors.push(ConfigValidationError::NonPositiveTimeout {
                name: "database.connect_timeout_secs".to_string(),
            });
        }
    }

    fn validate_cache(config: &AppConfig, errors: &mut Vec<ConfigValidationError>) {
        let cache = &config.cache;
        if !cache.enabled {
            return;
        }

        if cache.default_ttl_secs == 0 {
            errors.push(ConfigValidationError::NonPositiveTimeout {
                name: "cache.default_ttl_secs".to_string(),
            });
        }
        if cache.default_ttl_secs > Self::MAX_CACHE_TTL_SECS {
            errors.push(ConfigValidationError::TtlTooLong {
                name: "cache.default_ttl_secs".to_string(),
                value: cache.default_ttl_secs,
                maximum: Self::MAX_CACHE_TTL_SECS,
            });
        }
        if cache.key_prefix.is_empty() || cache.key_prefix.contains(Self::KEY_PREFIX_FORBIDDEN) {
            errors.push(ConfigValidationError::InvalidKeyPrefix {
                value: cache.key_prefix.clone(),
            });
        }

        if cache.backend == CacheBackend::Redis {
            if !cache.url.starts_with("redis://") && !cache.url.starts_with("rediss://") {
                errors.push(ConfigValidationError::InvalidUrl {
                    url_type: "cache".to_string(),
                    message: "URL must start with redis:// or rediss://".to_string(),
                });
            }
            if cache.pool_size == 0 || cache.pool_size > Self::MAX_POOL_SIZE {
                errors.push(ConfigValidationError::PoolSizeTooLarge {
                    value: cache.pool_size,
                    maximum: Self::MAX_POOL_SIZE,
                });
            }
        }
    }

    fn validate_observability(config: &AppConfig, errors: &mut Vec<ConfigValidationError>) {
        let level = config.observability.log_level.to_lowercase();
        if !Self::VALID_LOG_LEVELS.contains(&level.as_str()) {
            errors.push(ConfigValidationError::InvalidLogLevel {
                value: config.observability.log_level.clone(),
            });
        }
    }
}

/// Formats validation errors for display.
#[must_use]
pub fn format_validation_errors(errors: &[ConfigValidationError]) -> String {
    let mut output = String::from("Configuration validation failed:\n");
    for (i, error) in errors.iter().enumerate() {
        output.push_str(&format!("  {}. {}\n", i + 1, error));
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_passes() {
        assert!(ConfigValidator::validate(&AppConfig::default()).is_ok());
    }

    #[test]
    fn test_jwt_secret_too_short() {
        let mut config = AppConfig::default();
        config.security.jwt_secret = "short".to_string();

        let errors = ConfigValidator::validate(&config).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| matches!(e, ConfigValidationError::JwtSecretTooShort { actual: 5, .. })));
    }

    #[test]
    fn test_default_secret_rejected_in_production() {
        let mut config = AppConfig::default();
        config.app.environment = "production".to_string();

        let errors = ConfigValidator::validate(&config).unwrap_err();
        assert_eq!(errors, vec![ConfigValidationError::DefaultJwtSecret]);

        config.security.jwt_secret = "p".repeat(48);
        assert!(ConfigValidator::validate(&config).is_ok());
    }

    #[test]
    fn test_zero_cache_ttl() {
        let mut config = AppConfig::default();
        config.cache.default_ttl_secs = 0;

        let errors = ConfigValidator::validate(&config).unwrap_err();
        assert!(errors.iter().any(|e| matches!(
            e,
            ConfigValidationError::NonPositiveTimeout { name } if name == "cache.default_ttl_secs"
        )));

        config.cache.enabled = false;
        assert!(ConfigValidator::validate(&config).is_ok());
    }

    #[test]
    fn test_memory_backend_ignores_redis_url() {
        let mut config = AppConfig::default();
        config.cache.backend = CacheBackend::Memory;
        config.cache.url = String::new();
        assert!(ConfigValidator::validate(&config).is_ok());
    }

    #[test]
    fn test_key_prefix_with_separator() {
        let mut config = AppConfig::default();
        config.cache.key_prefix = "shop:eu".to_string();

        let errors = ConfigValidator::validate(&config).unwrap_err();
        assert!(matches!(errors[0], ConfigValidationError::InvalidKeyPrefix { .. }));
    }

    #[test]
    fn test_key_prefix_with_glob_metacharacters() {
        for prefix in ["shop?", "shop[eu]", "shop]", "shop\\eu"] {
            let mut config = AppConfig::default();
            config.cache.key_prefix = prefix.to_string();

            let errors = ConfigValidator::validate(&config).unwrap_err();
            assert!(
                matches!(&errors[0], ConfigValidationError::InvalidKeyPrefix { value } if value == prefix),
                "{prefix}"
            );
        }
    }

    #[test]
    fn test_cache_ttl_upper_bound() {
        let mut config = AppConfig::default();
        config.cache.default_ttl_secs = u64::MAX;

        let errors = ConfigValidator::validate(&config).unwrap_err();
        assert!(matches!(
            &errors[0],
            ConfigValidationError::TtlTooLong { name, value: u64::MAX, .. } if name == "cache.default_ttl_secs"
        ));

        config.cache.default_ttl_secs = 30 * 24 * 60 * 60;
        assert!(ConfigValidator::validate(&config).is_ok());
    }

    #[test]
    fn test_invalid_database_url() {
        let mut config = AppConfig::default();
        config.database.url = "postgres://localhost/db".to_string();
        config.database.min_connections = 50;
        config.database.max_connections = 10;

        let errors = ConfigValidator::validate(&config).unwrap_err();
        assert_eq!(errors.len(), 2);
        assert!(format_validation_errors(&errors).contains("unsupported scheme 'postgres'"));
    }

    #[test]
    fn test_invalid_log_level() {
        let mut config = AppConfig::default();
        config.observability.log_level = "verbose".to_string();

        let errors = ConfigValidator::validate(&config).unwrap_err();
        assert!(matches!(&errors[0], ConfigValidationError::InvalidLogLevel { value } if value == "verbose"));
    }
}
