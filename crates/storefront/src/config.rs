//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All optional.
//!
//! - `STOREFRONT_HOST` - Bind address (default: 127.0.0.1)
//! - `STOREFRONT_PORT` - Listen port (default: 3000)
//! - `STOREFRONT_DATA_DIR` - Directory holding the cart, favorites, and order log (default: .bloom)
//! - `STOREFRONT_DEFAULT_SHOP` - Shop orders are attributed to when the cart does not name one
//!   (default: flowery-fragrant)
//! - `STOREFRONT_CATALOG_PATH` - JSON catalog document; the built-in demo catalog is used if unset
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name
//! - `SENTRY_SAMPLE_RATE` - Error sample rate (default: 1.0)
//! - `SENTRY_TRACES_SAMPLE_RATE` - Transaction sample rate (default: 1.0)

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use bloom_core::ShopId;
use thiserror::Error;

pub const DEFAULT_DATA_DIR: &str = ".bloom";
pub const DEFAULT_SHOP: &str = "flowery-fragrant";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront application configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Directory for the file-backed store
    pub data_dir: PathBuf,
    /// Shop to attribute orders to when the cart does not determine one
    pub default_shop: ShopId,
    /// Catalog document to load instead of the demo catalog
    pub catalog_path: Option<PathBuf>,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment name
    pub sentry_environment: Option<String>,
    /// Sentry error sample rate
    pub sentry_sample_rate: f32,
    /// Sentry transaction sample rate
    pub sentry_traces_sample_rate: f32,
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set but cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through `lookup` instead of the process environment.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set but cannot be parsed.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let env = Env(lookup);

        let host = env
            .or_default("STOREFRONT_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("STOREFRONT_HOST".to_string(), e.to_string())
            })?;
        let port = env
            .or_default("STOREFRONT_PORT", "3000")
            .parse::<u16>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("STOREFRONT_PORT".to_string(), e.to_string())
            })?;
        let data_dir = PathBuf::from(env.or_default("STOREFRONT_DATA_DIR", DEFAULT_DATA_DIR));
        let default_shop = ShopId::new(env.non_empty("STOREFRONT_DEFAULT_SHOP", DEFAULT_SHOP)?);
        let catalog_path = env.optional("STOREFRONT_CATALOG_PATH").map(PathBuf::from);

        let sentry_dsn = env.optional("SENTRY_DSN");
        let sentry_environment = env.optional("SENTRY_ENVIRONMENT");
        let sentry_sample_rate = env.sample_rate("SENTRY_SAMPLE_RATE")?;
        let sentry_traces_sample_rate = env.sample_rate("SENTRY_TRACES_SAMPLE_RATE")?;

        Ok(Self {
            host,
            port,
            data_dir,
            default_shop,
            catalog_path,
            sentry_dsn,
            sentry_environment,
            sentry_sample_rate,
            sentry_traces_sample_rate,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

struct Env<F>(F);

impl<F: Fn(&str) -> Option<String>> Env<F> {
    /// Get an optional variable. Empty values count as unset.
    fn optional(&self, key: &str) -> Option<String> {
        (self.0)(key).filter(|value| !value.trim().is_empty())
    }

    /// Get a variable with a default value.
    fn or_default(&self, key: &str, default: &str) -> String {
        self.optional(key).unwrap_or_else(|| default.to_string())
    }

    /// Get a variable with a default, rejecting values that are only whitespace.
    fn non_empty(&self, key: &str, default: &str) -> Result<String, ConfigError> {
        match (self.0)(key) {
            None => Ok(default.to_string()),
            Some(value) if value.trim().is_empty() => Err(ConfigError::InvalidEnvVar(
                key.to_string(),
                "must not be empty".to_string(),
            )),
            Some(value) => Ok(value.trim().to_string()),
        }
    }

    /// Get a sample rate in `0.0..=1.0`, defaulting to 1.0.
    fn sample_rate(&self, key: &str) -> Result<f32, ConfigError> {
        let Some(raw) = self.optional(key) else {
            return Ok(1.0);
        };
        let rate = raw
            .parse::<f32>()
            .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))?;
        if (0.0..=1.0).contains(&rate) {
            Ok(rate)
        } else {
            Err(ConfigError::InvalidEnvVar(
                key.to_string(),
                format!("must be between 0.0 and 1.0 (got {rate})"),
            ))
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn load(vars: &[(&str, &str)]) -> Result<StorefrontConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        StorefrontConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = load(&[]).unwrap();
        assert_eq!(config.socket_addr().to_string(), "127.0.0.1:3000");
        assert_eq!(config.data_dir, PathBuf::from(".bloom"));
        assert_eq!(config.default_shop.as_str(), "flowery-fragrant");
        assert!(config.catalog_path.is_none());
        assert!(config.sentry_dsn.is_none());
        assert!((config.sentry_sample_rate - 1.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_overrides() {
        let config = load(&[
            ("STOREFRONT_HOST", "0.0.0.0"),
            ("STOREFRONT_PORT", "8080"),
            ("STOREFRONT_DATA_DIR", "/var/lib/bloom"),
            ("STOREFRONT_DEFAULT_SHOP", "bloomwell"),
            ("STOREFRONT_CATALOG_PATH", "catalog.json"),
            ("SENTRY_TRACES_SAMPLE_RATE", "0.25"),
        ])
        .unwrap();

        assert_eq!(config.socket_addr().to_string(), "0.0.0.0:8080");
        assert_eq!(config.data_dir, PathBuf::from("/var/lib/bloom"));
        assert_eq!(config.default_shop.as_str(), "bloomwell");
        assert_eq!(config.catalog_path, Some(PathBuf::from("catalog.json")));
        assert!((config.sentry_traces_sample_rate - 0.25).abs() < f32::EPSILON);
    }

    #[test]
    fn test_invalid_port() {
        let err = load(&[("STOREFRONT_PORT", "70000")]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(ref key, _) if key == "STOREFRONT_PORT"));
    }

    #[test]
    fn test_sample_rate_out_of_range() {
        let err = load(&[("SENTRY_SAMPLE_RATE", "1.5")]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(ref key, _) if key == "SENTRY_SAMPLE_RATE"));
    }

    #[test]
    fn test_blank_default_shop_rejected() {
        assert!(load(&[("STOREFRONT_DEFAULT_SHOP", "  ")]).is_err());
    }
}
