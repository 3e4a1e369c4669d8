//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All variables are optional.
//! - `STOREFRONT_HOST` - Bind address (default: 127.0.0.1)
//! - `STOREFRONT_PORT` - Listen port (default: 3000)
//! - `STOREFRONT_DATA_DIR` - Profile directory for persisted data (default: .shopfront)
//! - `CATALOG_BASE_URL` - Catalog source base URL (default: <https://dummyjson.com/>)
//! - `CATALOG_PAGE_LIMIT` - Products requested per list fetch (default: 100)
//! - `CATALOG_CACHE_TTL_SECS` - Catalog response cache lifetime (default: 300)
//! - `CATALOG_TIMEOUT_SECS` - Catalog request timeout (default: 10)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use secrecy::SecretString;
use thiserror::Error;
use url::Url;

pub const DEFAULT_CATALOG_BASE_URL: &str = "https://dummyjson.com/";
pub const DEFAULT_DATA_DIR: &str = ".shopfront";

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
    /// Directory holding the persisted profile
    pub data_dir: PathBuf,
    /// Catalog source configuration
    pub catalog: CatalogConfig,
    /// Sentry DSN for error tracking (contains the project key)
    pub sentry_dsn: Option<SecretString>,
    /// Sentry environment name
    pub sentry_environment: Option<String>,
}

/// Catalog source configuration.
#[derive(Debug, Clone)]
pub struct CatalogConfig {
    /// Base URL; `products` is joined onto it
    pub base_url: Url,
    /// `limit` parameter of list fetches
    pub page_limit: u32,
    /// How long fetched responses are served from cache
    pub cache_ttl: Duration,
    /// Per-request timeout
    pub timeout: Duration,
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set to an unparseable value.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let host = parse_env_or_default::<IpAddr>("STOREFRONT_HOST", "127.0.0.1")?;
        let port = parse_env_or_default::<u16>("STOREFRONT_PORT", "3000")?;
        let data_dir = PathBuf::from(get_env_or_default("STOREFRONT_DATA_DIR", DEFAULT_DATA_DIR));

        let catalog = CatalogConfig::from_env()?;
        let sentry_dsn = get_optional_env("SENTRY_DSN").map(SecretString::from);
        let sentry_environment = get_optional_env("SENTRY_ENVIRONMENT");

        Ok(Self {
            host,
            port,
            data_dir,
            catalog,
            sentry_dsn,
            sentry_environment,
        })
    }

    /// Configuration bound to localhost:3000 without Sentry.
    #[must_use]
    pub fn local(data_dir: impl Into<PathBuf>, catalog: CatalogConfig) -> Self {
        Self {
            host: IpAddr::from([127, 0, 0, 1]),
            port: 3000,
            data_dir: data_dir.into(),
            catalog,
            sentry_dsn: None,
            sentry_environment: None,
        }
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

impl CatalogConfig {
    /// Catalog configuration for `base_url` with default limits.
    #[must_use]
    pub const fn new(base_url: Url) -> Self {
        Self {
            base_url,
            page_limit: 100,
            cache_ttl: Duration::from_secs(300),
            timeout: Duration::from_secs(10),
        }
    }

    /// Load the catalog section from environment variables.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set to an unparseable value.
    pub fn from_env() -> Result<Self, ConfigError> {
        let base_url =
            parse_env_or_default::<Url>("CATALOG_BASE_URL", DEFAULT_CATALOG_BASE_URL)?;
        let page_limit = parse_env_or_default::<u32>("CATALOG_PAGE_LIMIT", "100")?;
        let cache_ttl = parse_env_or_default::<u64>("CATALOG_CACHE_TTL_SECS", "300")?;
        let timeout = parse_env_or_default::<u64>("CATALOG_TIMEOUT_SECS", "10")?;

        Ok(Self {
            base_url,
            page_limit,
            cache_ttl: Duration::from_secs(cache_ttl),
            timeout: Duration::from_secs(timeout),
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get an optional environment variable. Blank values count as unset.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    get_optional_env(key).unwrap_or_else(|| default.to_string())
}

/// Parse an environment variable, falling back to `default` when unset.
fn parse_env_or_default<T>(key: &str, default: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    parse_value(key, &get_env_or_default(key, default))
}

fn parse_value<T>(key: &str, value: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    value
        .trim()
        .parse::<T>()
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_value_reports_variable() {
        let err = parse_value::<u16>("STOREFRONT_PORT", "http").unwrap_err();
        let ConfigError::InvalidEnvVar(key, _) = err;
        assert_eq!(key, "STOREFRONT_PORT");
    }

    #[test]
    fn test_parse_value_trims() {
        assert_eq!(parse_value::<u32>("CATALOG_PAGE_LIMIT", " 30 ").unwrap(), 30);
        let url = parse_value::<Url>("CATALOG_BASE_URL", "http://localhost:9000/").unwrap();
        assert_eq!(url.join("products").unwrap().as_str(), "http://localhost:9000/products");
    }

    #[test]
    fn test_catalog_defaults() {
        let catalog = CatalogConfig::new(Url::parse(DEFAULT_CATALOG_BASE_URL).unwrap());
        assert_eq!(catalog.base_url.as_str(), DEFAULT_CATALOG_BASE_URL);
        assert_eq!(catalog.page_limit, 100);
        assert_eq!(catalog.cache_ttl, Duration::from_secs(300));
    }

    #[test]
    fn test_socket_addr() {
        let config = StorefrontConfig {
            host: "127.0.0.1".parse().unwrap(),
            port: 3000,
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            catalog: CatalogConfig::new(Url::parse(DEFAULT_CATALOG_BASE_URL).unwrap()),
            sentry_dsn: Some(SecretString::from("https://key@sentry.example/1")),
            sentry_environment: None,
        };

        let addr = config.socket_addr();
        assert_eq!(addr.ip().to_string(), "127.0.0.1");
        assert_eq!(addr.port(), 3000);
    }

    #[test]
    fn test_debug_redacts_sentry_dsn() {
        let config = StorefrontConfig {
            host: "127.0.0.1".parse().unwrap(),
            port: 3000,
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            catalog: CatalogConfig::new(Url::parse(DEFAULT_CATALOG_BASE_URL).unwrap()),
            sentry_dsn: Some(SecretString::from("https://supersecretkey@sentry.example/1")),
            sentry_environment: Some("test".to_string()),
        };

        let debug_output = format!("{config:?}");
        assert!(!debug_output.contains("supersecretkey"));
        assert!(debug_output.contains("test"));
    }
}
