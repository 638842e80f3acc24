//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `AVAKIN_API_URL` - Base URL of the external gift API
//!
//! ## Optional
//! - `STOREFRONT_HOST` - Bind address (default: 127.0.0.1)
//! - `STOREFRONT_PORT` - Listen port (default: 3000)
//! - `STOREFRONT_BASE_URL` - Public URL (default: `http://localhost:3000`);
//!   an https URL enables Secure session cookies
//! - `STOREFRONT_DATABASE_URL` / `DATABASE_URL` - `PostgreSQL` connection
//!   string; when absent the service runs without the ownership ledger
//! - `CATALOG_PATH` - Item catalog JSON file
//!   (default: crates/storefront/data/items.json)
//! - `PAGE_SIZE` - Listing page size (default: 25)
//! - `AVKN_MAX_CART_ITEMS` - Cart item cap (default: 20)
//! - `AVKN_MAX_ITEM_PRICE` - Per-item price cap in coins, or `none`
//!   (default: 25000)
//! - `AVKN_MAX_CART_TOTAL` - Cart total cap in coins, or `none`
//!   (default: 100000)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name
//!
//! The cart caps are only the defaults: the `app_settings` table, when
//! reachable, overrides them at startup.

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use secrecy::SecretString;
use thiserror::Error;

use avkn_gifts_core::Price;

use crate::cart::CartLimits;
use crate::catalog::query::DEFAULT_PAGE_SIZE;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront application configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// `PostgreSQL` database connection URL (contains password); optional.
    pub database_url: Option<SecretString>,
    /// IP address to bind the server to.
    pub host: IpAddr,
    /// Port to listen on.
    pub port: u16,
    /// Public base URL for the storefront.
    pub base_url: String,
    /// Path of the item catalog JSON file.
    pub catalog_path: PathBuf,
    /// Listing page size.
    pub page_size: usize,
    /// Default cart admission caps (before `app_settings` overrides).
    pub cart_limits: CartLimits,
    /// External gift API configuration.
    pub avakin: AvakinConfig,
    /// Sentry DSN for error tracking.
    pub sentry_dsn: Option<String>,
    /// Sentry environment name.
    pub sentry_environment: Option<String>,
}

/// External gift API configuration.
#[derive(Debug, Clone)]
pub struct AvakinConfig {
    /// Base URL of the external gift API (scheme + host, no trailing path).
    pub base_url: String,
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or any
    /// variable fails to parse.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let host = get_env_or_default("STOREFRONT_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("STOREFRONT_HOST".to_string(), e.to_string())
            })?;
        let port = get_env_or_default("STOREFRONT_PORT", "3000")
            .parse::<u16>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("STOREFRONT_PORT".to_string(), e.to_string())
            })?;
        let base_url = get_env_or_default("STOREFRONT_BASE_URL", "http://localhost:3000");

        let database_url = get_database_url();
        let catalog_path = PathBuf::from(get_env_or_default(
            "CATALOG_PATH",
            "crates/storefront/data/items.json",
        ));
        let page_size = get_env_or_default("PAGE_SIZE", &DEFAULT_PAGE_SIZE.to_string())
            .parse::<usize>()
            .map_err(|e| ConfigError::InvalidEnvVar("PAGE_SIZE".to_string(), e.to_string()))?;

        let cart_limits = cart_limits_from_env()?;
        let avakin = AvakinConfig::from_env()?;

        Ok(Self {
            database_url,
            host,
            port,
            base_url,
            catalog_path,
            page_size,
            cart_limits,
            avakin,
            sentry_dsn: get_optional_env("SENTRY_DSN"),
            sentry_environment: get_optional_env("SENTRY_ENVIRONMENT"),
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

impl AvakinConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let raw = get_required_env("AVAKIN_API_URL")?;
        let parsed = url::Url::parse(&raw).map_err(|e| {
            ConfigError::InvalidEnvVar("AVAKIN_API_URL".to_string(), e.to_string())
        })?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ConfigError::InvalidEnvVar(
                "AVAKIN_API_URL".to_string(),
                format!("unsupported scheme: {}", parsed.scheme()),
            ));
        }

        Ok(Self {
            base_url: raw.trim_end_matches('/').to_string(),
        })
    }
}

fn cart_limits_from_env() -> Result<CartLimits, ConfigError> {
    let defaults = CartLimits::default();

    let max_items = match get_optional_env("AVKN_MAX_CART_ITEMS") {
        Some(raw) => raw.parse::<usize>().map_err(|e| {
            ConfigError::InvalidEnvVar("AVKN_MAX_CART_ITEMS".to_string(), e.to_string())
        })?,
        None => defaults.max_items,
    };

    Ok(CartLimits {
        max_items,
        max_item_price: parse_price_cap("AVKN_MAX_ITEM_PRICE", defaults.max_item_price)?,
        max_total: parse_price_cap("AVKN_MAX_CART_TOTAL", defaults.max_total)?,
    })
}

/// Parse an optional coin cap; the literal `none` disables it.
fn parse_price_cap(key: &str, default: Option<Price>) -> Result<Option<Price>, ConfigError> {
    match get_optional_env(key) {
        None => Ok(default),
        Some(raw) if raw.eq_ignore_ascii_case("none") => Ok(None),
        Some(raw) => raw
            .parse::<u64>()
            .map(|n| Some(Price::new(n)))
            .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string())),
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get the database URL, if configured.
///
/// Tries `STOREFRONT_DATABASE_URL` first, then the generic `DATABASE_URL`
/// (set by managed-postgres attach). Absence is not an error: the service
/// runs in degraded mode without a database.
fn get_database_url() -> Option<SecretString> {
    std::env::var("STOREFRONT_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
        .ok()
        .map(SecretString::from)
}

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}
