//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `WORDPRESS_GRAPHQL_URL` - WPGraphQL endpoint (e.g., <https://cms.dainam.vn/graphql>)
//!
//! ## Optional
//! - `STOREFRONT_HOST` - Bind address (default: 127.0.0.1)
//! - `STOREFRONT_PORT` - Listen port (default: 3000)
//! - `STOREFRONT_SITE_ORIGIN` - Browser origin allowed by CORS (default: <http://localhost:3000>)
//! - `WORDPRESS_AUTH_TOKEN` - Bearer token for order creation (application password or JWT)
//! - `LIST_PAGE_SIZE` - Posts/projects per page (default: 9, max 50)
//! - `LIST_DEBOUNCE_MS` - Quiet interval before a filter refetch (default: 500)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name
//! - `SENTRY_SAMPLE_RATE` - Error sample rate (default: 1.0)
//! - `SENTRY_TRACES_SAMPLE_RATE` - Transaction sample rate (default: 0.0)

use std::collections::HashMap;
use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;
use url::Url;

use crate::listing::ListConfig;

/// Largest page a client may request from the list endpoints.
pub const MAX_PAGE_SIZE: u32 = 50;

const DEFAULT_PAGE_SIZE: u32 = 9;
const DEFAULT_DEBOUNCE_MS: u64 = 500;
const MIN_ENTROPY_BITS_PER_CHAR: f64 = 3.0;

/// Blocklist of common placeholder patterns (case-insensitive)
const PLACEHOLDER_PATTERNS: &[&str] = &[
    "your-",
    "changeme",
    "replace",
    "placeholder",
    "example",
    "xxx",
    "todo",
    "insert",
];

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("Insecure secret in {0}: {1}")]
    InsecureSecret(String, String),
}

/// Storefront application configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Origin of the rendered site, allowed to call the JSON API
    pub site_origin: String,
    /// WordPress connection settings
    pub wordpress: WordPressConfig,
    /// Paging and debounce settings for list views
    pub listing: ListConfig,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment (e.g., "production")
    pub sentry_environment: Option<String>,
    /// Fraction of errors reported to Sentry
    pub sentry_sample_rate: f32,
    /// Fraction of requests traced in Sentry
    pub sentry_traces_sample_rate: f32,
}

/// WordPress (WPGraphQL + WooGraphQL) configuration.
///
/// Implements `Debug` manually to redact the auth token.
#[derive(Clone)]
pub struct WordPressConfig {
    /// GraphQL endpoint URL
    pub graphql_url: Url,
    /// Bearer token sent with order mutations
    pub auth_token: Option<SecretString>,
}

impl std::fmt::Debug for WordPressConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WordPressConfig")
            .field("graphql_url", &self.graphql_url.as_str())
            .field(
                "auth_token",
                &self.auth_token.as_ref().map(|_| "[REDACTED]"),
            )
            .finish()
    }
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing, values fail to
    /// parse, or the WordPress token looks like a placeholder.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let host = parse_env("STOREFRONT_HOST", "127.0.0.1")?;
        let port = parse_env("STOREFRONT_PORT", "3000")?;
        let site_origin = get_env_or_default("STOREFRONT_SITE_ORIGIN", "http://localhost:3000");
        Url::parse(&site_origin).map_err(|e| {
            ConfigError::InvalidEnvVar("STOREFRONT_SITE_ORIGIN".to_string(), e.to_string())
        })?;

        let wordpress = WordPressConfig::from_env()?;
        let listing = list_config_from_env()?;

        Ok(Self {
            host,
            port,
            site_origin,
            wordpress,
            listing,
            sentry_dsn: get_optional_env("SENTRY_DSN"),
            sentry_environment: get_optional_env("SENTRY_ENVIRONMENT"),
            sentry_sample_rate: parse_env("SENTRY_SAMPLE_RATE", "1.0")?,
            sentry_traces_sample_rate: parse_env("SENTRY_TRACES_SAMPLE_RATE", "0.0")?,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

impl WordPressConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let raw = get_required_env("WORDPRESS_GRAPHQL_URL")?;
        let graphql_url = parse_graphql_url(&raw)?;

        let auth_token = match get_optional_env("WORDPRESS_AUTH_TOKEN") {
            Some(token) => {
                validate_secret_strength(&token, "WORDPRESS_AUTH_TOKEN")?;
                Some(SecretString::from(token))
            }
            None => None,
        };

        Ok(Self {
            graphql_url,
            auth_token,
        })
    }

    /// Whether an auth token is configured.
    #[must_use]
    pub fn has_auth_token(&self) -> bool {
        self.auth_token
            .as_ref()
            .is_some_and(|t| !t.expose_secret().is_empty())
    }
}

fn list_config_from_env() -> Result<ListConfig, ConfigError> {
    let page_size: u32 = parse_env("LIST_PAGE_SIZE", &DEFAULT_PAGE_SIZE.to_string())?;
    if !(1..=MAX_PAGE_SIZE).contains(&page_size) {
        return Err(ConfigError::InvalidEnvVar(
            "LIST_PAGE_SIZE".to_string(),
            format!("must be between 1 and {MAX_PAGE_SIZE} (got {page_size})"),
        ));
    }
    let debounce_ms: u64 = parse_env("LIST_DEBOUNCE_MS", &DEFAULT_DEBOUNCE_MS.to_string())?;

    Ok(ListConfig {
        page_size,
        debounce: Duration::from_millis(debounce_ms),
    })
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get an optional environment variable, treating blank values as unset.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    get_optional_env(key).unwrap_or_else(|| default.to_string())
}

/// Parse an environment variable, falling back to `default` when unset.
fn parse_env<T>(key: &str, default: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    get_env_or_default(key, default)
        .trim()
        .parse::<T>()
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
}

/// Parse the GraphQL endpoint, requiring an http(s) URL.
fn parse_graphql_url(raw: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(raw.trim()).map_err(|e| {
        ConfigError::InvalidEnvVar("WORDPRESS_GRAPHQL_URL".to_string(), e.to_string())
    })?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::InvalidEnvVar(
            "WORDPRESS_GRAPHQL_URL".to_string(),
            format!("unsupported scheme '{}'", url.scheme()),
        ));
    }
    Ok(url)
}

/// Calculate Shannon entropy in bits per character.
fn shannon_entropy(s: &str) -> f64 {
    if s.is_empty() {
        return 0.0;
    }

    let mut freq: HashMap<char, usize> = HashMap::new();
    for c in s.chars() {
        *freq.entry(c).or_insert(0) += 1;
    }

    #[allow(clippy::cast_precision_loss)] // String length will never exceed f64 precision
    let len = s.chars().count() as f64;
    freq.values()
        .map(|&count| {
            #[allow(clippy::cast_precision_loss)] // Character count will never exceed f64 precision
            let p = count as f64 / len;
            -p * p.log2()
        })
        .sum()
}

/// Validate that a secret is not a placeholder and has sufficient entropy.
fn validate_secret_strength(secret: &str, var_name: &str) -> Result<(), ConfigError> {
    let lower = secret.to_lowercase();

    for pattern in PLACEHOLDER_PATTERNS {
        if lower.contains(pattern) {
            return Err(ConfigError::InsecureSecret(
                var_name.to_string(),
                format!("appears to be a placeholder (contains '{pattern}')"),
            ));
        }
    }

    let entropy = shannon_entropy(secret);
    if entropy < MIN_ENTROPY_BITS_PER_CHAR {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!(
                "entropy too low ({entropy:.2} bits/char, need >= {MIN_ENTROPY_BITS_PER_CHAR:.1})"
            ),
        ));
    }

    Ok(())
}
