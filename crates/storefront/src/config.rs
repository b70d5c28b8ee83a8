//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All optional:
//! - `STOREFRONT_HOST` - Bind address (default: 127.0.0.1)
//! - `STOREFRONT_PORT` - Listen port (default: 3000)
//! - `STOREFRONT_CONTENT_DIR` - Canonical JSON documents (default: crates/storefront/content)
//! - `STOREFRONT_CONTENT_URL` - Origin the stores fetch `/content/*.json` from
//!   (default: this server)
//! - `STOREFRONT_STORAGE_DIR` - Local storage directory (default: .local-storage)
//! - `STOREFRONT_ADMIN_PASSWORD` - Enables the admin API (min 8 chars)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;

use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;
use url::Url;

const MIN_ADMIN_PASSWORD_LENGTH: usize = 8;

/// Blocklist of common placeholder patterns (case-insensitive)
const PLACEHOLDER_PATTERNS: &[&str] = &[
    "changeme",
    "placeholder",
    "password",
    "your-",
    "xxx",
    "admin123",
];

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
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
    /// Directory holding `<name>.json` content documents
    pub content_dir: PathBuf,
    /// Origin serving `/content/<name>.json`; `None` means this server
    pub content_url: Option<Url>,
    /// Directory backing local storage
    pub storage_dir: PathBuf,
    /// Shared admin password; admin routes are disabled without one
    pub admin_password: Option<SecretString>,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment (e.g. production, staging)
    pub sentry_environment: Option<String>,
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable cannot be parsed or the admin
    /// password is too weak.
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
        let content_url = get_optional_env("STOREFRONT_CONTENT_URL")
            .map(|raw| parse_origin("STOREFRONT_CONTENT_URL", &raw))
            .transpose()?;
        let admin_password = get_optional_env("STOREFRONT_ADMIN_PASSWORD")
            .map(|value| {
                validate_admin_password(&value, "STOREFRONT_ADMIN_PASSWORD")?;
                Ok::<_, ConfigError>(SecretString::from(value))
            })
            .transpose()?;

        Ok(Self {
            host,
            port,
            content_dir: get_env_or_default("STOREFRONT_CONTENT_DIR", "crates/storefront/content")
                .into(),
            content_url,
            storage_dir: get_env_or_default("STOREFRONT_STORAGE_DIR", ".local-storage").into(),
            admin_password,
            sentry_dsn: get_optional_env("SENTRY_DSN"),
            sentry_environment: get_optional_env("SENTRY_ENVIRONMENT"),
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Origin the content stores fetch from.
    ///
    /// Falls back to this server, reached over loopback when bound to an
    /// unspecified address.
    ///
    /// # Errors
    ///
    /// Returns an error if the fallback URL cannot be built.
    pub fn content_base_url(&self) -> Result<Url, url::ParseError> {
        if let Some(url) = &self.content_url {
            return Ok(url.clone());
        }
        let host = if self.host.is_unspecified() {
            IpAddr::V4(Ipv4Addr::LOCALHOST)
        } else {
            self.host
        };
        Url::parse(&format!("http://{}/", SocketAddr::new(host, self.port)))
    }

    /// Whether the admin API is enabled.
    #[must_use]
    pub const fn admin_enabled(&self) -> bool {
        self.admin_password.is_some()
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    get_optional_env(key).unwrap_or_else(|| default.to_string())
}

/// Parse a base URL, making sure it ends in `/` so paths join below it.
fn parse_origin(var_name: &str, raw: &str) -> Result<Url, ConfigError> {
    let mut url = Url::parse(raw)
        .map_err(|e| ConfigError::InvalidEnvVar(var_name.to_string(), e.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::InvalidEnvVar(
            var_name.to_string(),
            format!("unsupported scheme '{}'", url.scheme()),
        ));
    }
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

/// Validate that the admin password is long enough and not a placeholder.
fn validate_admin_password(value: &str, var_name: &str) -> Result<(), ConfigError> {
    if value.chars().count() < MIN_ADMIN_PASSWORD_LENGTH {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!(
                "must be at least {} characters (got {})",
                MIN_ADMIN_PASSWORD_LENGTH,
                value.chars().count()
            ),
        ));
    }

    let lower = value.to_lowercase();
    for pattern in PLACEHOLDER_PATTERNS {
        if lower.contains(pattern) {
            return Err(ConfigError::InsecureSecret(
                var_name.to_string(),
                format!("appears to be a placeholder (contains '{pattern}')"),
            ));
        }
    }

    Ok(())
}

/// Compare a supplied password with the configured one.
///
/// Runs over every byte so timing does not reveal the matching prefix.
#[must_use]
pub fn password_matches(expected: &SecretString, supplied: &str) -> bool {
    let expected = expected.expose_secret().as_bytes();
    let supplied = supplied.as_bytes();
    let mut diff = expected.len() ^ supplied.len();
    for (i, &byte) in expected.iter().enumerate() {
        let other = supplied.get(i).copied().unwrap_or(0);
        diff |= usize::from(byte ^ other);
    }
    diff == 0
}
