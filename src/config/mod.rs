//! # Configuration
//!
//! Application configuration loaded once at startup from environment
//! variables (a `.env` file is honored via `dotenvy`).
//!
//! Configuration is an explicit struct passed by reference into the secret
//! store client, token exchanger and server - there are no ambient globals.
//! Everything except the secret store coordinates has a sensible default.

use anyhow::{Context, Result};

use crate::constants::*;

/// Top-level application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// HTTP server settings
    pub server: ServerConfig,
    /// Secret store connection settings
    pub secret_store: SecretStoreConfig,
    /// Azure AD / identity provider settings
    pub azure: AzureAdConfig,
}

impl AppConfig {
    /// Load the full configuration from environment variables
    ///
    /// # Errors
    /// Returns an error if a required secret store variable is missing or
    /// unparseable.
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            server: ServerConfig::from_env(),
            secret_store: SecretStoreConfig::from_env()?,
            azure: AzureAdConfig::from_env(),
        })
    }
}

/// HTTP server configuration
///
/// All settings have defaults and can be overridden via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Port the dashboard server listens on
    pub port: u16,
    /// Directory holding `index.html` and the `static/` assets
    pub asset_dir: String,
    /// Path to the license/billing dataset JSON file
    pub billing_data_path: String,
    /// Server startup timeout (seconds)
    pub startup_timeout_secs: u64,
    /// Server readiness poll interval (milliseconds)
    pub poll_interval_ms: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_SERVER_PORT,
            asset_dir: DEFAULT_ASSET_DIR.to_string(),
            billing_data_path: DEFAULT_BILLING_DATA_PATH.to_string(),
            startup_timeout_secs: DEFAULT_SERVER_STARTUP_TIMEOUT_SECS,
            poll_interval_ms: DEFAULT_SERVER_POLL_INTERVAL_MS,
        }
    }
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults
    pub fn from_env() -> Self {
        Self {
            port: env_var_or_default("SERVER_PORT", DEFAULT_SERVER_PORT),
            asset_dir: env_var_or("ASSET_DIR", DEFAULT_ASSET_DIR),
            billing_data_path: env_var_or("BILLING_DATA_PATH", DEFAULT_BILLING_DATA_PATH),
            startup_timeout_secs: env_var_or_default(
                "SERVER_STARTUP_TIMEOUT_SECS",
                DEFAULT_SERVER_STARTUP_TIMEOUT_SECS,
            ),
            poll_interval_ms: env_var_or_default(
                "SERVER_POLL_INTERVAL_MS",
                DEFAULT_SERVER_POLL_INTERVAL_MS,
            ),
        }
    }
}

/// Secret store connection settings
///
/// The base URL and secret ID have no meaningful defaults and must be set.
#[derive(Debug, Clone)]
pub struct SecretStoreConfig {
    /// Base URL of the secret store, e.g. `https://creds.example.com/SecretServer`
    pub base_url: String,
    /// Numeric ID of the secret holding the Azure AD credential items
    pub secret_id: u32,
    /// Verify the secret store's TLS certificate
    ///
    /// Disable only for explicitly-trusted internal certificates.
    pub verify_tls: bool,
    /// Timeout applied to each secret store call (seconds)
    pub http_timeout_secs: u64,
}

impl SecretStoreConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    /// Returns an error if `SECRET_STORE_BASE_URL` or
    /// `SECRET_STORE_SECRET_ID` is missing, or the ID is not an integer.
    pub fn from_env() -> Result<Self> {
        let base_url =
            std::env::var("SECRET_STORE_BASE_URL").context("SECRET_STORE_BASE_URL must be set")?;
        let secret_id = std::env::var("SECRET_STORE_SECRET_ID")
            .context("SECRET_STORE_SECRET_ID must be set")?
            .parse::<u32>()
            .context("SECRET_STORE_SECRET_ID must be an integer secret ID")?;

        Ok(Self {
            base_url,
            secret_id,
            verify_tls: env_var_or_default("SECRET_STORE_VERIFY_TLS", true),
            http_timeout_secs: env_var_or_default("HTTP_TIMEOUT_SECS", DEFAULT_HTTP_TIMEOUT_SECS),
        })
    }
}

/// Azure AD / identity provider settings
#[derive(Debug, Clone)]
pub struct AzureAdConfig {
    /// Identity provider base URL; the tenant and grant path are appended
    pub issuer_base: String,
    /// OAuth2 scope requested during the token exchange
    pub scope: String,
    /// Microsoft Graph base URL for group-membership checks
    pub graph_base_url: String,
    /// Fallback allowed group ID when the secret store lacks the
    /// `allowedGroupId` item
    pub allowed_group_id: Option<String>,
    /// Timeout applied to token exchange and Graph calls (seconds)
    pub http_timeout_secs: u64,
}

impl Default for AzureAdConfig {
    fn default() -> Self {
        Self {
            issuer_base: DEFAULT_TOKEN_ISSUER_BASE.to_string(),
            scope: DEFAULT_TOKEN_SCOPE.to_string(),
            graph_base_url: DEFAULT_GRAPH_BASE_URL.to_string(),
            allowed_group_id: None,
            http_timeout_secs: DEFAULT_HTTP_TIMEOUT_SECS,
        }
    }
}

impl AzureAdConfig {
    /// Load configuration from environment variables with defaults
    pub fn from_env() -> Self {
        Self {
            issuer_base: env_var_or("TOKEN_ISSUER_BASE", DEFAULT_TOKEN_ISSUER_BASE),
            scope: env_var_or("TOKEN_SCOPE", DEFAULT_TOKEN_SCOPE),
            graph_base_url: env_var_or("GRAPH_BASE_URL", DEFAULT_GRAPH_BASE_URL),
            allowed_group_id: std::env::var("ALLOWED_GROUP_ID")
                .ok()
                .filter(|v| !v.is_empty()),
            http_timeout_secs: env_var_or_default("HTTP_TIMEOUT_SECS", DEFAULT_HTTP_TIMEOUT_SECS),
        }
    }
}

/// Read environment variable or return default value
fn env_var_or_default<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

/// Read environment variable or return the default string
fn env_var_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}
