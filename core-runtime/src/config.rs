//! # Core Configuration Module
//!
//! Provides configuration management for the catalog core.
//!
//! ## Overview
//!
//! The configuration system uses a builder pattern to construct a `CoreConfig`
//! holding every process-wide dependency the core needs. The host builds it
//! once at startup and hands it to `CoreService::bootstrap`, which replaces
//! the dependency-injection container of the original mobile shell.
//!
//! ## Settings
//!
//! - `api_base_url` - Catalog server root (default `http://10.0.2.2:8080/`,
//!   the Android emulator's alias for the host machine)
//! - `database_path` - SQLite file holding favorites (default `spotify_db`)
//! - `request_timeout` - Optional whole-request timeout (none by default)
//! - `http_client` - Transport bridge (desktop default: reqwest)
//! - `logging` - Subscriber configuration
//!
//! ## Usage
//!
//! ```ignore
//! use core_runtime::config::CoreConfig;
//!
//! let config = CoreConfig::builder()
//!     .api_base_url("http://192.168.1.20:8080")
//!     .database_path("/data/user/0/app/databases/spotify_db")
//!     .build()?;
//! ```
//!
//! ## Error Handling
//!
//! Without the `desktop-shims` feature an `HttpClient` must be injected, and
//! `build()` fails with [`Error::CapabilityMissing`] otherwise.

use crate::error::{Error, Result};
use crate::logging::LoggingConfig;
use bridge_traits::HttpClient;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

/// Default catalog server (Android emulator loopback to the host machine)
pub const DEFAULT_API_BASE_URL: &str = "http://10.0.2.2:8080/";

/// Default favorites database file name
pub const DEFAULT_DATABASE_PATH: &str = "spotify_db";

/// Core configuration for the catalog core.
///
/// Use [`CoreConfigBuilder`] to construct instances.
#[derive(Clone)]
pub struct CoreConfig {
    /// Catalog server root, always ending with `/`
    pub api_base_url: String,

    /// Path to the SQLite database file, or `:memory:`
    pub database_path: PathBuf,

    /// Optional whole-request timeout applied to catalog calls
    pub request_timeout: Option<Duration>,

    /// HTTP client used for every catalog request
    pub http_client: Arc<dyn HttpClient>,

    /// Logging subscriber configuration
    pub logging: LoggingConfig,
}

impl std::fmt::Debug for CoreConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CoreConfig")
            .field("api_base_url", &self.api_base_url)
            .field("database_path", &self.database_path)
            .field("request_timeout", &self.request_timeout)
            .field("http_client", &"HttpClient { ... }")
            .field("logging", &self.logging)
            .finish()
    }
}

impl CoreConfig {
    /// Creates a new builder for constructing a `CoreConfig`.
    pub fn builder() -> CoreConfigBuilder {
        CoreConfigBuilder::default()
    }

    /// True when the favorites store lives in memory only
    pub fn is_in_memory(&self) -> bool {
        self.database_path.as_os_str() == ":memory:"
    }

    /// Validates the configuration and returns an error if invalid.
    ///
    /// This checks:
    /// - Base URL is an absolute `http`/`https` URL ending with `/`
    /// - Database path is not empty
    /// - Request timeout, when set, is non-zero
    pub fn validate(&self) -> Result<()> {
        validate_base_url(&self.api_base_url)?;

        if !self.api_base_url.ends_with('/') {
            return Err(Error::Config(
                "API base URL must end with '/'".to_string(),
            ));
        }

        if self.database_path.as_os_str().is_empty() {
            return Err(Error::Config("Database path cannot be empty".to_string()));
        }

        if self.request_timeout == Some(Duration::ZERO) {
            return Err(Error::Config(
                "Request timeout must be greater than zero".to_string(),
            ));
        }

        Ok(())
    }
}

fn validate_base_url(url: &str) -> Result<()> {
    let rest = url
        .strip_prefix("http://")
        .or_else(|| url.strip_prefix("https://"))
        .ok_or_else(|| {
            Error::Config(format!(
                "API base URL must start with http:// or https://, got '{}'",
                url
            ))
        })?;

    if rest.trim_matches('/').is_empty() {
        return Err(Error::Config(format!("API base URL has no host: '{}'", url)));
    }

    Ok(())
}

/// Append the trailing slash relative paths are resolved against
fn normalize_base_url(url: &str) -> String {
    let trimmed = url.trim();
    if trimmed.ends_with('/') {
        trimmed.to_string()
    } else {
        format!("{}/", trimmed)
    }
}

#[cfg(not(feature = "desktop-shims"))]
fn http_client_missing_error() -> Error {
    Error::CapabilityMissing {
        capability: "HttpClient".to_string(),
        message: "HttpClient implementation is required for catalog requests. \
                 Desktop: ensure the 'desktop-shims' feature is enabled to use the default ReqwestHttpClient. \
                 Mobile: inject the platform-native HTTP adapter."
            .to_string(),
    }
}

#[cfg(feature = "desktop-shims")]
fn provide_default_http_client(timeout: Option<Duration>) -> Result<Arc<dyn HttpClient>> {
    use bridge_desktop::ReqwestHttpClient;

    let client = ReqwestHttpClient::with_timeout(timeout).map_err(|e| Error::CapabilityMissing {
        capability: "HttpClient".to_string(),
        message: e.to_string(),
    })?;
    let client: Arc<dyn HttpClient> = Arc::new(client);
    Ok(client)
}

#[cfg(not(feature = "desktop-shims"))]
fn provide_default_http_client(_timeout: Option<Duration>) -> Result<Arc<dyn HttpClient>> {
    Err(http_client_missing_error())
}

/// Builder for constructing [`CoreConfig`] instances.
#[derive(Default)]
pub struct CoreConfigBuilder {
    api_base_url: Option<String>,
    database_path: Option<PathBuf>,
    request_timeout: Option<Duration>,
    http_client: Option<Arc<dyn HttpClient>>,
    logging: Option<LoggingConfig>,
}

impl CoreConfigBuilder {
    /// Sets the catalog server root. A missing trailing `/` is added.
    pub fn api_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = Some(url.into());
        self
    }

    /// Sets the SQLite database path.
    pub fn database_path<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.database_path = Some(path.into());
        self
    }

    /// Keep the favorites store in memory (tests, previews).
    pub fn in_memory_database(self) -> Self {
        self.database_path(":memory:")
    }

    /// Sets a whole-request timeout for catalog calls.
    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }

    /// Sets the HTTP client implementation.
    ///
    /// If not provided, the reqwest-based client is used when the
    /// `desktop-shims` feature is enabled.
    pub fn http_client(mut self, client: Arc<dyn HttpClient>) -> Self {
        self.http_client = Some(client);
        self
    }

    /// Sets the logging configuration.
    pub fn logging(mut self, logging: LoggingConfig) -> Self {
        self.logging = Some(logging);
        self
    }

    /// Builds the final configuration, injecting defaults and validating.
    ///
    /// # Errors
    ///
    /// - [`Error::CapabilityMissing`] when no `HttpClient` is available
    /// - [`Error::Config`] when a setting is invalid
    pub fn build(self) -> Result<CoreConfig> {
        let api_base_url = normalize_base_url(
            self.api_base_url
                .as_deref()
                .unwrap_or(DEFAULT_API_BASE_URL),
        );

        let database_path = self
            .database_path
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATABASE_PATH));

        let http_client = match self.http_client {
            Some(client) => client,
            None => provide_default_http_client(self.request_timeout)?,
        };

        let config = CoreConfig {
            api_base_url,
            database_path,
            request_timeout: self.request_timeout,
            http_client,
            logging: self.logging.unwrap_or_default(),
        };

        config.validate()?;
        Ok(config)
    }
}
