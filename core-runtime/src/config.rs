//! # Core Configuration Module
//!
//! Provides configuration management for the EduMesh client core.
//!
//! ## Overview
//!
//! The configuration system uses a builder pattern to construct a `CoreConfig`
//! instance that holds all necessary host bridges and settings for the core.
//! It enforces fail-fast validation so a missing bridge is reported at startup
//! instead of on the first request.
//!
//! ## Required Dependencies
//!
//! - `HttpClient` - Transport for the REST backend
//! - `LocalStorage` - Persists the session token
//!
//! ## Optional Dependencies
//!
//! - `Navigator` - Receives the login route after a 401 (events are always emitted)
//! - `Clock` - Time source for the calendar (defaults to the system clock)
//!
//! When the `desktop-shims` feature is enabled, desktop-ready defaults for
//! `HttpClient` and `LocalStorage` are injected automatically if not provided.
//!
//! ## Usage
//!
//! ```ignore
//! use core_runtime::config::CoreConfig;
//! use std::sync::Arc;
//!
//! let config = CoreConfig::builder()
//!     .api_base_url("https://api.edumesh.io/api/v1")
//!     .http_client(Arc::new(MyHttpClient))
//!     .local_storage(Arc::new(MyLocalStorage))
//!     .build()?;
//! ```
//!
//! ## Environment
//!
//! [`CoreConfigBuilder::from_env`] seeds the builder from `EDUMESH_API_URL`,
//! `EDUMESH_LOGIN_ROUTE` and `EDUMESH_STORAGE_PATH`. Values set on the builder
//! afterwards take precedence.

use crate::error::{Error, Result};
use crate::events::DEFAULT_EVENT_BUFFER_SIZE;
use bridge_traits::{Clock, HttpClient, LocalStorage, Navigator, SystemClock};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

/// Default backend location for local development.
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:5000/api/v1";

/// Route the host is asked to show after the backend rejects the session.
pub const DEFAULT_LOGIN_ROUTE: &str = "/login";

/// Local storage key holding the session token.
pub const DEFAULT_TOKEN_STORAGE_KEY: &str = "edumesh_token";

/// Environment variable names read by [`CoreConfigBuilder::from_env`].
pub const ENV_API_URL: &str = "EDUMESH_API_URL";
pub const ENV_LOGIN_ROUTE: &str = "EDUMESH_LOGIN_ROUTE";
pub const ENV_STORAGE_PATH: &str = "EDUMESH_STORAGE_PATH";

const MAX_EVENT_BUFFER_SIZE: usize = 10_000;

/// Core configuration for the EduMesh client.
///
/// Use [`CoreConfigBuilder`] to construct instances.
#[derive(Clone)]
pub struct CoreConfig {
    /// Versioned REST base URL, without trailing slash (e.g. `https://host/api/v1`)
    pub api_base_url: String,

    /// Route passed to the navigator on 401
    pub login_route: String,

    /// Local storage key of the session token
    pub token_storage_key: String,

    /// Transport for API requests
    pub http_client: Arc<dyn HttpClient>,

    /// Token persistence
    pub local_storage: Arc<dyn LocalStorage>,

    /// File backing the desktop storage default, when one was used
    pub storage_path: Option<PathBuf>,

    /// Host navigation callback (optional)
    pub navigator: Option<Arc<dyn Navigator>>,

    /// Time source for date-relative views
    pub clock: Arc<dyn Clock>,

    /// Event bus channel capacity
    pub event_buffer_size: usize,

    /// Per-request timeout; `None` leaves the transport default in place
    pub request_timeout: Option<Duration>,
}

impl std::fmt::Debug for CoreConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CoreConfig")
            .field("api_base_url", &self.api_base_url)
            .field("login_route", &self.login_route)
            .field("token_storage_key", &self.token_storage_key)
            .field("http_client", &"HttpClient { ... }")
            .field("local_storage", &"LocalStorage { ... }")
            .field("storage_path", &self.storage_path)
            .field(
                "navigator",
                &self.navigator.as_ref().map(|_| "Navigator { ... }"),
            )
            .field("event_buffer_size", &self.event_buffer_size)
            .field("request_timeout", &self.request_timeout)
            .finish()
    }
}

impl CoreConfig {
    /// Creates a new builder for constructing a `CoreConfig`.
    pub fn builder() -> CoreConfigBuilder {
        CoreConfigBuilder::default()
    }

    /// Validates the configuration and returns an error if invalid.
    ///
    /// This checks:
    /// - The base URL is an absolute http(s) URL
    /// - The login route is an absolute path
    /// - The token key is not empty
    /// - The event buffer size is within bounds
    /// - The request timeout, when set, is non-zero
    pub fn validate(&self) -> Result<()> {
        let url = self.api_base_url.trim();
        if url.is_empty() {
            return Err(Error::Config("API base URL cannot be empty".to_string()));
        }

        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(Error::Config(format!(
                "API base URL must start with http:// or https:// (got '{}')",
                url
            )));
        }

        if !self.login_route.starts_with('/') {
            return Err(Error::Config(format!(
                "Login route must be an absolute path starting with '/' (got '{}')",
                self.login_route
            )));
        }

        if self.token_storage_key.trim().is_empty() {
            return Err(Error::Config(
                "Token storage key cannot be empty".to_string(),
            ));
        }

        if self.event_buffer_size == 0 {
            return Err(Error::Config(
                "Event buffer size must be greater than 0".to_string(),
            ));
        }

        if self.event_buffer_size > MAX_EVENT_BUFFER_SIZE {
            return Err(Error::Config(format!(
                "Event buffer size exceeds maximum of {}",
                MAX_EVENT_BUFFER_SIZE
            )));
        }

        if self.request_timeout == Some(Duration::ZERO) {
            return Err(Error::Config(
                "Request timeout must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}

#[cfg(not(feature = "desktop-shims"))]
fn http_client_missing_error() -> Error {
    Error::CapabilityMissing {
        capability: "HttpClient".to_string(),
        message: "HttpClient implementation is required to reach the EduMesh API. \
                 Desktop: enable the 'desktop-shims' feature to use the default ReqwestHttpClient. \
                 Web/WebView: inject a fetch-based client."
            .to_string(),
    }
}

#[cfg(not(feature = "desktop-shims"))]
fn local_storage_missing_error() -> Error {
    Error::CapabilityMissing {
        capability: "LocalStorage".to_string(),
        message: "LocalStorage implementation is required for session token persistence. \
                 Desktop: enable the 'desktop-shims' feature to use the default SqliteLocalStorage. \
                 Web/WebView: inject a window.localStorage-backed store."
            .to_string(),
    }
}

#[cfg(feature = "desktop-shims")]
fn provide_default_http_client(timeout: Option<Duration>) -> Result<Arc<dyn HttpClient>> {
    use bridge_desktop::ReqwestHttpClient;

    let client = match timeout {
        Some(timeout) => ReqwestHttpClient::with_timeout(timeout),
        None => ReqwestHttpClient::new(),
    }
    .map_err(|e| Error::Internal(format!("Failed to create default HttpClient: {}", e)))?;

    let client: Arc<dyn HttpClient> = Arc::new(client);
    Ok(client)
}

#[cfg(not(feature = "desktop-shims"))]
fn provide_default_http_client(_timeout: Option<Duration>) -> Result<Arc<dyn HttpClient>> {
    Err(http_client_missing_error())
}

/// Without a storage path the desktop default is in-memory, so the session
/// does not outlive the process.
#[cfg(feature = "desktop-shims")]
fn provide_default_local_storage(storage_path: Option<&PathBuf>) -> Result<Arc<dyn LocalStorage>> {
    use bridge_desktop::{MemoryLocalStorage, SqliteLocalStorage};
    use std::thread;
    use tokio::runtime::{Builder, Handle};

    let Some(path) = storage_path.cloned() else {
        let storage: Arc<dyn LocalStorage> = Arc::new(MemoryLocalStorage::new());
        return Ok(storage);
    };

    let init_storage = |path: PathBuf| -> Result<SqliteLocalStorage> {
        let runtime = Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| {
                Error::Internal(format!(
                    "Failed to create Tokio runtime for default local storage: {}",
                    e
                ))
            })?;

        runtime
            .block_on(SqliteLocalStorage::new(path))
            .map_err(|e| {
                Error::Internal(format!("Failed to initialize default LocalStorage: {}", e))
            })
    };

    // block_on panics inside a runtime, so initialize on a helper thread there
    let storage = match Handle::try_current() {
        Ok(_) => thread::spawn(move || init_storage(path))
            .join()
            .map_err(|_| {
                Error::Internal(
                    "Worker thread panicked while creating default LocalStorage".to_string(),
                )
            })??,
        Err(_) => init_storage(path)?,
    };

    let storage: Arc<dyn LocalStorage> = Arc::new(storage);
    Ok(storage)
}

#[cfg(not(feature = "desktop-shims"))]
fn provide_default_local_storage(
    _storage_path: Option<&PathBuf>,
) -> Result<Arc<dyn LocalStorage>> {
    Err(local_storage_missing_error())
}

/// Builder for constructing [`CoreConfig`] instances.
///
/// Call [`build()`](CoreConfigBuilder::build) to validate and create the
/// final config.
#[derive(Default)]
pub struct CoreConfigBuilder {
    api_base_url: Option<String>,
    login_route: Option<String>,
    token_storage_key: Option<String>,
    http_client: Option<Arc<dyn HttpClient>>,
    local_storage: Option<Arc<dyn LocalStorage>>,
    storage_path: Option<PathBuf>,
    navigator: Option<Arc<dyn Navigator>>,
    clock: Option<Arc<dyn Clock>>,
    event_buffer_size: Option<usize>,
    request_timeout: Option<Duration>,
}

impl CoreConfigBuilder {
    /// Creates a builder seeded from the process environment.
    ///
    /// Unset or empty variables are ignored.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Creates a builder seeded from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        let mut builder = Self::default();
        if let Some(url) = read(ENV_API_URL) {
            builder = builder.api_base_url(url);
        }
        if let Some(route) = read(ENV_LOGIN_ROUTE) {
            builder = builder.login_route(route);
        }
        if let Some(path) = read(ENV_STORAGE_PATH) {
            builder = builder.storage_path(path);
        }
        builder
    }

    /// Sets the versioned API base URL.
    ///
    /// Default: [`DEFAULT_API_BASE_URL`]. A trailing slash is removed.
    ///
    /// # Examples
    ///
    /// ```
    /// use core_runtime::config::CoreConfig;
    ///
    /// let builder = CoreConfig::builder()
    ///     .api_base_url("https://api.edumesh.io/api/v1");
    /// ```
    pub fn api_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = Some(url.into());
        self
    }

    /// Sets the route used for the "navigate to login" signal.
    ///
    /// Default: `/login`
    pub fn login_route(mut self, route: impl Into<String>) -> Self {
        self.login_route = Some(route.into());
        self
    }

    /// Sets the local storage key for the session token.
    ///
    /// Default: `edumesh_token`
    pub fn token_storage_key(mut self, key: impl Into<String>) -> Self {
        self.token_storage_key = Some(key.into());
        self
    }

    /// Sets the HTTP client implementation.
    ///
    /// If not provided, the desktop default (reqwest-based) is used when
    /// the `desktop-shims` feature is enabled.
    pub fn http_client(mut self, client: Arc<dyn HttpClient>) -> Self {
        self.http_client = Some(client);
        self
    }

    /// Sets the local storage implementation.
    ///
    /// If not provided and `desktop-shims` is enabled, a SQLite store at
    /// [`storage_path`](Self::storage_path) is used, or an in-memory store
    /// when no path is set.
    pub fn local_storage(mut self, storage: Arc<dyn LocalStorage>) -> Self {
        self.local_storage = Some(storage);
        self
    }

    /// Sets the file used by the default desktop local storage.
    pub fn storage_path<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.storage_path = Some(path.into());
        self
    }

    /// Sets the navigator that receives the login route on 401.
    pub fn navigator(mut self, navigator: Arc<dyn Navigator>) -> Self {
        self.navigator = Some(navigator);
        self
    }

    /// Sets the time source.
    ///
    /// Default: [`SystemClock`]
    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    /// Sets the event bus capacity.
    ///
    /// Default: 100
    pub fn event_buffer_size(mut self, size: usize) -> Self {
        self.event_buffer_size = Some(size);
        self
    }

    /// Sets a per-request timeout.
    ///
    /// Default: none (requests wait for the transport)
    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }

    /// Builds the final `CoreConfig` instance.
    ///
    /// # Returns
    ///
    /// Returns `Ok(CoreConfig)` on success, or an error if:
    /// - Required bridges are missing (HttpClient, LocalStorage)
    /// - Configuration values are invalid
    pub fn build(self) -> Result<CoreConfig> {
        let api_base_url = self
            .api_base_url
            .map(|url| url.trim().trim_end_matches('/').to_string())
            .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string());

        let http_client = match self.http_client {
            Some(client) => client,
            None => provide_default_http_client(self.request_timeout)?,
        };

        let local_storage = match self.local_storage {
            Some(storage) => storage,
            None => provide_default_local_storage(self.storage_path.as_ref())?,
        };

        let config = CoreConfig {
            api_base_url,
            login_route: self
                .login_route
                .unwrap_or_else(|| DEFAULT_LOGIN_ROUTE.to_string()),
            token_storage_key: self
                .token_storage_key
                .unwrap_or_else(|| DEFAULT_TOKEN_STORAGE_KEY.to_string()),
            http_client,
            local_storage,
            storage_path: self.storage_path,
            navigator: self.navigator,
            clock: self.clock.unwrap_or_else(|| Arc::new(SystemClock)),
            event_buffer_size: self.event_buffer_size.unwrap_or(DEFAULT_EVENT_BUFFER_SIZE),
            request_timeout: self.request_timeout,
        };

        config.validate()?;

        Ok(config)
    }
}
