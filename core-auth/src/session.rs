//! Session Token Storage
//!
//! This module persists the backend's bearer token and handles a rejected
//! session.
//!
//! ## Security Features
//!
//! - Token values are never logged
//! - A 401 from any request clears the token for every caller
//!
//! ## Example
//!
//! ```no_run
//! use core_auth::SessionContext;
//! use core_runtime::events::EventBus;
//! use std::sync::Arc;
//! # use bridge_traits::LocalStorage;
//! # async fn example(storage: Arc<dyn LocalStorage>) -> core_auth::Result<()> {
//! let session = SessionContext::new(storage, EventBus::default());
//!
//! session.set_token("eyJhbGciOi...").await?;
//! assert!(session.has_token().await?);
//!
//! session.clear().await?;
//! # Ok(())
//! # }
//! ```

use crate::error::{AuthError, Result};
use bridge_traits::{LocalStorage, Navigator};
use core_runtime::config::{CoreConfig, DEFAULT_LOGIN_ROUTE, DEFAULT_TOKEN_STORAGE_KEY};
use core_runtime::events::{CoreEvent, EventBus, SessionEvent};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Explicit session state shared by the HTTP layer and the auth hook
///
/// Cloning is cheap; clones share the same storage, bus and navigator.
#[derive(Clone)]
pub struct SessionContext {
    storage: Arc<dyn LocalStorage>,
    storage_key: String,
    login_route: String,
    navigator: Option<Arc<dyn Navigator>>,
    event_bus: EventBus,
}

impl SessionContext {
    /// Create a session over `storage` with the default key and login route
    ///
    /// # Arguments
    ///
    /// * `storage` - Host local storage holding the token
    /// * `event_bus` - Bus that receives session events
    pub fn new(storage: Arc<dyn LocalStorage>, event_bus: EventBus) -> Self {
        Self {
            storage,
            storage_key: DEFAULT_TOKEN_STORAGE_KEY.to_string(),
            login_route: DEFAULT_LOGIN_ROUTE.to_string(),
            navigator: None,
            event_bus,
        }
    }

    /// Create a session from the core configuration
    pub fn from_config(config: &CoreConfig, event_bus: EventBus) -> Self {
        let mut session = Self::new(Arc::clone(&config.local_storage), event_bus)
            .with_storage_key(config.token_storage_key.clone())
            .with_login_route(config.login_route.clone());
        if let Some(navigator) = &config.navigator {
            session = session.with_navigator(Arc::clone(navigator));
        }
        session
    }

    pub fn with_storage_key(mut self, key: impl Into<String>) -> Self {
        self.storage_key = key.into();
        self
    }

    pub fn with_login_route(mut self, route: impl Into<String>) -> Self {
        self.login_route = route.into();
        self
    }

    pub fn with_navigator(mut self, navigator: Arc<dyn Navigator>) -> Self {
        self.navigator = Some(navigator);
        self
    }

    /// Route the host is sent to when the session is rejected
    pub fn login_route(&self) -> &str {
        &self.login_route
    }

    /// Storage key of the persisted token
    pub fn storage_key(&self) -> &str {
        &self.storage_key
    }

    /// The persisted token, if any
    ///
    /// An empty stored value counts as no token.
    pub async fn token(&self) -> Result<Option<String>> {
        let token = self.storage.get_item(&self.storage_key).await.map_err(|e| {
            warn!(error = %e, "Failed to read session token");
            AuthError::StorageUnavailable(e)
        })?;

        Ok(token.filter(|t| !t.is_empty()))
    }

    /// Whether a token is currently persisted
    pub async fn has_token(&self) -> Result<bool> {
        Ok(self.token().await?.is_some())
    }

    /// Persist a new token, replacing any existing one
    ///
    /// # Errors
    ///
    /// Returns `InvalidToken` for an empty token and `StorageUnavailable`
    /// if the host storage fails.
    pub async fn set_token(&self, token: &str) -> Result<()> {
        if token.trim().is_empty() {
            return Err(AuthError::InvalidToken(
                "token must not be empty".to_string(),
            ));
        }

        self.storage
            .set_item(&self.storage_key, token)
            .await
            .map_err(|e| {
                warn!(error = %e, "Failed to persist session token");
                AuthError::StorageUnavailable(e)
            })?;

        info!("Session token stored");
        self.emit(SessionEvent::TokenStored);
        Ok(())
    }

    /// Remove the persisted token
    pub async fn clear(&self) -> Result<()> {
        self.storage
            .remove_item(&self.storage_key)
            .await
            .map_err(|e| {
                warn!(error = %e, "Failed to clear session token");
                AuthError::StorageUnavailable(e)
            })?;

        info!("Session token cleared");
        self.emit(SessionEvent::TokenCleared);
        Ok(())
    }

    /// React to a 401 from the backend
    ///
    /// Clears the token, emits `SessionEvent::Unauthorized` and calls the
    /// host navigator with the login route. The event and navigation happen
    /// even if clearing the token fails; the storage error is returned
    /// afterwards.
    pub async fn handle_unauthorized(&self) -> Result<()> {
        let cleared = self.clear().await;

        warn!(route = %self.login_route, "Session rejected, requesting login");
        self.emit(SessionEvent::Unauthorized {
            login_route: self.login_route.clone(),
        });

        match &self.navigator {
            Some(navigator) => navigator.navigate(&self.login_route),
            None => debug!("No navigator configured, login route only announced on the bus"),
        }

        cleared
    }

    fn emit(&self, event: SessionEvent) {
        // No subscribers is fine
        self.event_bus.emit(CoreEvent::Session(event)).ok();
    }
}

impl fmt::Debug for SessionContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionContext")
            .field("storage_key", &self.storage_key)
            .field("login_route", &self.login_route)
            .field("has_navigator", &self.navigator.is_some())
            .finish()
    }
}
