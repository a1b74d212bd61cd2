//! Local Storage Abstraction
//!
//! String key-value persistence with browser `localStorage` semantics. The
//! client core keeps exactly one durable value here: the session token.

use async_trait::async_trait;

use crate::error::Result;

/// Key-value local storage trait
///
/// Abstracts host-specific persistence:
/// - Desktop: SQLite file or in-memory map
/// - WebView: `window.localStorage`
///
/// Values are opaque strings. Implementations should never log values.
///
/// # Example
///
/// ```ignore
/// use bridge_traits::storage::LocalStorage;
///
/// async fn remember(storage: &dyn LocalStorage, token: &str) -> Result<()> {
///     storage.set_item("edumesh_token", token).await
/// }
/// ```
#[async_trait]
pub trait LocalStorage: Send + Sync {
    /// Read a value; `Ok(None)` when the key is absent
    async fn get_item(&self, key: &str) -> Result<Option<String>>;

    /// Store a value, overwriting any previous one
    async fn set_item(&self, key: &str, value: &str) -> Result<()>;

    /// Remove a value. Removing a missing key succeeds.
    async fn remove_item(&self, key: &str) -> Result<()>;

    /// List all stored keys
    async fn keys(&self) -> Result<Vec<String>>;

    /// Remove every stored value
    async fn clear(&self) -> Result<()>;

    /// Check if a key exists
    async fn contains(&self, key: &str) -> Result<bool> {
        Ok(self.get_item(key).await?.is_some())
    }
}
