//! # Desktop Bridge Implementations
//!
//! Default implementations of bridge traits for desktop hosts
//! (macOS, Windows, Linux).
//!
//! ## Overview
//!
//! This crate provides ready-to-use implementations of the bridge traits
//! using desktop-appropriate libraries:
//! - `HttpClient` using `reqwest`
//! - `LocalStorage` using a SQLite-backed key-value table
//! - `LocalStorage` held in memory (ephemeral sessions, tests)
//! - `Navigator` that records and logs route requests for shells without a router
//!
//! ## Usage
//!
//! ```ignore
//! use bridge_desktop::{ReqwestHttpClient, SqliteLocalStorage};
//! use bridge_traits::{HttpClient, LocalStorage};
//!
//! #[tokio::main]
//! async fn main() {
//!     let http_client = ReqwestHttpClient::new()?;
//!     let storage = SqliteLocalStorage::new("edumesh/storage.db".into()).await?;
//!
//!     // Use in core configuration
//! }
//! ```

mod http;
mod local_storage;
mod memory;
mod navigator;

pub use http::ReqwestHttpClient;
pub use local_storage::SqliteLocalStorage;
pub use memory::MemoryLocalStorage;
pub use navigator::LoggingNavigator;
