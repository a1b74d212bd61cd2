//! # Host Bridge Traits
//!
//! Capability traits that must be implemented by each host embedding the
//! EduMesh client core.
//!
//! ## Overview
//!
//! This crate defines the contract between the client core and the host
//! (desktop shell, WebView bridge, test harness). Each trait represents a
//! capability the core requires but that a host provides differently.
//!
//! ## Traits
//!
//! ### Networking
//! - [`HttpClient`](http::HttpClient) - Async request/response transport
//!
//! ### Storage
//! - [`LocalStorage`](storage::LocalStorage) - String key-value persistence
//!   (browser `localStorage` semantics) used for the session token
//!
//! ### Host Integration
//! - [`Navigator`](navigation::Navigator) - Route changes requested by the core
//!   (e.g., "go to login" after a 401)
//!
//! ### Utilities
//! - [`Clock`](time::Clock) - Time source for deterministic testing
//! - [`LoggerSink`](time::LoggerSink) - Forward structured logs to host logging
//!
//! ## Host Requirements
//!
//! | Host     | Implementation Crate | Status |
//! |----------|----------------------|--------|
//! | Desktop  | `bridge-desktop`     | ✅ Available |
//! | WebView  | TBD                  | 📋 Planned |
//!
//! ## Error Handling
//!
//! All bridge traits use [`BridgeError`](error::BridgeError). Implementations
//! should distinguish "no response received" ([`BridgeError::Network`]) from
//! other failures so the core can classify transport errors without
//! inspecting messages.
//!
//! ## Thread Safety
//!
//! All bridge traits require `Send + Sync` so a single instance can be
//! shared across async tasks behind an `Arc`.

pub mod error;
pub mod http;
pub mod navigation;
pub mod storage;
pub mod time;

pub use error::BridgeError;

// Re-export commonly used types
pub use http::{HttpClient, HttpMethod, HttpRequest, HttpResponse};
pub use navigation::Navigator;
pub use storage::LocalStorage;
pub use time::{Clock, ConsoleLogger, LogEntry, LogLevel, LoggerSink, SystemClock};
