//! # Client State Module
//!
//! The shared store and the per-domain view-state hooks.
//!
//! ## Overview
//!
//! Each hook wraps one resource API. An action marks the hook as loading,
//! calls the backend and, on success, patches the shared [`Store`]. On
//! failure it records a display message as the hook's error and returns the
//! original [`core_api::ClientError`] to the caller.
//!
//! Overlapping calls of the same action are all sent. Only the most recently
//! started one may write the store (request fencing); the others still
//! return their own result.
//!
//! ## Example
//!
//! ```no_run
//! use core_state::{JobsHook, Store, ViewState};
//! use core_api::{ApiClient, JobFilters};
//! use core_runtime::events::EventBus;
//! # async fn example(client: ApiClient) {
//! let store = Store::new(EventBus::default());
//! let jobs = JobsHook::new(client, store.clone());
//!
//! if jobs.fetch_jobs(&JobFilters::default()).await.is_err() {
//!     eprintln!("{}", jobs.error().unwrap_or_default());
//! }
//! println!("{} jobs cached", store.snapshot().jobs.data.len());
//! # }
//! ```

pub mod hooks;
pub mod store;
pub mod tracker;

pub use hooks::{AuthHook, JobsHook, MentorshipHook, PluginsHook, SkillExchangeHook, ViewState};
pub use store::{AppState, Slice, Store};
pub use tracker::{error_message, ActionGuard, ActionTracker};
