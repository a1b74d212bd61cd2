//! # Micro-frontend Module
//!
//! Registration interface for independently mountable feature modules.
//!
//! ## Overview
//!
//! A [`MicroFrontend`] has a name, can be mounted into and unmounted from a
//! host container, and exposes a [`CapabilityMap`] of named async functions
//! taking and returning JSON. The host owns an [`MfeRegistry`] and passes it
//! explicitly; there is no global registry.
//!
//! ## Example
//!
//! ```no_run
//! use core_mfe::MfeRegistry;
//! use serde_json::json;
//! # async fn example(registry: &MfeRegistry) -> core_mfe::Result<()> {
//! let jobs = registry.invoke("jobs", "fetch_jobs", json!({ "page": 1 })).await?;
//! println!("{}", jobs);
//! # Ok(())
//! # }
//! ```

pub mod capability;
pub mod error;
pub mod module;
pub mod registry;

pub use capability::{parse_args, to_value, CapabilityMap};
pub use error::{MfeError, Result};
pub use module::MicroFrontend;
pub use registry::MfeRegistry;
