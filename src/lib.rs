//! Workspace umbrella crate.
//!
//! This crate exposes shared feature flags that map to the individual
//! workspace crates (e.g., `core-service`, `core-calendar`). Host applications
//! can depend on `edumesh-workspace` and enable the documented features
//! without needing to wire each crate individually.

#[cfg(feature = "desktop-shims")]
pub use core_service as service;

#[cfg(feature = "calendar")]
pub use core_calendar as calendar;
