//! # Core Runtime Module
//!
//! Provides foundational runtime infrastructure for the EduMesh client core:
//! - Logging and tracing infrastructure
//! - Configuration management
//! - Event bus system
//!
//! ## Overview
//!
//! This crate contains the runtime utilities that every other core crate
//! depends on. It fixes the logging conventions, the host bridge wiring and
//! the event broadcasting mechanism used throughout the workspace.

pub mod config;
pub mod error;
pub mod events;
pub mod logging;

pub use config::{CoreConfig, CoreConfigBuilder};
pub use error::{Error, Result};
pub use events::{CoreEvent, EventBus};
