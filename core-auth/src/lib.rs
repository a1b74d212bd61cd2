//! # Session Module
//!
//! Client-side session state for the EduMesh core.
//!
//! ## Overview
//!
//! The backend issues a bearer token on login and registration. This crate
//! persists that token in the host's `LocalStorage` under a single fixed key
//! and owns the global reaction to a rejected session: clear the token,
//! announce it on the event bus, and ask the host navigator for the login
//! route.
//!
//! The session is an explicit object. The HTTP layer receives it at
//! construction time and reads the token on every request.
//!
//! ## Features
//!
//! - Token persistence through the `LocalStorage` bridge
//! - Unauthorized handling via event plus host `Navigator` callback
//! - Session events (`TokenStored`, `TokenCleared`, `Unauthorized`)

pub mod error;
pub mod session;

pub use error::{AuthError, Result};
pub use session::SessionContext;
