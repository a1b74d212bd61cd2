//! # API Client Module
//!
//! Typed access to the EduMesh REST backend.
//!
//! ## Overview
//!
//! [`ApiClient`] is the single configured transport. It prefixes every path
//! with the versioned base URL, attaches the JSON headers, a fresh
//! `X-Request-Id` and the session's bearer token, and turns any failure into
//! a discriminated [`ClientError`]. A 401 clears the session through
//! [`core_auth::SessionContext`] before the error is returned.
//!
//! The [`resources`] modules map one endpoint to one typed call each and
//! unwrap the response envelope. [`error::parse_api_error`] flattens any
//! failure into the uniform [`ApiError`] shape for display.
//!
//! ## Example
//!
//! ```no_run
//! use core_api::{ApiClient, JobsApi, JobFilters};
//! # async fn example(client: ApiClient) -> core_api::Result<()> {
//! let jobs = JobsApi::new(client);
//! let page = jobs.list(&JobFilters::default()).await?;
//! println!("{} of {} jobs", page.data.len(), page.total);
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod envelope;
pub mod error;
pub mod models;
pub mod query;
pub mod resources;

pub use client::ApiClient;
pub use envelope::{Acknowledgement, ApiResponse, Paginated, PaginationParams};
pub use error::{
    form_validation_errors, parse_api_error, user_friendly_message, ApiError, ClientError,
    FieldErrors, Result,
};
pub use models::*;
pub use resources::{AuthApi, JobsApi, MentorshipApi, PluginsApi, SkillExchangeApi, UsersApi};
