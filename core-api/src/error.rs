//! Error taxonomy and normalization
//!
//! The transport reports failures as a discriminated [`ClientError`]. UI-facing
//! code flattens any of them into the uniform [`ApiError`] shape with
//! [`parse_api_error`], then picks a display string with
//! [`user_friendly_message`].

use core_auth::AuthError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use thiserror::Error;

pub const CODE_API_ERROR: &str = "API_ERROR";
pub const CODE_NETWORK_ERROR: &str = "NETWORK_ERROR";
pub const CODE_UNKNOWN_ERROR: &str = "UNKNOWN_ERROR";

pub const NETWORK_ERROR_MESSAGE: &str = "Network error. Please check your connection.";
pub const UNKNOWN_ERROR_MESSAGE: &str = "An unexpected error occurred";

/// Field name to list of validation messages
pub type FieldErrors = HashMap<String, Vec<String>>;

/// Error body the backend sends with non-2xx responses
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerErrorBody {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub errors: Option<FieldErrors>,
}

/// Transport-level failure
#[derive(Error, Debug)]
pub enum ClientError {
    /// A response was received with a non-2xx status
    #[error("{message}")]
    Status {
        status: u16,
        /// Transport message, e.g. "Request failed with status code 404"
        message: String,
        /// Parsed server error body, when the body was JSON
        body: Option<ServerErrorBody>,
    },

    /// The request was sent but no response arrived
    #[error("Network error: {0}")]
    Network(String),

    /// 2xx response whose body is not the expected envelope
    #[error("Failed to decode response: {0}")]
    Decode(String),

    /// An already-normalized error
    #[error("{0}")]
    Api(ApiError),

    /// Session token storage failed
    #[error("Session unavailable: {0}")]
    Session(#[from] AuthError),

    #[error("{0}")]
    Unknown(String),
}

impl ClientError {
    /// Build a status error, keeping the server body when it parses
    pub fn from_status(status: u16, body: &[u8]) -> Self {
        let body = serde_json::from_slice::<ServerErrorBody>(body).ok();
        ClientError::Status {
            status,
            message: format!("Request failed with status code {}", status),
            body,
        }
    }

    /// HTTP status, when a response was received
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Status { status, .. } => Some(*status),
            ClientError::Api(api) => api.status,
            _ => None,
        }
    }

    /// Message the server put in its error body, if any
    pub fn server_message(&self) -> Option<&str> {
        match self {
            ClientError::Status {
                body: Some(body), ..
            } => body.message.as_deref(),
            _ => None,
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(401)
    }

    pub fn is_network(&self) -> bool {
        matches!(self, ClientError::Network(_))
    }
}

/// Uniform error shape handed to the UI layer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiError {
    pub message: String,
    pub code: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub errors: Option<FieldErrors>,
}

impl ApiError {
    pub fn new(message: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            code: code.into(),
            status: None,
            errors: None,
        }
    }

    pub fn with_status(mut self, status: u16) -> Self {
        self.status = Some(status);
        self
    }

    pub fn with_errors(mut self, errors: FieldErrors) -> Self {
        self.errors = Some(errors);
        self
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ApiError {}

impl From<ApiError> for ClientError {
    fn from(error: ApiError) -> Self {
        ClientError::Api(error)
    }
}

pub type Result<T> = std::result::Result<T, ClientError>;

/// Normalize any client error into an [`ApiError`]
///
/// Idempotent: `ClientError::Api(e)` yields `e` unchanged.
///
/// # Classification
///
/// - Response received: server message (or the transport message), server
///   code (or `API_ERROR`), the status and any field errors
/// - No response: `NETWORK_ERROR` with a fixed connectivity message
/// - Anything else: `UNKNOWN_ERROR`
pub fn parse_api_error(error: &ClientError) -> ApiError {
    match error {
        ClientError::Api(api) => api.clone(),
        ClientError::Status {
            status,
            message,
            body,
        } => {
            let body = body.clone().unwrap_or_default();
            ApiError {
                message: body
                    .message
                    .filter(|m| !m.is_empty())
                    .unwrap_or_else(|| message.clone()),
                code: body.code.unwrap_or_else(|| CODE_API_ERROR.to_string()),
                status: Some(*status),
                errors: body.errors,
            }
        }
        ClientError::Network(_) => ApiError::new(NETWORK_ERROR_MESSAGE, CODE_NETWORK_ERROR),
        other => {
            let message = other.to_string();
            let message = if message.is_empty() {
                UNKNOWN_ERROR_MESSAGE.to_string()
            } else {
                message
            };
            ApiError::new(message, CODE_UNKNOWN_ERROR)
        }
    }
}

/// Fixed display string for well-known statuses, else the raw message
pub fn user_friendly_message(error: &ApiError) -> String {
    match error.status {
        Some(400) => "Invalid request. Please check your input.".to_string(),
        Some(401) => "You are not authorized. Please log in.".to_string(),
        Some(403) => "You do not have permission to perform this action.".to_string(),
        Some(404) => "The requested resource was not found.".to_string(),
        Some(409) => "This resource already exists or conflicts with another.".to_string(),
        Some(422) => "Validation failed. Please check your input.".to_string(),
        Some(429) => "Too many requests. Please try again later.".to_string(),
        Some(status) if (500..600).contains(&status) => {
            "Server error. Please try again later.".to_string()
        }
        _ => error.message.clone(),
    }
}

/// Flatten field errors to the first message per field
///
/// Fields with an empty message list are dropped.
pub fn form_validation_errors(error: &ApiError) -> HashMap<String, String> {
    error
        .errors
        .iter()
        .flatten()
        .filter_map(|(field, messages)| {
            messages
                .first()
                .map(|first| (field.clone(), first.clone()))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status_error(status: u16, body: &str) -> ClientError {
        ClientError::from_status(status, body.as_bytes())
    }

    #[test]
    fn test_server_error_uses_body_fields() {
        let err = status_error(
            422,
            r#"{"message":"Email taken","code":"EMAIL_EXISTS","errors":{"email":["Email taken"]}}"#,
        );
        let api = parse_api_error(&err);

        assert_eq!(api.message, "Email taken");
        assert_eq!(api.code, "EMAIL_EXISTS");
        assert_eq!(api.status, Some(422));
        assert!(api.errors.is_some());
    }

    #[test]
    fn test_server_error_without_body_falls_back() {
        let api = parse_api_error(&status_error(502, "<html>Bad gateway</html>"));

        assert_eq!(api.message, "Request failed with status code 502");
        assert_eq!(api.code, CODE_API_ERROR);
        assert_eq!(api.status, Some(502));
    }

    #[test]
    fn test_network_error() {
        let api = parse_api_error(&ClientError::Network("connection refused".to_string()));

        assert_eq!(api.code, CODE_NETWORK_ERROR);
        assert_eq!(api.message, NETWORK_ERROR_MESSAGE);
        assert_eq!(api.status, None);
    }

    #[test]
    fn test_unknown_error() {
        let api = parse_api_error(&ClientError::Decode("missing field `data`".to_string()));
        assert_eq!(api.code, CODE_UNKNOWN_ERROR);
        assert!(api.message.contains("missing field"));

        let api = parse_api_error(&ClientError::Unknown(String::new()));
        assert_eq!(api.message, UNKNOWN_ERROR_MESSAGE);
    }

    #[test]
    fn test_parse_is_idempotent() {
        let inputs = vec![
            status_error(404, r#"{"message":"Job not found"}"#),
            status_error(500, ""),
            ClientError::Network("timeout".to_string()),
            ClientError::Unknown("boom".to_string()),
        ];

        for input in inputs {
            let once = parse_api_error(&input);
            let twice = parse_api_error(&ClientError::Api(once.clone()));
            assert_eq!(once, twice);
        }
    }

    #[test]
    fn test_user_friendly_messages() {
        let with_status = |status| ApiError::new("raw", CODE_API_ERROR).with_status(status);

        assert_eq!(
            user_friendly_message(&with_status(404)),
            "The requested resource was not found."
        );
        assert_eq!(
            user_friendly_message(&with_status(401)),
            "You are not authorized. Please log in."
        );
        assert_eq!(
            user_friendly_message(&with_status(503)),
            "Server error. Please try again later."
        );
        assert_eq!(user_friendly_message(&with_status(418)), "raw");
        assert_eq!(
            user_friendly_message(&ApiError::new("offline", CODE_NETWORK_ERROR)),
            "offline"
        );
    }

    #[test]
    fn test_status_404_ignores_message() {
        let api = ApiError::new("Job 123 was deleted", CODE_API_ERROR).with_status(404);
        assert_eq!(
            user_friendly_message(&api),
            "The requested resource was not found."
        );
    }

    #[test]
    fn test_form_validation_takes_first_message() {
        let mut errors = FieldErrors::new();
        errors.insert(
            "email".to_string(),
            vec!["bad".to_string(), "also bad".to_string()],
        );
        errors.insert("name".to_string(), vec![]);
        let api = ApiError::new("Validation failed", CODE_API_ERROR).with_errors(errors);

        let flat = form_validation_errors(&api);
        assert_eq!(flat.len(), 1);
        assert_eq!(flat.get("email"), Some(&"bad".to_string()));
    }

    #[test]
    fn test_form_validation_without_errors_is_empty() {
        assert!(form_validation_errors(&ApiError::new("x", CODE_API_ERROR)).is_empty());
    }
}
