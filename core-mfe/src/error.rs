use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MfeError {
    #[error("Micro-frontend already registered: {0}")]
    AlreadyRegistered(String),

    #[error("Micro-frontend not found: {0}")]
    NotFound(String),

    #[error("Micro-frontend '{module}' has no capability '{capability}'")]
    CapabilityNotFound { module: String, capability: String },

    #[error("Invalid arguments: {0}")]
    InvalidArguments(String),

    #[error("Mount failed for '{name}': {message}")]
    Mount { name: String, message: String },

    #[error("Capability failed: {0}")]
    Invocation(String),
}

pub type Result<T> = std::result::Result<T, MfeError>;
