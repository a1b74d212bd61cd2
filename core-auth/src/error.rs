use bridge_traits::BridgeError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Session storage unavailable: {0}")]
    StorageUnavailable(#[from] BridgeError),

    #[error("Invalid session token: {0}")]
    InvalidToken(String),
}

pub type Result<T> = std::result::Result<T, AuthError>;
