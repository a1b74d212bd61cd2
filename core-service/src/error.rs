use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Core initialization failed: {0}")]
    InitializationFailed(String),

    #[error("Runtime error: {0}")]
    Runtime(#[from] core_runtime::Error),

    #[error("Session error: {0}")]
    Auth(#[from] core_auth::AuthError),

    #[error("API error: {0}")]
    Api(#[from] core_api::ClientError),

    #[error("Micro-frontend error: {0}")]
    Mfe(#[from] core_mfe::MfeError),
}

pub type Result<T> = std::result::Result<T, CoreError>;
