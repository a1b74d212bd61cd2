use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CalendarError {
    #[error("Event source failed: {0}")]
    Source(String),

    #[error("Date out of range: {0}")]
    DateOutOfRange(String),

    #[error("Unknown event: {0}")]
    UnknownEvent(String),
}

pub type Result<T> = std::result::Result<T, CalendarError>;
