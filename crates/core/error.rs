//! Error types for Statboard.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, StatsError>;

#[derive(Debug, Error)]
pub enum StatsError {
    /// Request payload is well-formed JSON but semantically unusable.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Request payload could not be decoded into the expected shape.
    #[error("Malformed payload: {0}")]
    Decode(#[from] serde_json::Error),

    /// The query ran and matched nothing.
    #[error("No matching records")]
    NotFound,

    #[error("Unauthorized")]
    Unauthorized,

    /// The document store failed to carry out an operation.
    #[error("Store error: {0}")]
    Store(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid snapshot format")]
    InvalidFormat,

    #[error("Database is closed")]
    DatabaseClosed,

    #[error("{0}")]
    Other(String),
}

impl StatsError {
    /// Whether the caller is at fault. Client errors are reported back but
    /// never logged as server faults.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            StatsError::InvalidInput(_)
                | StatsError::Decode(_)
                | StatsError::NotFound
                | StatsError::Unauthorized
        )
    }
}
