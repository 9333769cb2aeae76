//! Error types for heapcal.

use thiserror::Error;

/// Errors that can occur in heapcal core operations.
#[derive(Error, Debug)]
pub enum HeapcalError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid timestamp: {0}")]
    InvalidTimestamp(String),

    #[error("No {0} ids left")]
    IdsExhausted(&'static str),
}

/// Result type alias for heapcal operations.
pub type HeapcalResult<T> = Result<T, HeapcalError>;
