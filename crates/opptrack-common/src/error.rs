//! Error types for Opptrack

use thiserror::Error;

/// Result type alias for Opptrack operations
pub type Result<T> = std::result::Result<T, OppError>;

/// Main error type for Opptrack
#[derive(Error, Debug)]
pub enum OppError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("CSV error: {0}")]
    Csv(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Unknown error: {0}")]
    Unknown(String),
}
