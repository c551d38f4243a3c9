//! Error types for the Opptrack CLI
//!
//! Errors here are user-facing: the message should tell the user what went
//! wrong and, where possible, what to do about it.

use thiserror::Error;

/// Result type alias for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;

/// Comprehensive error type for CLI operations
#[derive(Error, Debug)]
pub enum CliError {
    /// The opportunity database is missing or unreadable
    #[error("Database error: {0}. Run 'opptrack fetch' first to populate the database.")]
    Database(#[from] sqlx::Error),

    /// File system operation failed
    #[error("File operation failed: {0}. Check file permissions and disk space.")]
    Io(#[from] std::io::Error),

    /// CSV export failed
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON parsing failed
    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    /// Shared library error
    #[error(transparent)]
    Opp(#[from] opptrack_common::OppError),

    /// Unknown document type given on the command line
    #[error("Unknown document type '{0}'. Expected one of: rfi, rfq, rfp, solicitation.")]
    UnknownDocType(String),

    /// Generic anyhow error wrapper
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
