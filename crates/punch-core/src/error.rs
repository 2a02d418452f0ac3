//! Error types for punch-core

use thiserror::Error;

/// Result type alias using punch-core's Error
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in punch-core operations
#[derive(Error, Debug)]
pub enum Error {
    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Record failed pre-save validation
    #[error("Invalid record: {0}")]
    Validation(String),

    /// A sync pass was cancelled between operations
    #[error("Sync pass cancelled")]
    Cancelled,
}
