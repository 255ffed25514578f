//! Error types for mediagate-core

use thiserror::Error;

/// Result type alias using mediagate-core's Error
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in mediagate-core operations
#[derive(Error, Debug)]
pub enum Error {
    /// Database error
    #[error("Database error: {0}")]
    Database(String),

    /// SQLite error
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// File or record not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// File extension is not on the served MIME allow-list
    #[error("Unsupported media type: {0}")]
    UnsupportedMediaType(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
