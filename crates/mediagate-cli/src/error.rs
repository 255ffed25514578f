use std::io;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Core(#[from] mediagate_core::Error),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Serialization(#[from] serde_json::Error),
    #[error("Asset ID must be a positive integer: {0}")]
    InvalidAssetId(String),
    #[error("Path is outside the uploads directory: {0}")]
    OutsideUploads(String),
    #[error("Configuration error: {0}")]
    Config(String),
}
