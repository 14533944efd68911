//! Error types for rulefold.

use thiserror::Error;

/// Error type for rulefold operations.
#[derive(Error, Debug)]
pub enum Error {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error
    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),

    /// Unknown rule category selector
    #[error("unknown category: {0}")]
    UnknownCategory(String),

    /// Feed download error
    #[error("download error: {0}")]
    Download(String),
}

/// Result type alias for rulefold operations.
pub type Result<T> = std::result::Result<T, Error>;
