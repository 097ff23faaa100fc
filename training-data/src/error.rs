//! Error types for NLU training data handling.

use thiserror::Error;

/// Result type alias for training data operations.
pub type Result<T> = std::result::Result<T, DataError>;

/// Errors that can occur while reading or writing NLU training data.
#[derive(Error, Debug)]
pub enum DataError {
    /// Failed to read a data file.
    #[error("failed to read file: {0}")]
    ReadFile(String),

    /// Failed to write a data file.
    #[error("failed to write file: {0}")]
    WriteFile(String),

    /// A data file parsed as YAML but is not valid NLU data.
    #[error("invalid NLU data: {0}")]
    InvalidFormat(String),

    /// YAML (de)serialization error.
    #[error("yaml error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// IO error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
