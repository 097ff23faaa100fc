//! Error types for target file inference and enforcement.

use nlu_training_data::DataError;
use thiserror::Error;

/// Result type alias for target file operations.
pub type Result<T> = std::result::Result<T, TargetFilesError>;

/// Errors that can occur while inferring or enforcing target files.
#[derive(Error, Debug)]
pub enum TargetFilesError {
    /// NLU data directory not found.
    #[error("directory not found: {0}")]
    DirectoryNotFound(String),

    /// Target files config could not be parsed.
    #[error("invalid target files config: {0}")]
    InvalidConfig(String),

    /// Reading or writing NLU data failed.
    #[error("nlu data error: {0}")]
    Data(#[from] DataError),

    /// Storage operation failed.
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    /// Serialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_yaml::Error),

    /// IO error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Storage-specific errors.
#[derive(Error, Debug)]
pub enum StorageError {
    /// Failed to create a directory.
    #[error("failed to create directory: {0}")]
    CreateDirectory(String),

    /// Failed to read a file.
    #[error("failed to read file: {0}")]
    ReadFile(String),

    /// Failed to write a file.
    #[error("failed to write file: {0}")]
    WriteFile(String),

    /// Failed to delete a file.
    #[error("failed to delete file: {0}")]
    DeleteFile(String),
}
