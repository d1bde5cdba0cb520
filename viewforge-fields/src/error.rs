//! Error types for config source loading

use std::path::PathBuf;
use thiserror::Error;

/// Result type for source operations
pub type Result<T> = std::result::Result<T, FieldsError>;

/// Errors that can occur loading configuration sources.
#[derive(Debug, Error)]
pub enum FieldsError {
    /// Source directory not found or unreadable
    #[error("config source directory not found: {path}")]
    SourceDirNotFound { path: PathBuf },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
