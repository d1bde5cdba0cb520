//! Error types for page builds

use thiserror::Error;

use crate::validator::ValidationReport;

/// Result type for page build operations
pub type Result<T> = std::result::Result<T, RenderConfigError>;

/// Errors a page build can surface to its caller.
#[derive(Debug, Error)]
pub enum RenderConfigError {
    /// No raw configuration tree exists under the page key
    #[error("no page configuration found under key '{key}'")]
    PageConfigNotFound { key: String },

    /// Validation found errors and the caller asked for enforcement
    #[error("render configuration '{source_id}' rejected: {error_count} error(s)")]
    Rejected {
        source_id: String,
        error_count: usize,
        report: ValidationReport,
    },
}
