//! Error types for the schema catalog

use std::path::PathBuf;
use thiserror::Error;

/// Result type for catalog operations
pub type Result<T> = std::result::Result<T, SchemaError>;

/// Errors that can occur loading a schema catalog.
///
/// These are developer-configuration bugs, not content bugs: a broken
/// catalog document means nothing downstream can be checked, so loading
/// fails fast instead of degrading to diagnostics.
#[derive(Debug, Error)]
pub enum SchemaError {
    /// Catalog document failed to parse
    #[error("failed to parse schema catalog: {source} (fix the catalog document, field validation cannot run without it)")]
    Parse {
        #[from]
        source: serde_yaml::Error,
    },

    /// Catalog file could not be read
    #[error("failed to read schema catalog {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Catalog declares no field types beyond the global pseudo-type
    #[error("schema catalog declares no field types (add at least one concrete type entry)")]
    Empty,
}
