//! Shared value types for the ViewForge configuration pipeline.
//!
//! `viewforge-common` owns the two things every stage of the pipeline
//! touches: the [`Diagnostic`] record that normalization and validation
//! emit, and small shape helpers over the `serde_json::Value` trees that
//! configuration sources hand us.

pub mod diagnostic;
pub mod tree;

pub use diagnostic::{Diagnostic, Severity};
pub use tree::{lookup_path, type_name};
