//! Page render configuration: normalization and validation.
//!
//! The page-level pipeline runs in three stages:
//!
//! 1. A raw, loosely-shaped configuration tree comes out of a
//!    [`viewforge_fields::ConfigSource`].
//! 2. [`normalizer::normalize`] repairs it into a canonical
//!    [`RenderConfig`]. Normalization never fails, and every repair is
//!    recorded as a warning diagnostic.
//! 3. [`Validator::validate`] cross-references the normalized tree
//!    against the schema catalog and the entity metadata and collects
//!    structured diagnostics; field definitions referenced from the
//!    layout are resolved and schema-checked along the way.
//!
//! [`RenderPipeline`] wires all three together for one page build.

pub mod error;
pub mod field_schema;
pub mod normalizer;
pub mod options;
pub mod pipeline;
pub mod types;
pub mod validator;

pub use error::{RenderConfigError, Result};
pub use field_schema::{validate_field_definition, FieldConfigError, Scope};
pub use normalizer::normalize;
pub use pipeline::{PageBuild, RenderPipeline};
pub use types::{LayoutSection, RenderConfig};
pub use validator::{ValidationPolicy, ValidationReport, Validator};
