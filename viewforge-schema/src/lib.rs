//! Declarative schema catalog for field types.
//!
//! The catalog describes, per field type (`text`, `number`, `file`, ...),
//! which attributes a field definition may carry and what shape each
//! attribute value must have, plus the validation rules the `validators`
//! section may reference. A `global` pseudo-type holds attributes legal
//! for every type.
//!
//! The catalog is an immutable value: build it once (from the built-in
//! defaults or a YAML document) and pass it by reference into the
//! normalizer and validator. A catalog document that fails to parse is a
//! developer-configuration bug and fails fast; it is one of the two
//! fatal conditions in the pipeline.

pub mod defaults;
pub mod error;
pub mod mime;
pub mod types;

pub use error::{Result, SchemaError};
pub use types::{Constraint, SchemaCatalog, TypeSchema, GLOBAL_TYPE};
