//! Field definition resolution for ViewForge.
//!
//! A field definition describes how one named field renders and validates
//! in list and form contexts. Definitions live in configuration sources
//! under three namespaces (page-scoped, entity-scoped, and a global
//! fallback), and [`FieldResolver`] walks them in that fixed order,
//! first match wins, memoized per run.
//!
//! This crate also owns the [`ConfigSource`] lookup abstraction (with
//! in-memory and YAML-directory implementations), the [`EntityMetadata`]
//! capability trait the validator uses for existence checks, and the
//! [`FormatterRegistry`] of named output transforms.

pub mod entity;
pub mod error;
pub mod formatters;
pub mod resolver;
pub mod source;
pub mod types;

pub use entity::{EntityMetadata, StaticEntityMetadata};
pub use error::{FieldsError, Result};
pub use formatters::FormatterRegistry;
pub use resolver::FieldResolver;
pub use source::{ConfigSource, MemorySource, YamlDirSource};
pub use types::FieldDefinition;
