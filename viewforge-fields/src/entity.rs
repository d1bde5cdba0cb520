//! Entity capability interface.
//!
//! The validator needs exactly two answers about the data model: does an
//! entity exist, and does it expose a named field as a readable property.
//! Keeping this behind a trait decouples the pipeline from how entities
//! are actually represented, ORM object or otherwise.

use std::collections::{HashMap, HashSet};

/// Existence queries against the target data model.
pub trait EntityMetadata {
    /// Whether the entity identifier resolves at all.
    fn has_entity(&self, entity: &str) -> bool;

    /// Whether `field` is exposed as a readable property of `entity`.
    fn has_field(&self, entity: &str, field: &str) -> bool;
}

/// Fixed entity→fields table, for tests and generated-code registries.
#[derive(Debug, Default)]
pub struct StaticEntityMetadata {
    entities: HashMap<String, HashSet<String>>,
}

impl StaticEntityMetadata {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an entity and its readable fields.
    pub fn entity<I, S>(mut self, name: impl Into<String>, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.entities
            .insert(name.into(), fields.into_iter().map(Into::into).collect());
        self
    }
}

impl EntityMetadata for StaticEntityMetadata {
    fn has_entity(&self, entity: &str) -> bool {
        self.entities.contains_key(entity)
    }

    fn has_field(&self, entity: &str, field: &str) -> bool {
        self.entities
            .get(entity)
            .is_some_and(|fields| fields.contains(field))
    }
}
