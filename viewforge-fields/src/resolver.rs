//! Layered field definition resolution.
//!
//! Three namespaces are consulted in fixed precedence, first match wins,
//! never merging across levels:
//!
//! 1. page-scoped:   `{entity}:{derived page config key}.{field}`
//! 2. entity-scoped: `{entity}:{entity}_fields_root.{field}`
//! 3. global:        `base_fields.{field}`
//!
//! Each level is a small pure key builder so it can be tested in
//! isolation. Results (including misses) are memoized per resolver
//! instance. One instance lives for exactly one validation run, so the
//! same field referenced from five layout sections is resolved once.

use std::collections::HashMap;

use tracing::{debug, warn};

use crate::source::ConfigSource;
use crate::types::FieldDefinition;

/// Derive the page-scoped config key for a page.
///
/// `post_edit` on entity `post` derives `post_fields_edit`; a page key
/// that does not carry the entity prefix keeps its full name:
/// `dashboard` derives `post_fields_dashboard`.
pub fn derived_page_config_key(entity: &str, page: &str) -> String {
    let action = page
        .strip_prefix(entity)
        .and_then(|rest| rest.strip_prefix('_'))
        .unwrap_or(page);
    format!("{entity}_fields_{action}")
}

/// Lookup key for the page-scoped level.
pub fn page_scoped_key(entity: &str, page: &str, field: &str) -> String {
    format!("{entity}:{}.{field}", derived_page_config_key(entity, page))
}

/// Lookup key for the entity-scoped level.
pub fn entity_scoped_key(entity: &str, field: &str) -> String {
    format!("{entity}:{entity}_fields_root.{field}")
}

/// Lookup key for the global fallback level.
pub fn base_key(field: &str) -> String {
    format!("base_fields.{field}")
}

/// Resolves field definitions across the three namespaces, memoized for
/// the lifetime of one validation run.
pub struct FieldResolver<'a> {
    source: &'a dyn ConfigSource,
    memo: HashMap<(String, String, String), Option<FieldDefinition>>,
}

impl<'a> FieldResolver<'a> {
    pub fn new(source: &'a dyn ConfigSource) -> Self {
        Self {
            source,
            memo: HashMap::new(),
        }
    }

    /// Resolve one field. `None` is a normal outcome; the caller decides
    /// whether a missing definition is worth a diagnostic.
    pub fn resolve(&mut self, field: &str, page: &str, entity: &str) -> Option<&FieldDefinition> {
        let key = (entity.to_string(), page.to_string(), field.to_string());
        if !self.memo.contains_key(&key) {
            let resolved = self.lookup(field, page, entity);
            self.memo.insert(key.clone(), resolved);
        }
        self.memo[&key].as_ref()
    }

    fn lookup(&self, field: &str, page: &str, entity: &str) -> Option<FieldDefinition> {
        let keys = [
            page_scoped_key(entity, page, field),
            entity_scoped_key(entity, field),
            base_key(field),
        ];
        for key in &keys {
            if let Some(tree) = self.source.get(key) {
                debug!(field, %key, "resolved field definition");
                return Some(FieldDefinition::from_tree(tree));
            }
        }
        debug!(field, page, entity, "field definition not found");
        None
    }

    /// Partition `names` by resolution success alone (no schema checks).
    ///
    /// Unknown names are dropped and reported in a single aggregated
    /// warning; list-rendering paths tolerate them silently.
    pub fn filter_valid_fields(
        &mut self,
        names: &[String],
        page: &str,
        entity: &str,
    ) -> Vec<String> {
        let mut valid = Vec::new();
        let mut invalid = Vec::new();
        for name in names {
            if self.resolve(name, page, entity).is_some() {
                valid.push(name.clone());
            } else {
                invalid.push(name.as_str());
            }
        }
        if !invalid.is_empty() {
            warn!(
                page,
                entity,
                fields = invalid.join(", "),
                "dropping fields with no definition"
            );
        }
        valid
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::MemorySource;
    use serde_json::{json, Value};
    use std::cell::Cell;

    fn text_field(maxlength: u64) -> Value {
        json!({"form": {"type": "text", "attributes": {"maxlength": maxlength}}})
    }

    #[test]
    fn page_key_derivation_strips_the_entity_prefix() {
        assert_eq!(derived_page_config_key("post", "post_edit"), "post_fields_edit");
        assert_eq!(
            derived_page_config_key("post", "post_create"),
            "post_fields_create"
        );
        assert_eq!(
            derived_page_config_key("post", "dashboard"),
            "post_fields_dashboard"
        );
    }

    #[test]
    fn level_keys_are_deterministic() {
        assert_eq!(
            page_scoped_key("post", "post_edit", "title"),
            "post:post_fields_edit.title"
        );
        assert_eq!(entity_scoped_key("post", "title"), "post:post_fields_root.title");
        assert_eq!(base_key("title"), "base_fields.title");
    }

    #[test]
    fn page_scoped_wins_over_every_other_level() {
        let source = MemorySource::new()
            .insert(
                "post",
                json!({
                    "post_fields_edit": {"title": text_field(10)},
                    "post_fields_root": {"title": text_field(20)},
                }),
            )
            .insert("base_fields", json!({"title": text_field(30)}));

        let mut resolver = FieldResolver::new(&source);
        let def = resolver.resolve("title", "post_edit", "post").unwrap();
        // First match wins outright; levels are never merged.
        assert_eq!(def.raw(), &text_field(10));
    }

    #[test]
    fn entity_scoped_wins_over_base() {
        let source = MemorySource::new()
            .insert("post", json!({"post_fields_root": {"title": text_field(20)}}))
            .insert("base_fields", json!({"title": text_field(30)}));

        let mut resolver = FieldResolver::new(&source);
        let def = resolver.resolve("title", "post_edit", "post").unwrap();
        assert_eq!(def.raw(), &text_field(20));
    }

    #[test]
    fn base_is_the_last_resort() {
        let source = MemorySource::new().insert("base_fields", json!({"title": text_field(30)}));
        let mut resolver = FieldResolver::new(&source);
        let def = resolver.resolve("title", "post_edit", "post").unwrap();
        assert_eq!(def.raw(), &text_field(30));
    }

    #[test]
    fn unknown_field_is_a_normal_miss() {
        let source = MemorySource::new();
        let mut resolver = FieldResolver::new(&source);
        assert!(resolver.resolve("ghost_field", "post_edit", "post").is_none());
    }

    /// Counts lookups so memoization is observable.
    struct CountingSource {
        inner: MemorySource,
        lookups: Cell<usize>,
    }

    impl ConfigSource for CountingSource {
        fn get(&self, key: &str) -> Option<Value> {
            self.lookups.set(self.lookups.get() + 1);
            self.inner.get(key)
        }
    }

    #[test]
    fn hits_and_misses_are_both_memoized() {
        let source = CountingSource {
            inner: MemorySource::new().insert("base_fields", json!({"title": text_field(30)})),
            lookups: Cell::new(0),
        };
        let mut resolver = FieldResolver::new(&source);

        resolver.resolve("title", "post_edit", "post");
        let after_first = source.lookups.get();
        for _ in 0..5 {
            resolver.resolve("title", "post_edit", "post");
        }
        assert_eq!(source.lookups.get(), after_first);

        resolver.resolve("ghost_field", "post_edit", "post");
        let after_miss = source.lookups.get();
        resolver.resolve("ghost_field", "post_edit", "post");
        assert_eq!(source.lookups.get(), after_miss);
    }

    #[test]
    fn distinct_triples_are_cached_separately() {
        let source = MemorySource::new()
            .insert(
                "post",
                json!({"post_fields_edit": {"title": text_field(10)}}),
            )
            .insert("base_fields", json!({"title": text_field(30)}));
        let mut resolver = FieldResolver::new(&source);

        let edit = resolver.resolve("title", "post_edit", "post").unwrap().clone();
        let create = resolver.resolve("title", "post_create", "post").unwrap().clone();
        assert_eq!(edit.raw(), &text_field(10));
        assert_eq!(create.raw(), &text_field(30));
    }

    #[test]
    fn filter_valid_fields_partitions_by_resolution() {
        let source = MemorySource::new().insert(
            "base_fields",
            json!({"title": text_field(10), "body": text_field(20)}),
        );
        let mut resolver = FieldResolver::new(&source);
        let names = vec![
            "title".to_string(),
            "ghost_field".to_string(),
            "body".to_string(),
        ];
        let valid = resolver.filter_valid_fields(&names, "post_list", "post");
        assert_eq!(valid, vec!["title".to_string(), "body".to_string()]);
    }
}
