//! Catalog data model: constraints, per-type schemas, and lookup.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::Path;
use tracing::debug;
use viewforge_common::tree::type_name;

use crate::error::{Result, SchemaError};
use crate::mime;

/// The pseudo-type whose attributes are legal for every field type.
pub const GLOBAL_TYPE: &str = "global";

/// Value constraint for one attribute or validation rule.
///
/// In catalog YAML the unit variants appear as plain strings
/// (`maxlength: int`), enumerations as `one-of: [a, b]`, lists as
/// `list-of: string`, and an explicit per-type rejection as `disallowed`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Constraint {
    /// Any string value.
    #[serde(rename = "string")]
    Str,
    /// An integer value.
    Int,
    /// A boolean value.
    Bool,
    /// Any numeric value, integer or float.
    Numeric,
    /// One of a fixed set of literals.
    OneOf(Vec<String>),
    /// An ordered list whose elements all satisfy the inner constraint.
    ListOf(Box<Constraint>),
    /// A list of MIME-type strings checked against the pattern library.
    MimeTypes,
    /// Explicitly illegal for this type, even if legal globally.
    Disallowed,
}

impl Constraint {
    /// Check a value against this constraint.
    ///
    /// Returns a human-readable reason on mismatch, naming the exact
    /// offending entry for list-shaped constraints.
    pub fn accepts(&self, value: &Value) -> std::result::Result<(), String> {
        match self {
            Constraint::Str => match value {
                Value::String(_) => Ok(()),
                other => Err(mismatch("a string", other)),
            },
            Constraint::Int => match value {
                Value::Number(n) if n.is_i64() || n.is_u64() => Ok(()),
                other => Err(mismatch("an integer", other)),
            },
            Constraint::Bool => match value {
                Value::Bool(_) => Ok(()),
                other => Err(mismatch("a boolean", other)),
            },
            Constraint::Numeric => match value {
                Value::Number(_) => Ok(()),
                other => Err(mismatch("a number", other)),
            },
            Constraint::OneOf(literals) => match value.as_str() {
                Some(s) if literals.iter().any(|l| l == s) => Ok(()),
                Some(s) => Err(format!(
                    "'{s}' is not one of the allowed values [{}]",
                    literals.join(", ")
                )),
                None => Err(mismatch("a string literal", value)),
            },
            Constraint::ListOf(inner) => {
                let items = value
                    .as_array()
                    .ok_or_else(|| mismatch("a list", value))?;
                for (i, item) in items.iter().enumerate() {
                    inner
                        .accepts(item)
                        .map_err(|why| format!("entry {i}: {why}"))?;
                }
                Ok(())
            }
            Constraint::MimeTypes => {
                let items = value
                    .as_array()
                    .ok_or_else(|| mismatch("a list of MIME types", value))?;
                for item in items {
                    let s = item
                        .as_str()
                        .ok_or_else(|| mismatch("a MIME type string", item))?;
                    if !mime::is_valid_mime_type(s) {
                        return Err(format!("'{s}' is not a recognized MIME type"));
                    }
                }
                Ok(())
            }
            Constraint::Disallowed => Err("explicitly disallowed".to_string()),
        }
    }
}

fn mismatch(expected: &str, got: &Value) -> String {
    format!("expected {expected}, got {}", type_name(got))
}

/// Schema for one field type: its attribute table and validation rules.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TypeSchema {
    /// Attribute name → value constraint.
    #[serde(default)]
    pub attributes: IndexMap<String, Constraint>,
    /// Rule name → value constraint, for the `validators` section.
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub default_validation_rules: IndexMap<String, Constraint>,
}

/// The full catalog: one [`TypeSchema`] per field type plus `global`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SchemaCatalog {
    types: IndexMap<String, TypeSchema>,
}

impl SchemaCatalog {
    /// The built-in catalog.
    pub fn builtin() -> Self {
        crate::defaults::builtin()
    }

    /// Build a catalog from an explicit type table.
    pub fn from_types(types: IndexMap<String, TypeSchema>) -> Self {
        Self { types }
    }

    /// Parse a catalog from a YAML document. Fails fast on malformed
    /// input; a broken catalog means validation cannot run at all.
    pub fn from_yaml(document: &str) -> Result<Self> {
        let catalog: Self = serde_yaml::from_str(document)?;
        if catalog.field_types().next().is_none() {
            return Err(SchemaError::Empty);
        }
        debug!(types = catalog.types.len(), "parsed schema catalog");
        Ok(catalog)
    }

    /// Load a catalog from a YAML file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let document = std::fs::read_to_string(path).map_err(|source| SchemaError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml(&document)
    }

    /// Whether `name` is a concrete field type (`global` is not).
    pub fn is_field_type(&self, name: &str) -> bool {
        name != GLOBAL_TYPE && self.types.contains_key(name)
    }

    /// Schema for a concrete field type.
    pub fn field_type(&self, name: &str) -> Option<&TypeSchema> {
        if name == GLOBAL_TYPE {
            return None;
        }
        self.types.get(name)
    }

    /// The global attribute table shared by all types.
    pub fn global(&self) -> Option<&TypeSchema> {
        self.types.get(GLOBAL_TYPE)
    }

    /// Constraint for an attribute, consulting the type's own table first
    /// and the global table second. A type-level entry (including
    /// `Disallowed`) shadows the global one.
    pub fn attribute_constraint(&self, field_type: &str, attribute: &str) -> Option<&Constraint> {
        if let Some(schema) = self.field_type(field_type) {
            if let Some(constraint) = schema.attributes.get(attribute) {
                return Some(constraint);
            }
        }
        self.global().and_then(|g| g.attributes.get(attribute))
    }

    /// Constraint for a validation rule of the given type.
    pub fn validation_rule(&self, field_type: &str, rule: &str) -> Option<&Constraint> {
        self.field_type(field_type)
            .and_then(|schema| schema.default_validation_rules.get(rule))
    }

    /// Names of the concrete field types, in catalog order.
    pub fn field_types(&self) -> impl Iterator<Item = &str> {
        self.types
            .keys()
            .map(String::as_str)
            .filter(|name| *name != GLOBAL_TYPE)
    }
}
