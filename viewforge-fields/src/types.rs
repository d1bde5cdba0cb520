//! The field definition tree.
//!
//! A definition has up to four top-level sections: `list` (display/sort
//! config), `form` (input type, attributes, nested options), `formatters`
//! (output transforms keyed by formatter name), and `validators` (keyed
//! by field type, holding rule→constraint pairs). Definitions are
//! authored in config sources and are read-only to the pipeline; the
//! accessors here interpret the tree, they never repair it. Judging
//! whether the content is legal is the validator's job.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One field's render/validation configuration, as authored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldDefinition {
    tree: Value,
}

impl FieldDefinition {
    /// Wrap a raw definition tree.
    pub fn from_tree(tree: Value) -> Self {
        Self { tree }
    }

    /// The underlying tree.
    pub fn raw(&self) -> &Value {
        &self.tree
    }

    /// Whether the definition is a mapping at all.
    pub fn is_mapping(&self) -> bool {
        self.tree.is_object()
    }

    fn section(&self, name: &str) -> Option<&Value> {
        self.tree.as_object()?.get(name)
    }

    /// The `list` section, if present.
    pub fn list(&self) -> Option<&Value> {
        self.section("list")
    }

    /// The `form` section, if present.
    pub fn form(&self) -> Option<&Value> {
        self.section("form")
    }

    /// The `formatters` section, if present.
    pub fn formatters(&self) -> Option<&Value> {
        self.section("formatters")
    }

    /// The `validators` section, if present.
    pub fn validators(&self) -> Option<&Value> {
        self.section("validators")
    }

    /// The declared form input type, when the `form` section carries one.
    pub fn form_type(&self) -> Option<&str> {
        self.form()?.as_object()?.get("type")?.as_str()
    }

    /// The `form.attributes` mapping, when present and well-shaped.
    pub fn form_attributes(&self) -> Option<&Map<String, Value>> {
        self.form()?.as_object()?.get("attributes")?.as_object()
    }
}
