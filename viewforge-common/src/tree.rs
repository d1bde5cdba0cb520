//! Shape helpers for raw configuration trees.
//!
//! Configuration sources hand the pipeline loosely-shaped
//! `serde_json::Value` trees. These helpers answer the two questions that
//! come up everywhere: "what is this value?" (for messages) and "what
//! lives at this dotted path?" (for source lookups).

use serde_json::Value;

/// Human-readable name for a value's shape, used in diagnostics.
pub fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "list",
        Value::Object(_) => "mapping",
    }
}

/// Walk a dotted path (`"post_fields_edit.title"`) into a tree.
///
/// Returns `None` as soon as a segment is missing or the current node is
/// not a mapping. An empty path returns the root itself.
pub fn lookup_path<'a>(root: &'a Value, path: &str) -> Option<&'a Value> {
    if path.is_empty() {
        return Some(root);
    }
    let mut node = root;
    for segment in path.split('.') {
        node = node.as_object()?.get(segment)?;
    }
    Some(node)
}
