//! Raw tree → canonical [`RenderConfig`].
//!
//! Normalization is total: whatever shape the source supplied, the result
//! has all four sections with correct primitive shapes. Malformed pieces
//! are repaired to safe defaults and every repair that changed a value is
//! recorded as a warning diagnostic. Content judgment (unknown keys,
//! enum membership, field existence) is left to the validator.

use indexmap::IndexMap;
use serde_json::{json, Map, Value};
use tracing::warn;

use viewforge_common::{tree::type_name, Diagnostic};

use crate::options::{ATTRIBUTES_OPTION, BOOL_OPTIONS, STRING_OPTIONS};
use crate::types::{LayoutSection, RenderConfig};

const SECTION_KEYS: &[&str] = &[
    "render_options",
    "form_layout",
    "form_hidden_fields",
    "form_extra_fields",
];

const LAYOUT_KEYS: &[&str] = &["title", "fields", "divider"];

/// Normalize a raw page tree. Never fails; the warnings describe every
/// repair that was applied.
pub fn normalize(raw: &Value) -> (RenderConfig, Vec<Diagnostic>) {
    let mut warnings = Vec::new();

    let empty = Map::new();
    let root = match raw {
        Value::Object(map) => map,
        Value::Null => &empty,
        other => {
            warnings.push(
                Diagnostic::warning(
                    "config.invalid_root",
                    format!("page configuration must be a mapping, got {}", type_name(other)),
                )
                .with_suggestion("author the page configuration as a mapping of sections"),
            );
            &empty
        }
    };

    let render_options = normalize_render_options(root.get("render_options"), &mut warnings);
    let form_layout = normalize_form_layout(root.get("form_layout"), &mut warnings);
    let form_hidden_fields = normalize_name_list(root.get("form_hidden_fields"));
    let form_extra_fields = normalize_name_list(root.get("form_extra_fields"));

    let unrecognized: IndexMap<String, Value> = root
        .iter()
        .filter(|(key, _)| !SECTION_KEYS.contains(&key.as_str()))
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect();

    for warning in &warnings {
        warn!(code = %warning.code, "{}", warning.message);
    }

    (
        RenderConfig {
            render_options,
            form_layout,
            form_hidden_fields,
            form_extra_fields,
            unrecognized,
        },
        warnings,
    )
}

fn default_render_options() -> IndexMap<String, Value> {
    let mut options = IndexMap::new();
    for (key, default) in BOOL_OPTIONS {
        options.insert((*key).to_string(), Value::Bool(*default));
    }
    for (key, default) in STRING_OPTIONS {
        options.insert((*key).to_string(), Value::String((*default).to_string()));
    }
    options.insert(ATTRIBUTES_OPTION.to_string(), json!({}));
    options
}

fn normalize_render_options(
    raw: Option<&Value>,
    warnings: &mut Vec<Diagnostic>,
) -> IndexMap<String, Value> {
    let mut options = default_render_options();

    match raw {
        None | Some(Value::Null) => {}
        Some(Value::Object(supplied)) => {
            for (key, value) in supplied {
                options.insert(key.clone(), value.clone());
            }
        }
        Some(other) => {
            warnings.push(
                Diagnostic::warning(
                    "render_options.invalid_shape",
                    format!("render_options must be a mapping, got {}", type_name(other)),
                )
                .with_suggestion("author render_options as a mapping of option names to values"),
            );
        }
    }

    for &(key, default) in BOOL_OPTIONS {
        let value = &options[key];
        if !value.is_boolean() {
            let coerced = coerce_bool(value).unwrap_or(default);
            warnings.push(coercion_warning(key, value, "boolean"));
            options.insert(key.to_string(), Value::Bool(coerced));
        }
    }

    for &(key, default) in STRING_OPTIONS {
        let value = &options[key];
        if !value.is_string() {
            let coerced = coerce_string(value).unwrap_or_else(|| default.to_string());
            warnings.push(coercion_warning(key, value, "string"));
            options.insert(key.to_string(), Value::String(coerced));
        }
    }

    if !options[ATTRIBUTES_OPTION].is_object() {
        warnings.push(
            Diagnostic::warning(
                "render_options.reset_attributes",
                format!(
                    "render_options.attributes must be a mapping, got {}, reset to empty",
                    type_name(&options[ATTRIBUTES_OPTION])
                ),
            )
            .with_suggestion("author attributes as a mapping of HTML attribute names to values"),
        );
        options.insert(ATTRIBUTES_OPTION.to_string(), json!({}));
    }

    options
}

fn coercion_warning(key: &str, value: &Value, expected: &str) -> Diagnostic {
    Diagnostic::warning(
        "render_options.coerced_value",
        format!(
            "render_options.{key} must be a {expected}, got {}, value coerced",
            type_name(value)
        ),
    )
    .with_context("option", key)
    .with_context("supplied", value.clone())
}

fn coerce_bool(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(b) => Some(*b),
        Value::String(s) => match s.to_lowercase().as_str() {
            "true" | "yes" | "1" => Some(true),
            "false" | "no" | "0" => Some(false),
            _ => None,
        },
        Value::Number(n) => n.as_i64().map(|i| i != 0),
        _ => None,
    }
}

fn coerce_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn normalize_form_layout(raw: Option<&Value>, warnings: &mut Vec<Diagnostic>) -> Vec<LayoutSection> {
    let entries = match raw {
        None | Some(Value::Null) => return Vec::new(),
        Some(Value::Array(entries)) => entries,
        Some(other) => {
            warnings.push(
                Diagnostic::warning(
                    "form_layout.invalid_shape",
                    format!("form_layout must be a list, got {}", type_name(other)),
                )
                .with_suggestion("author form_layout as an ordered list of sections"),
            );
            return Vec::new();
        }
    };

    let mut sections = Vec::new();
    for (index, entry) in entries.iter().enumerate() {
        let Some(section) = entry.as_object() else {
            warnings.push(
                Diagnostic::warning(
                    "form_layout.dropped_entry",
                    format!(
                        "form_layout[{index}] must be a mapping, got {}, entry dropped",
                        type_name(entry)
                    ),
                )
                .with_context("section", index),
            );
            continue;
        };

        for key in section.keys() {
            if !LAYOUT_KEYS.contains(&key.as_str()) {
                warnings.push(
                    Diagnostic::warning(
                        "form_layout.unknown_key",
                        format!("form_layout[{index}] has unknown key '{key}', key dropped"),
                    )
                    .with_context("section", index)
                    .with_context("key", key.as_str()),
                );
            }
        }

        let title = section
            .get("title")
            .and_then(coerce_string)
            .unwrap_or_default();

        let fields = match section.get("fields") {
            None | Some(Value::Null) => Vec::new(),
            Some(Value::Array(fields)) => fields.clone(),
            Some(other) => {
                warnings.push(
                    Diagnostic::warning(
                        "form_layout.invalid_fields",
                        format!(
                            "form_layout[{index}].fields must be a list, got {}",
                            type_name(other)
                        ),
                    )
                    .with_context("section", index),
                );
                Vec::new()
            }
        };

        let divider = match section.get("divider") {
            None | Some(Value::Null) => false,
            Some(Value::Bool(b)) => *b,
            Some(other) => {
                warnings.push(
                    Diagnostic::warning(
                        "form_layout.invalid_divider",
                        format!(
                            "form_layout[{index}].divider must be a boolean, got {}",
                            type_name(other)
                        ),
                    )
                    .with_context("section", index),
                );
                coerce_bool(other).unwrap_or(false)
            }
        };

        sections.push(LayoutSection {
            title,
            fields,
            divider,
        });
    }
    sections
}

/// Structural cleanup of the hidden/extra name lists: keep non-empty
/// strings, drop everything else silently. Whether the surviving names
/// mean anything is the validator's question.
fn normalize_name_list(raw: Option<&Value>) -> Vec<String> {
    match raw {
        Some(Value::Array(entries)) => entries
            .iter()
            .filter_map(Value::as_str)
            .filter(|name| !name.is_empty())
            .map(str::to_string)
            .collect(),
        _ => Vec::new(),
    }
}
