//! The normalized page configuration.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One section of the form layout.
///
/// `fields` elements stay raw values on purpose: normalization fixes the
/// list shape, the validator judges each entry (and flags non-strings by
/// position).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LayoutSection {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub fields: Vec<Value>,
    #[serde(default)]
    pub divider: bool,
}

/// The canonical page-level render configuration.
///
/// After normalization all four sections are present with the correct
/// primitive shapes, whatever the raw source supplied. Unrecognized
/// top-level keys are carried through verbatim for the validator to
/// flag; normalization repairs shapes, it does not judge content.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RenderConfig {
    pub render_options: IndexMap<String, Value>,
    pub form_layout: Vec<LayoutSection>,
    pub form_hidden_fields: Vec<String>,
    pub form_extra_fields: Vec<String>,
    #[serde(flatten)]
    pub unrecognized: IndexMap<String, Value>,
}

impl RenderConfig {
    /// Serialize back into the tree shape config sources use.
    pub fn to_tree(&self) -> Value {
        serde_json::to_value(self).expect("render config serializes")
    }

    /// Every field name referenced anywhere in the layout sections,
    /// skipping non-string entries.
    pub fn layout_field_names(&self) -> impl Iterator<Item = &str> {
        self.form_layout
            .iter()
            .flat_map(|section| section.fields.iter())
            .filter_map(Value::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn to_tree_keeps_all_four_sections() {
        let config = RenderConfig::default();
        let tree = config.to_tree();
        for key in [
            "render_options",
            "form_layout",
            "form_hidden_fields",
            "form_extra_fields",
        ] {
            assert!(tree.get(key).is_some(), "missing {key}");
        }
    }

    #[test]
    fn unrecognized_keys_flatten_into_the_tree() {
        let mut config = RenderConfig::default();
        config
            .unrecognized
            .insert("form_tabs".to_string(), json!([1, 2]));
        let tree = config.to_tree();
        assert_eq!(tree["form_tabs"], json!([1, 2]));

        let back: RenderConfig = serde_json::from_value(tree).unwrap();
        assert_eq!(back.unrecognized.get("form_tabs"), Some(&json!([1, 2])));
    }

    #[test]
    fn layout_field_names_skip_non_strings() {
        let config = RenderConfig {
            form_layout: vec![
                LayoutSection {
                    fields: vec![json!("title"), json!(3)],
                    ..Default::default()
                },
                LayoutSection {
                    fields: vec![json!("body")],
                    ..Default::default()
                },
            ],
            ..Default::default()
        };
        let names: Vec<_> = config.layout_field_names().collect();
        assert_eq!(names, vec!["title", "body"]);
    }
}
