//! The fixed render-option vocabulary.
//!
//! Every page shares one flat option map. The tables here drive both the
//! normalizer (defaults and coercion targets) and the validator (type
//! re-checks and enum membership). Author-supplied keys outside these
//! tables survive normalization and are flagged by the validator.

/// Boolean options with their defaults.
pub const BOOL_OPTIONS: &[(&str, bool)] = &[
    ("ajax_save", false),
    ("show_cancel_button", true),
    ("show_reset_button", false),
    ("confirm_unsaved_exit", false),
    ("autofocus_first_field", true),
];

/// String options with their defaults.
pub const STRING_OPTIONS: &[(&str, &str)] = &[
    ("security_level", "low"),
    ("layout_type", "sequential"),
    ("error_display", "inline"),
    ("title_heading_level", "h2"),
    ("submit_button_variant", "primary"),
    ("cancel_button_variant", "secondary"),
    ("submit_button_label", "Save"),
    ("cancel_button_label", "Cancel"),
];

/// The one mapping-valued option: free-form HTML attributes for the form.
pub const ATTRIBUTES_OPTION: &str = "attributes";

/// The button style palette.
pub const BUTTON_VARIANTS: &[&str] = &[
    "primary",
    "secondary",
    "success",
    "danger",
    "warning",
    "info",
    "light",
    "dark",
    "link",
];

/// String options restricted to an enumerated set of values.
pub const ENUM_OPTIONS: &[(&str, &[&str])] = &[
    ("security_level", &["low", "medium", "high"]),
    ("layout_type", &["sequential", "fieldsets", "sections"]),
    ("error_display", &["inline", "summary"]),
    ("title_heading_level", &["h1", "h2", "h3", "h4", "h5", "h6"]),
    ("submit_button_variant", BUTTON_VARIANTS),
    ("cancel_button_variant", BUTTON_VARIANTS),
];

/// Whether `key` belongs to the recognized option vocabulary.
pub fn is_known_option(key: &str) -> bool {
    key == ATTRIBUTES_OPTION
        || BOOL_OPTIONS.iter().any(|(k, _)| *k == key)
        || STRING_OPTIONS.iter().any(|(k, _)| *k == key)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_enum_option_is_a_string_option() {
        for (key, _) in ENUM_OPTIONS {
            assert!(
                STRING_OPTIONS.iter().any(|(k, _)| k == key),
                "{key} has enum values but no string default"
            );
        }
    }

    #[test]
    fn every_enum_default_is_a_member() {
        for (key, allowed) in ENUM_OPTIONS {
            let (_, default) = STRING_OPTIONS.iter().find(|(k, _)| k == key).unwrap();
            assert!(allowed.contains(default), "{key} default {default} not allowed");
        }
    }

    #[test]
    fn known_option_covers_all_tables() {
        assert!(is_known_option("ajax_save"));
        assert!(is_known_option("security_level"));
        assert!(is_known_option("attributes"));
        assert!(!is_known_option("theme_color"));
    }
}
