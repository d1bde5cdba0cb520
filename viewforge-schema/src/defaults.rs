//! Built-in schema catalog.
//!
//! Constructed in code so the engine works with no catalog file on disk.
//! A project-supplied YAML catalog replaces this wholesale; entries are
//! never merged across catalogs.

use indexmap::IndexMap;

use crate::types::{Constraint, SchemaCatalog, TypeSchema, GLOBAL_TYPE};

fn attrs(entries: Vec<(&str, Constraint)>) -> IndexMap<String, Constraint> {
    entries
        .into_iter()
        .map(|(name, constraint)| (name.to_string(), constraint))
        .collect()
}

fn type_schema(
    attributes: Vec<(&str, Constraint)>,
    rules: Vec<(&str, Constraint)>,
) -> TypeSchema {
    TypeSchema {
        attributes: attrs(attributes),
        default_validation_rules: attrs(rules),
    }
}

/// The built-in catalog.
pub fn builtin() -> SchemaCatalog {
    use Constraint::{Bool, Disallowed, Int, MimeTypes, Numeric, OneOf, Str};

    let on_off = || OneOf(vec!["on".into(), "off".into()]);

    let mut types = IndexMap::new();

    types.insert(
        GLOBAL_TYPE.to_string(),
        type_schema(
            vec![
                ("id", Str),
                ("class", Str),
                ("style", Str),
                ("title", Str),
                ("disabled", Bool),
                ("readonly", Bool),
                ("required", Bool),
                ("autofocus", Bool),
            ],
            vec![],
        ),
    );

    types.insert(
        "text".to_string(),
        type_schema(
            vec![
                ("maxlength", Int),
                ("minlength", Int),
                ("pattern", Str),
                ("placeholder", Str),
                ("size", Int),
                ("spellcheck", Bool),
                ("autocomplete", on_off()),
            ],
            vec![
                ("required", Str),
                ("maxlength", Int),
                ("minlength", Int),
                ("pattern", Str),
            ],
        ),
    );

    types.insert(
        "textarea".to_string(),
        type_schema(
            vec![
                ("rows", Int),
                ("cols", Int),
                ("maxlength", Int),
                ("minlength", Int),
                ("placeholder", Str),
                ("wrap", OneOf(vec!["soft".into(), "hard".into()])),
            ],
            vec![
                ("required", Str),
                ("maxlength", Int),
                ("minlength", Int),
            ],
        ),
    );

    types.insert(
        "number".to_string(),
        type_schema(
            vec![
                ("min", Numeric),
                ("max", Numeric),
                ("step", Numeric),
                ("placeholder", Str),
            ],
            vec![
                ("required", Str),
                ("min", Numeric),
                ("max", Numeric),
                ("step", Numeric),
            ],
        ),
    );

    types.insert(
        "email".to_string(),
        type_schema(
            vec![
                ("maxlength", Int),
                ("minlength", Int),
                ("placeholder", Str),
                ("multiple", Bool),
                ("pattern", Str),
            ],
            vec![("required", Str), ("maxlength", Int), ("pattern", Str)],
        ),
    );

    types.insert(
        "password".to_string(),
        type_schema(
            vec![
                ("maxlength", Int),
                ("minlength", Int),
                ("pattern", Str),
                ("placeholder", Str),
                (
                    "autocomplete",
                    OneOf(vec![
                        "on".into(),
                        "off".into(),
                        "new-password".into(),
                        "current-password".into(),
                    ]),
                ),
            ],
            vec![
                ("required", Str),
                ("minlength", Int),
                ("maxlength", Int),
                ("pattern", Str),
            ],
        ),
    );

    types.insert(
        "url".to_string(),
        type_schema(
            vec![("maxlength", Int), ("pattern", Str), ("placeholder", Str)],
            vec![("required", Str), ("pattern", Str)],
        ),
    );

    types.insert(
        "tel".to_string(),
        type_schema(
            vec![("maxlength", Int), ("pattern", Str), ("placeholder", Str)],
            vec![("required", Str), ("pattern", Str)],
        ),
    );

    types.insert(
        "date".to_string(),
        type_schema(
            vec![("min", Str), ("max", Str), ("step", Int)],
            vec![("required", Str), ("min", Str), ("max", Str)],
        ),
    );

    types.insert(
        "checkbox".to_string(),
        type_schema(
            vec![
                ("checked", Bool),
                ("value", Str),
                ("placeholder", Disallowed),
            ],
            vec![("required", Str)],
        ),
    );

    types.insert(
        "select".to_string(),
        type_schema(
            vec![
                ("multiple", Bool),
                ("size", Int),
                ("placeholder", Disallowed),
            ],
            vec![("required", Str)],
        ),
    );

    types.insert(
        "file".to_string(),
        type_schema(
            vec![
                ("accept", MimeTypes),
                ("multiple", Bool),
                (
                    "capture",
                    OneOf(vec!["user".into(), "environment".into()]),
                ),
            ],
            vec![
                ("required", Str),
                ("accept", MimeTypes),
                ("max_size", Int),
            ],
        ),
    );

    types.insert(
        "hidden".to_string(),
        type_schema(
            vec![
                ("value", Str),
                ("required", Disallowed),
                ("autofocus", Disallowed),
                ("placeholder", Disallowed),
            ],
            vec![],
        ),
    );

    SchemaCatalog::from_types(types)
}
