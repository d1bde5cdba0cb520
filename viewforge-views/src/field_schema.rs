//! Field definition schema validation.
//!
//! Checks one resolved field definition against the schema catalog.
//! Validation is fail-fast: the first violation is returned as a single
//! structured [`FieldConfigError`] which the page validator folds into
//! its diagnostics list, so one bad field never aborts the page run.
//! Non-fatal findings (ambiguous authoring) go to the `warnings` sink.

use indexmap::IndexMap;
use serde_json::{Map, Value};
use thiserror::Error;

use viewforge_common::{tree::type_name, Diagnostic};
use viewforge_fields::FieldDefinition;
use viewforge_schema::{Constraint, SchemaCatalog, GLOBAL_TYPE};

/// Which sections of the definition to check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    /// Only the `list` section.
    List,
    /// The `form` and `validators` sections.
    Form,
    /// Everything.
    Full,
}

impl Scope {
    fn covers_list(self) -> bool {
        matches!(self, Scope::List | Scope::Full)
    }

    fn covers_form(self) -> bool {
        matches!(self, Scope::Form | Scope::Full)
    }
}

/// A single schema violation in one field definition.
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct FieldConfigError {
    /// Stable dotted code.
    pub code: String,
    /// Human message naming the offending key or value.
    pub message: String,
    /// Concrete remediation.
    pub suggestion: String,
    /// Structured context.
    pub context: IndexMap<String, Value>,
}

impl FieldConfigError {
    fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            suggestion: String::new(),
            context: IndexMap::new(),
        }
    }

    fn suggest(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = suggestion.into();
        self
    }

    fn context(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.context.insert(key.into(), value.into());
        self
    }

    /// Fold into the diagnostics stream.
    pub fn into_diagnostic(self) -> Diagnostic {
        let mut d = Diagnostic::error(self.code, self.message).with_suggestion(self.suggestion);
        d.context = self.context;
        d
    }
}

const LIST_KEYS: &[&str] = &["sortable", "formatter", "formatters", "class", "style"];
const FORM_LEVEL_KEYS: &[&str] = &["label", "help_text", "default", "formatters"];
const FORM_FORMATTER_TYPES: &[&str] = &["tel", "file"];
const SHARED_RULE_NAMES: &[&str] = &[
    "required",
    "min",
    "max",
    "step",
    "maxlength",
    "minlength",
    "pattern",
];

/// Validate one field definition against the catalog.
///
/// Returns the first violation; pushes non-fatal findings onto
/// `warnings`. The definition itself is never modified.
pub fn validate_field_definition(
    def: &FieldDefinition,
    field: &str,
    page: &str,
    entity: &str,
    scope: Scope,
    catalog: &SchemaCatalog,
    warnings: &mut Vec<Diagnostic>,
) -> Result<(), FieldConfigError> {
    check(def, field, scope, catalog, warnings).map_err(|e| {
        e.context("field", field)
            .context("page", page)
            .context("entity", entity)
    })
}

fn check(
    def: &FieldDefinition,
    field: &str,
    scope: Scope,
    catalog: &SchemaCatalog,
    warnings: &mut Vec<Diagnostic>,
) -> Result<(), FieldConfigError> {
    if !def.is_mapping() {
        return Err(FieldConfigError::new(
            "field.not_mapping",
            format!(
                "definition of '{field}' must be a mapping, got {}",
                type_name(def.raw())
            ),
        )
        .suggest("author the field definition as a mapping of sections"));
    }

    if scope.covers_list() {
        check_list_section(def, field, warnings)?;
    }

    if scope.covers_form() {
        let form_type = check_form_section(def, field, catalog)?;
        check_attributes(def, field, &form_type, catalog)?;
        check_validators(def, field, catalog)?;
        check_duplicate_rules(def, field, &form_type)?;
    }

    Ok(())
}

fn check_list_section(
    def: &FieldDefinition,
    field: &str,
    warnings: &mut Vec<Diagnostic>,
) -> Result<(), FieldConfigError> {
    let Some(list) = def.list() else {
        return Ok(());
    };
    let Some(list) = list.as_object() else {
        return Err(FieldConfigError::new(
            "field.list.not_mapping",
            format!("list section of '{field}' must be a mapping, got {}", type_name(list)),
        ));
    };

    for key in list.keys() {
        if !LIST_KEYS.contains(&key.as_str()) {
            return Err(FieldConfigError::new(
                "field.list.unknown_key",
                format!("list section of '{field}' has unknown key '{key}'"),
            )
            .suggest(format!("allowed list keys: {}", LIST_KEYS.join(", ")))
            .context("key", key.as_str()));
        }
    }

    if let Some(sortable) = list.get("sortable") {
        if !sortable.is_boolean() {
            return Err(FieldConfigError::new(
                "field.list.invalid_sortable",
                format!(
                    "list.sortable of '{field}' must be a boolean, got {}",
                    type_name(sortable)
                ),
            ));
        }
    }

    if list.contains_key("formatter") && list.contains_key("formatters") {
        warnings.push(
            Diagnostic::warning(
                "field.list.ambiguous_formatters",
                format!(
                    "list section of '{field}' sets both 'formatter' and 'formatters'; \
                     the plural form wins"
                ),
            )
            .with_suggestion("keep either 'formatter' or 'formatters', not both")
            .with_context("field", field),
        );
    }

    Ok(())
}

/// Check the form section and return the declared type.
fn check_form_section(
    def: &FieldDefinition,
    field: &str,
    catalog: &SchemaCatalog,
) -> Result<String, FieldConfigError> {
    let Some(form) = def.form() else {
        return Err(FieldConfigError::new(
            "field.form.missing",
            format!("definition of '{field}' has no form section"),
        )
        .suggest("add a form section declaring at least the input type"));
    };
    let Some(form) = form.as_object() else {
        return Err(FieldConfigError::new(
            "field.form.not_mapping",
            format!("form section of '{field}' must be a mapping, got {}", type_name(form)),
        ));
    };

    let form_type = match form.get("type").and_then(Value::as_str) {
        Some(t) => t.to_string(),
        None => {
            return Err(FieldConfigError::new(
                "field.form.missing_type",
                format!("form section of '{field}' declares no type"),
            )
            .suggest(format!(
                "declare one of: {}",
                catalog.field_types().collect::<Vec<_>>().join(", ")
            )));
        }
    };

    if form_type == GLOBAL_TYPE || !catalog.is_field_type(&form_type) {
        return Err(FieldConfigError::new(
            "field.form.unknown_type",
            format!("'{field}' declares unknown form type '{form_type}'"),
        )
        .suggest(format!(
            "declare one of: {}",
            catalog.field_types().collect::<Vec<_>>().join(", ")
        ))
        .context("type", form_type.as_str()));
    }

    for key in form.keys() {
        if key == "type" || key == "attributes" {
            continue;
        }
        if FORM_LEVEL_KEYS.contains(&key.as_str()) {
            if key == "formatters" && !FORM_FORMATTER_TYPES.contains(&form_type.as_str()) {
                return Err(FieldConfigError::new(
                    "field.form.formatters_not_allowed",
                    format!("form.formatters on '{field}' is not valid for type '{form_type}'"),
                )
                .suggest(format!(
                    "form-level formatters are only valid for types: {}",
                    FORM_FORMATTER_TYPES.join(", ")
                ))
                .context("type", form_type.as_str()));
            }
            continue;
        }
        if catalog.attribute_constraint(&form_type, key).is_some() {
            return Err(FieldConfigError::new(
                "field.form.misplaced_attribute",
                format!(
                    "'{key}' on '{field}' is an attribute of type '{form_type}' and does \
                     not belong directly under form"
                ),
            )
            .suggest(format!("move '{key}' into form.attributes"))
            .context("key", key.as_str()));
        }
        return Err(FieldConfigError::new(
            "field.form.unknown_key",
            format!("form section of '{field}' has unknown key '{key}'"),
        )
        .suggest(format!(
            "allowed form keys: type, attributes, {}",
            FORM_LEVEL_KEYS.join(", ")
        ))
        .context("key", key.as_str()));
    }

    Ok(form_type)
}

fn check_attributes(
    def: &FieldDefinition,
    field: &str,
    form_type: &str,
    catalog: &SchemaCatalog,
) -> Result<(), FieldConfigError> {
    let Some(form) = def.form().and_then(Value::as_object) else {
        return Ok(());
    };
    let Some(attributes) = form.get("attributes") else {
        return Ok(());
    };
    let Some(attributes) = attributes.as_object() else {
        return Err(FieldConfigError::new(
            "field.form.invalid_attributes",
            format!(
                "form.attributes of '{field}' must be a mapping, got {}",
                type_name(attributes)
            ),
        ));
    };

    for (name, value) in attributes {
        match catalog.attribute_constraint(form_type, name) {
            None => {
                return Err(FieldConfigError::new(
                    "field.attributes.unknown",
                    format!(
                        "attribute '{name}' on '{field}' is not declared for type \
                         '{form_type}' or globally"
                    ),
                )
                .suggest(format!("remove '{name}' or declare it in the schema catalog"))
                .context("attribute", name.as_str()));
            }
            Some(Constraint::Disallowed) => {
                return Err(FieldConfigError::new(
                    "field.attributes.disallowed",
                    format!(
                        "attribute '{name}' is explicitly disallowed for type '{form_type}'"
                    ),
                )
                .suggest(format!("remove '{name}' from form.attributes of '{field}'"))
                .context("attribute", name.as_str()));
            }
            Some(constraint) => {
                if let Err(why) = constraint.accepts(value) {
                    return Err(FieldConfigError::new(
                        "field.attributes.invalid_value",
                        format!("form.attributes.{name} on '{field}': {why}"),
                    )
                    .context("attribute", name.as_str())
                    .context("supplied", value.clone()));
                }
            }
        }
    }

    Ok(())
}

fn check_validators(
    def: &FieldDefinition,
    field: &str,
    catalog: &SchemaCatalog,
) -> Result<(), FieldConfigError> {
    let Some(validators) = def.validators() else {
        return Ok(());
    };
    let Some(validators) = validators.as_object() else {
        return Err(FieldConfigError::new(
            "field.validators.not_mapping",
            format!(
                "validators section of '{field}' must be a mapping, got {}",
                type_name(validators)
            ),
        ));
    };

    for (rule_type, rules) in validators {
        if !catalog.is_field_type(rule_type) {
            return Err(FieldConfigError::new(
                "field.validators.unknown_type",
                format!("validators section of '{field}' references unknown type '{rule_type}'"),
            )
            .context("type", rule_type.as_str()));
        }
        let Some(rules) = rules.as_object() else {
            return Err(FieldConfigError::new(
                "field.validators.invalid_rules",
                format!(
                    "validators.{rule_type} of '{field}' must be a mapping, got {}",
                    type_name(rules)
                ),
            ));
        };

        for (rule, value) in rules {
            // Keys carrying messages ride along with their rule.
            if rule.contains("message") {
                continue;
            }
            match catalog.validation_rule(rule_type, rule) {
                None => {
                    return Err(FieldConfigError::new(
                        "field.validators.unknown_rule",
                        format!(
                            "validators.{rule_type}.{rule} on '{field}' is not a known rule"
                        ),
                    )
                    .suggest(format!(
                        "known rules for {rule_type}: {}",
                        known_rules(catalog, rule_type)
                    ))
                    .context("rule", rule.as_str()));
                }
                Some(constraint) => {
                    if let Err(why) = constraint.accepts(value) {
                        return Err(FieldConfigError::new(
                            "field.validators.invalid_value",
                            format!("validators.{rule_type}.{rule} on '{field}': {why}"),
                        )
                        .context("rule", rule.as_str())
                        .context("supplied", value.clone()));
                    }
                }
            }
        }
    }

    Ok(())
}

fn known_rules(catalog: &SchemaCatalog, rule_type: &str) -> String {
    catalog
        .field_type(rule_type)
        .map(|schema| {
            schema
                .default_validation_rules
                .keys()
                .cloned()
                .collect::<Vec<_>>()
                .join(", ")
        })
        .unwrap_or_default()
}

/// A validation-relevant name set in both `form.attributes` and the
/// declared type's validator rules is one rule authored twice.
fn check_duplicate_rules(
    def: &FieldDefinition,
    field: &str,
    form_type: &str,
) -> Result<(), FieldConfigError> {
    let attributes = match def.form_attributes() {
        Some(a) => a,
        None => return Ok(()),
    };
    let rules = match rules_for_type(def, form_type) {
        Some(r) => r,
        None => return Ok(()),
    };

    for name in SHARED_RULE_NAMES {
        if attributes.contains_key(*name) && rules.contains_key(*name) {
            return Err(FieldConfigError::new(
                "field.validators.duplicate_rule",
                format!(
                    "'{name}' on '{field}' is set both as a form attribute and as a \
                     validators.{form_type} rule"
                ),
            )
            .suggest(format!(
                "declare '{name}' either under form.attributes or under \
                 validators.{form_type}, not both"
            ))
            .context("rule", *name));
        }
    }

    Ok(())
}

fn rules_for_type<'a>(def: &'a FieldDefinition, form_type: &str) -> Option<&'a Map<String, Value>> {
    def.validators()?.as_object()?.get(form_type)?.as_object()
}
