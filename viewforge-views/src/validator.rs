//! Page-level validation.
//!
//! Consumes a normalized [`RenderConfig`] and cross-references three
//! sources of truth: the schema catalog, the entity metadata, and the
//! configuration itself. Everything found becomes an ordered diagnostic;
//! the run always completes except for one precondition: an
//! unresolvable target entity, without which no downstream check means
//! anything.
//!
//! A validator instance is scoped to one run: it owns the field resolver
//! and a per-field cache so a field referenced from five layout sections
//! is resolved and schema-checked once.

use std::collections::HashSet;

use serde::Serialize;
use serde_json::Value;
use tracing::{debug, error, warn};

use viewforge_common::{tree::type_name, Diagnostic};
use viewforge_fields::{ConfigSource, EntityMetadata, FieldResolver};
use viewforge_schema::SchemaCatalog;

use crate::error::RenderConfigError;
use crate::field_schema::{validate_field_definition, Scope};
use crate::options::{is_known_option, ATTRIBUTES_OPTION, BOOL_OPTIONS, ENUM_OPTIONS, STRING_OPTIONS};
use crate::types::RenderConfig;

/// What a caller does with a failed validation.
///
/// This is an explicit knob, not an inference: under `Advisory` the
/// report is always returned and callers read `is_valid` themselves;
/// under `Enforcing` any error-severity diagnostic rejects the build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ValidationPolicy {
    #[default]
    Advisory,
    Enforcing,
}

/// The outcome of one validation run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ValidationReport {
    /// Identifier of the validated configuration (its lookup key).
    pub source_id: String,
    /// Every diagnostic found, in discovery order.
    pub diagnostics: Vec<Diagnostic>,
}

impl ValidationReport {
    /// Whether the run found no error-severity diagnostics.
    pub fn is_valid(&self) -> bool {
        !self.diagnostics.iter().any(Diagnostic::is_error)
    }

    /// Error-severity diagnostics.
    pub fn errors(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter().filter(|d| d.is_error())
    }

    /// Warning-severity diagnostics.
    pub fn warnings(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter().filter(|d| !d.is_error())
    }

    /// Apply the blocking policy.
    pub fn into_result(self, policy: ValidationPolicy) -> Result<Self, RenderConfigError> {
        let error_count = self.errors().count();
        if policy == ValidationPolicy::Enforcing && error_count > 0 {
            return Err(RenderConfigError::Rejected {
                source_id: self.source_id.clone(),
                error_count,
                report: self,
            });
        }
        Ok(self)
    }
}

/// One run's validator. Create fresh per request; the caches are private
/// to the run and die with it.
pub struct Validator<'a> {
    catalog: &'a SchemaCatalog,
    entities: &'a dyn EntityMetadata,
    resolver: FieldResolver<'a>,
    checked_fields: HashSet<(String, String, String)>,
}

impl<'a> Validator<'a> {
    pub fn new(
        catalog: &'a SchemaCatalog,
        entities: &'a dyn EntityMetadata,
        source: &'a dyn ConfigSource,
    ) -> Self {
        Self {
            catalog,
            entities,
            resolver: FieldResolver::new(source),
            checked_fields: HashSet::new(),
        }
    }

    /// Validate one normalized page configuration. Never mutates it.
    pub fn validate(
        &mut self,
        config: &RenderConfig,
        page: &str,
        entity: &str,
        source_id: &str,
    ) -> ValidationReport {
        let mut diagnostics = Vec::new();

        self.check_top_level_keys(config, &mut diagnostics);

        // The one short-circuit: nothing below is meaningful without a
        // resolvable entity.
        if !self.entities.has_entity(entity) {
            diagnostics.push(
                Diagnostic::error(
                    "entity.unresolved",
                    format!("target entity '{entity}' cannot be resolved"),
                )
                .with_suggestion("register the entity or fix the page's entity reference")
                .with_context("entity", entity)
                .with_context("source", source_id),
            );
            return self.finish(source_id, diagnostics);
        }

        self.check_render_options(config, &mut diagnostics);
        self.check_layout_structure(config, &mut diagnostics);
        self.check_field_references(config, page, entity, &mut diagnostics);

        debug!(
            source = source_id,
            diagnostics = diagnostics.len(),
            "validation run complete"
        );
        self.finish(source_id, diagnostics)
    }

    fn finish(&self, source_id: &str, diagnostics: Vec<Diagnostic>) -> ValidationReport {
        for d in &diagnostics {
            if d.is_error() {
                error!(code = %d.code, suggestion = %d.suggestion, "{}", d.message);
            } else {
                warn!(code = %d.code, "{}", d.message);
            }
        }
        ValidationReport {
            source_id: source_id.to_string(),
            diagnostics,
        }
    }

    fn check_top_level_keys(&self, config: &RenderConfig, diagnostics: &mut Vec<Diagnostic>) {
        for key in config.unrecognized.keys() {
            diagnostics.push(
                Diagnostic::error(
                    "config.unknown_key",
                    format!("unknown top-level key '{key}'"),
                )
                .with_suggestion(
                    "allowed sections: render_options, form_layout, form_hidden_fields, \
                     form_extra_fields",
                )
                .with_context("key", key.as_str()),
            );
        }
    }

    fn check_render_options(&self, config: &RenderConfig, diagnostics: &mut Vec<Diagnostic>) {
        for key in config.render_options.keys() {
            if !is_known_option(key) {
                diagnostics.push(
                    Diagnostic::error(
                        "render_options.unknown_key",
                        format!("unknown render option '{key}'"),
                    )
                    .with_suggestion(format!("remove '{key}' from render_options"))
                    .with_context("option", key.as_str()),
                );
            }
        }

        // Shape re-checks. Normalization guarantees these; a config built
        // some other way does not get a free pass.
        for &(key, _) in BOOL_OPTIONS {
            match config.render_options.get(key) {
                Some(value) if value.is_boolean() => {}
                Some(value) => diagnostics.push(type_mismatch(key, value, "boolean")),
                None => diagnostics.push(missing_option(key)),
            }
        }
        for &(key, _) in STRING_OPTIONS {
            match config.render_options.get(key) {
                Some(value) if value.is_string() => {}
                Some(value) => diagnostics.push(type_mismatch(key, value, "string")),
                None => diagnostics.push(missing_option(key)),
            }
        }
        match config.render_options.get(ATTRIBUTES_OPTION) {
            Some(value) if value.is_object() => {}
            Some(value) => diagnostics.push(type_mismatch(ATTRIBUTES_OPTION, value, "mapping")),
            None => diagnostics.push(missing_option(ATTRIBUTES_OPTION)),
        }

        for &(key, allowed) in ENUM_OPTIONS {
            let Some(value) = config.render_options.get(key).and_then(Value::as_str) else {
                continue;
            };
            if !allowed.contains(&value) {
                diagnostics.push(
                    Diagnostic::error(
                        format!("render_options.invalid_{key}"),
                        format!("render_options.{key} has invalid value '{value}'"),
                    )
                    .with_suggestion(format!("use one of: {}", allowed.join(", ")))
                    .with_context("option", key)
                    .with_context("supplied", value),
                );
            }
        }
    }

    fn check_layout_structure(&self, config: &RenderConfig, diagnostics: &mut Vec<Diagnostic>) {
        if config.form_layout.is_empty() {
            diagnostics.push(
                Diagnostic::error("form_layout.empty", "form_layout has no sections")
                    .with_suggestion("add at least one section with a non-empty fields list"),
            );
            return;
        }

        let any_populated = config
            .form_layout
            .iter()
            .any(|section| !section.fields.is_empty());
        if !any_populated {
            diagnostics.push(
                Diagnostic::error(
                    "form_layout.no_populated_section",
                    "every form_layout section has an empty fields list",
                )
                .with_suggestion("list at least one field in one section"),
            );
        }
    }

    fn check_field_references(
        &mut self,
        config: &RenderConfig,
        page: &str,
        entity: &str,
        diagnostics: &mut Vec<Diagnostic>,
    ) {
        for (index, section) in config.form_layout.iter().enumerate() {
            for (position, value) in section.fields.iter().enumerate() {
                let Some(name) = value.as_str() else {
                    diagnostics.push(
                        Diagnostic::error(
                            "fields.non_string_reference",
                            format!(
                                "form_layout[{index}].fields[{position}] must be a field \
                                 name, got {}",
                                type_name(value)
                            ),
                        )
                        .with_context("section", index)
                        .with_context("position", position)
                        .with_context("supplied", value.clone()),
                    );
                    continue;
                };
                if !self.check_entity_field(name, entity, diagnostics) {
                    continue;
                }
                // Layout-referenced fields also need a definition that
                // passes schema validation.
                self.check_field_definition(name, page, entity, diagnostics);
            }
        }

        for name in config
            .form_hidden_fields
            .iter()
            .chain(config.form_extra_fields.iter())
        {
            self.check_entity_field(name, entity, diagnostics);
        }
    }

    /// Existence check against the entity. Returns whether it passed.
    fn check_entity_field(
        &self,
        name: &str,
        entity: &str,
        diagnostics: &mut Vec<Diagnostic>,
    ) -> bool {
        if self.entities.has_field(entity, name) {
            return true;
        }
        diagnostics.push(
            Diagnostic::error(
                "fields.unknown_entity_field",
                format!("field '{name}' does not exist on entity '{entity}'"),
            )
            .with_suggestion(format!(
                "remove '{name}' or add it to the '{entity}' entity"
            ))
            .with_context("field", name)
            .with_context("entity", entity),
        );
        false
    }

    /// Resolve and schema-check one layout field, once per run.
    fn check_field_definition(
        &mut self,
        name: &str,
        page: &str,
        entity: &str,
        diagnostics: &mut Vec<Diagnostic>,
    ) {
        let key = (entity.to_string(), page.to_string(), name.to_string());
        if self.checked_fields.contains(&key) {
            return;
        }

        let mut produced = Vec::new();
        match self.resolver.resolve(name, page, entity) {
            None => produced.push(
                Diagnostic::error(
                    "field.definition_not_found",
                    format!("no definition found for field '{name}'"),
                )
                .with_suggestion(format!(
                    "define '{name}' in the page, entity, or base field configuration"
                ))
                .with_context("field", name)
                .with_context("page", page)
                .with_context("entity", entity),
            ),
            Some(def) => {
                if let Err(e) = validate_field_definition(
                    def,
                    name,
                    page,
                    entity,
                    Scope::Full,
                    self.catalog,
                    &mut produced,
                ) {
                    produced.push(e.into_diagnostic());
                }
            }
        }

        self.checked_fields.insert(key);
        diagnostics.append(&mut produced);
    }
}

fn type_mismatch(key: &str, value: &Value, expected: &str) -> Diagnostic {
    Diagnostic::error(
        "render_options.type_mismatch",
        format!(
            "render_options.{key} must be a {expected}, got {}",
            type_name(value)
        ),
    )
    .with_context("option", key)
    .with_context("supplied", value.clone())
}

fn missing_option(key: &str) -> Diagnostic {
    Diagnostic::error(
        "render_options.missing_option",
        format!("render_options.{key} is missing"),
    )
    .with_context("option", key)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalizer::normalize;
    use serde_json::json;
    use viewforge_fields::{MemorySource, StaticEntityMetadata};

    fn entities() -> StaticEntityMetadata {
        StaticEntityMetadata::new().entity(
            "post",
            ["title", "body", "status", "id", "created_at", "attachment"],
        )
    }

    fn source() -> MemorySource {
        MemorySource::new()
            .insert(
                "post",
                json!({
                    "post_fields_edit": {
                        "title": {"form": {"type": "text", "attributes": {"maxlength": 120}}},
                        "status": {"form": {"type": "select"}},
                        "attachment": {"form": {
                            "type": "file",
                            "attributes": {"accept": ["image/jpeg", "application/pdf"]},
                        }},
                    },
                }),
            )
            .insert(
                "base_fields",
                json!({
                    "body": {"form": {"type": "textarea"}},
                    "created_at": {"form": {"type": "date"}},
                }),
            )
    }

    fn run(raw: serde_json::Value) -> ValidationReport {
        let catalog = SchemaCatalog::builtin();
        let ents = entities();
        let src = source();
        let (config, _) = normalize(&raw);
        let mut validator = Validator::new(&catalog, &ents, &src);
        validator.validate(&config, "post_edit", "post", "post:post_view_edit")
    }

    #[test]
    fn valid_configuration_passes() {
        let report = run(json!({
            "render_options": {"security_level": "high", "ajax_save": true},
            "form_layout": [
                {"title": "Content", "fields": ["title", "body"]},
                {"title": "Meta", "fields": ["status"], "divider": true},
            ],
            "form_hidden_fields": ["id"],
            "form_extra_fields": ["created_at"],
        }));
        assert!(report.is_valid(), "{:?}", report.diagnostics);
    }

    #[test]
    fn unknown_top_level_key_is_flagged() {
        let report = run(json!({
            "form_layout": [{"fields": ["title"]}],
            "form_tabs": [],
        }));
        let codes: Vec<_> = report.errors().map(|d| d.code.as_str()).collect();
        assert!(codes.contains(&"config.unknown_key"));
    }

    #[test]
    fn unresolvable_entity_short_circuits() {
        let catalog = SchemaCatalog::builtin();
        let ents = entities();
        let src = source();
        let (config, _) = normalize(&json!({
            "render_options": {"security_level": "ultra"},
            "form_layout": [],
        }));
        let mut validator = Validator::new(&catalog, &ents, &src);
        let report = validator.validate(&config, "ghost_edit", "ghost", "ghost:ghost_view_edit");

        assert!(!report.is_valid());
        // Halted before the option and layout checks could run.
        assert_eq!(report.diagnostics.len(), 1);
        assert_eq!(report.diagnostics[0].code, "entity.unresolved");
    }

    #[test]
    fn invalid_security_level_yields_exactly_one_diagnostic() {
        let report = run(json!({
            "render_options": {"security_level": "ultra"},
            "form_layout": [{"fields": ["title"]}],
        }));
        let matching: Vec<_> = report
            .diagnostics
            .iter()
            .filter(|d| d.code == "render_options.invalid_security_level")
            .collect();
        assert_eq!(matching.len(), 1);
        assert_eq!(report.diagnostics.len(), 1);
    }

    #[test]
    fn every_enum_option_is_checked() {
        let report = run(json!({
            "render_options": {
                "layout_type": "grid",
                "error_display": "popup",
                "title_heading_level": "h7",
                "submit_button_variant": "sparkly",
            },
            "form_layout": [{"fields": ["title"]}],
        }));
        let codes: Vec<_> = report.errors().map(|d| d.code.as_str()).collect();
        assert!(codes.contains(&"render_options.invalid_layout_type"));
        assert!(codes.contains(&"render_options.invalid_error_display"));
        assert!(codes.contains(&"render_options.invalid_title_heading_level"));
        assert!(codes.contains(&"render_options.invalid_submit_button_variant"));
    }

    #[test]
    fn unknown_render_option_is_flagged() {
        let report = run(json!({
            "render_options": {"theme_color": "teal"},
            "form_layout": [{"fields": ["title"]}],
        }));
        let codes: Vec<_> = report.errors().map(|d| d.code.as_str()).collect();
        assert_eq!(codes, vec!["render_options.unknown_key"]);
    }

    #[test]
    fn hand_built_config_fails_shape_rechecks() {
        // Defense in depth: a config that skipped normalization.
        let catalog = SchemaCatalog::builtin();
        let ents = entities();
        let src = source();
        let mut config = RenderConfig::default();
        config
            .render_options
            .insert("ajax_save".to_string(), json!("yes"));
        config.form_layout.push(crate::types::LayoutSection {
            fields: vec![json!("title")],
            ..Default::default()
        });
        let mut validator = Validator::new(&catalog, &ents, &src);
        let report = validator.validate(&config, "post_edit", "post", "post:post_view_edit");
        let codes: Vec<_> = report.errors().map(|d| d.code.as_str()).collect();
        assert!(codes.contains(&"render_options.type_mismatch"));
        assert!(codes.contains(&"render_options.missing_option"));
    }

    #[test]
    fn empty_layout_is_an_error() {
        let report = run(json!({"form_layout": []}));
        let codes: Vec<_> = report.errors().map(|d| d.code.as_str()).collect();
        assert_eq!(codes, vec!["form_layout.empty"]);
    }

    #[test]
    fn layout_with_only_empty_sections_is_an_error() {
        let report = run(json!({"form_layout": [{"title": "A", "fields": []}]}));
        let codes: Vec<_> = report.errors().map(|d| d.code.as_str()).collect();
        assert_eq!(codes, vec!["form_layout.no_populated_section"]);
    }

    #[test]
    fn one_populated_section_satisfies_the_layout_check() {
        let report = run(json!({"form_layout": [
            {"title": "Empty", "fields": []},
            {"fields": ["title"]},
        ]}));
        assert!(report.is_valid(), "{:?}", report.diagnostics);
    }

    #[test]
    fn non_string_field_reference_is_flagged_by_position() {
        let report = run(json!({"form_layout": [{"fields": ["title", 7]}]}));
        let d = report
            .diagnostics
            .iter()
            .find(|d| d.code == "fields.non_string_reference")
            .unwrap();
        assert_eq!(d.context["section"], json!(0));
        assert_eq!(d.context["position"], json!(1));
    }

    #[test]
    fn ghost_field_is_flagged_once_with_its_name() {
        let report = run(json!({"form_layout": [{"fields": ["title", "ghost_field"]}]}));
        let codes: Vec<_> = report.errors().map(|d| d.code.as_str()).collect();
        assert_eq!(codes, vec!["fields.unknown_entity_field"]);
        assert_eq!(
            report.diagnostics[0].context["field"],
            json!("ghost_field")
        );
    }

    #[test]
    fn hidden_and_extra_fields_are_existence_checked() {
        let report = run(json!({
            "form_layout": [{"fields": ["title"]}],
            "form_hidden_fields": ["id", "phantom"],
            "form_extra_fields": ["wraith"],
        }));
        let names: Vec<_> = report
            .errors()
            .filter(|d| d.code == "fields.unknown_entity_field")
            .map(|d| d.context["field"].clone())
            .collect();
        assert_eq!(names, vec![json!("phantom"), json!("wraith")]);
    }

    #[test]
    fn entity_field_without_definition_is_flagged() {
        // `status` resolves page-scoped; `body` from base; a field that
        // exists on the entity but nowhere in config does not.
        let ents = StaticEntityMetadata::new().entity("post", ["title", "unconfigured"]);
        let catalog = SchemaCatalog::builtin();
        let src = source();
        let (config, _) = normalize(&json!({
            "form_layout": [{"fields": ["unconfigured"]}],
        }));
        let mut validator = Validator::new(&catalog, &ents, &src);
        let report = validator.validate(&config, "post_edit", "post", "post:post_view_edit");
        let codes: Vec<_> = report.errors().map(|d| d.code.as_str()).collect();
        assert_eq!(codes, vec!["field.definition_not_found"]);
    }

    #[test]
    fn broken_field_definition_folds_into_the_report() {
        let src = MemorySource::new().insert(
            "post",
            json!({
                "post_fields_edit": {
                    "title": {"form": {"type": "text", "placeholder": "misplaced"}},
                },
            }),
        );
        let catalog = SchemaCatalog::builtin();
        let ents = entities();
        let (config, _) = normalize(&json!({"form_layout": [{"fields": ["title"]}]}));
        let mut validator = Validator::new(&catalog, &ents, &src);
        let report = validator.validate(&config, "post_edit", "post", "post:post_view_edit");
        let codes: Vec<_> = report.errors().map(|d| d.code.as_str()).collect();
        assert_eq!(codes, vec!["field.form.misplaced_attribute"]);
    }

    #[test]
    fn repeated_references_are_validated_once() {
        let src = MemorySource::new().insert(
            "post",
            json!({
                "post_fields_edit": {
                    "title": {"form": {"type": "text", "placeholder": "misplaced"}},
                },
            }),
        );
        let catalog = SchemaCatalog::builtin();
        let ents = entities();
        let (config, _) = normalize(&json!({"form_layout": [
            {"title": "A", "fields": ["title"]},
            {"title": "B", "fields": ["title"]},
            {"title": "C", "fields": ["title"]},
        ]}));
        let mut validator = Validator::new(&catalog, &ents, &src);
        let report = validator.validate(&config, "post_edit", "post", "post:post_view_edit");
        // One schema diagnostic despite three references.
        let schema_errors = report
            .errors()
            .filter(|d| d.code == "field.form.misplaced_attribute")
            .count();
        assert_eq!(schema_errors, 1);
    }

    #[test]
    fn field_warnings_surface_in_the_report() {
        let src = MemorySource::new().insert(
            "post",
            json!({
                "post_fields_edit": {
                    "title": {
                        "list": {"formatter": "trim", "formatters": {"trim": {}}},
                        "form": {"type": "text"},
                    },
                },
            }),
        );
        let catalog = SchemaCatalog::builtin();
        let ents = entities();
        let (config, _) = normalize(&json!({"form_layout": [{"fields": ["title"]}]}));
        let mut validator = Validator::new(&catalog, &ents, &src);
        let report = validator.validate(&config, "post_edit", "post", "post:post_view_edit");
        assert!(report.is_valid());
        let codes: Vec<_> = report.warnings().map(|d| d.code.as_str()).collect();
        assert_eq!(codes, vec!["field.list.ambiguous_formatters"]);
    }

    #[test]
    fn advisory_policy_always_returns_the_report() {
        let report = run(json!({"form_layout": []}));
        assert!(!report.is_valid());
        let report = report.into_result(ValidationPolicy::Advisory).unwrap();
        assert!(!report.is_valid());
    }

    #[test]
    fn enforcing_policy_rejects_errors() {
        let report = run(json!({"form_layout": []}));
        let err = report.into_result(ValidationPolicy::Enforcing).unwrap_err();
        match err {
            RenderConfigError::Rejected {
                error_count,
                ref source_id,
                ..
            } => {
                assert_eq!(error_count, 1);
                assert_eq!(source_id, "post:post_view_edit");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn enforcing_policy_passes_clean_reports() {
        let report = run(json!({"form_layout": [{"fields": ["title"]}]}));
        assert!(report
            .into_result(ValidationPolicy::Enforcing)
            .is_ok());
    }
}
