//! One-call page build: fetch, normalize, validate.

use tracing::debug;

use viewforge_fields::{ConfigSource, EntityMetadata};
use viewforge_schema::SchemaCatalog;

use crate::error::{RenderConfigError, Result};
use crate::normalizer::normalize;
use crate::types::RenderConfig;
use crate::validator::{ValidationReport, Validator};

/// A built page: the canonical configuration plus everything found on
/// the way there (normalizer warnings first, validator diagnostics
/// after, in discovery order).
#[derive(Debug)]
pub struct PageBuild {
    pub config: RenderConfig,
    pub report: ValidationReport,
}

/// Wires a config source, a schema catalog, and entity metadata into the
/// three-stage pipeline. The pipeline itself is stateless; every
/// [`build_page`](Self::build_page) call runs with fresh caches.
pub struct RenderPipeline<'a> {
    source: &'a dyn ConfigSource,
    catalog: &'a SchemaCatalog,
    entities: &'a dyn EntityMetadata,
}

impl<'a> RenderPipeline<'a> {
    pub fn new(
        source: &'a dyn ConfigSource,
        catalog: &'a SchemaCatalog,
        entities: &'a dyn EntityMetadata,
    ) -> Self {
        Self {
            source,
            catalog,
            entities,
        }
    }

    /// Lookup key for a page configuration tree.
    pub fn page_config_key(feature: &str, name: &str, action: &str) -> String {
        format!("{feature}:{name}_view_{action}")
    }

    /// Build one page: fetch the raw tree, normalize it, validate it.
    ///
    /// A missing page tree is the only hard failure here; everything
    /// else degrades to diagnostics in the returned report.
    pub fn build_page(
        &self,
        feature: &str,
        name: &str,
        action: &str,
        entity: &str,
    ) -> Result<PageBuild> {
        let key = Self::page_config_key(feature, name, action);
        let raw = self
            .source
            .get(&key)
            .ok_or_else(|| RenderConfigError::PageConfigNotFound { key: key.clone() })?;

        let (config, warnings) = normalize(&raw);

        let page = format!("{name}_{action}");
        let mut validator = Validator::new(self.catalog, self.entities, self.source);
        let mut report = validator.validate(&config, &page, entity, &key);

        let mut diagnostics = warnings;
        diagnostics.extend(report.diagnostics);
        report.diagnostics = diagnostics;

        debug!(
            key = %key,
            valid = report.is_valid(),
            diagnostics = report.diagnostics.len(),
            "page build complete"
        );
        Ok(PageBuild { config, report })
    }
}
