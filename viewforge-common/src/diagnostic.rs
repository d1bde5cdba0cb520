//! Structured diagnostics for configuration problems.
//!
//! A [`Diagnostic`] names the exact offending path, carries a stable
//! grep-able code for tooling, and suggests a concrete fix. Diagnostics
//! are collected into ordered lists; they are data, not control flow.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// How serious a diagnostic is.
///
/// Warnings come from corrective normalization (the tree was repaired and
/// the run continues); errors come from validation (the configuration is
/// wrong and the author has to act).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Warning,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Warning => write!(f, "warning"),
            Severity::Error => write!(f, "error"),
        }
    }
}

/// A single configuration problem.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Diagnostic {
    /// Warning (repaired) or error (must be fixed).
    pub severity: Severity,
    /// Stable dotted code, e.g. `render_options.invalid_security_level`.
    pub code: String,
    /// Human message naming the offending path or index.
    pub message: String,
    /// Concrete remediation, e.g. "move 'placeholder' into form.attributes".
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub suggestion: String,
    /// Structured context (field name, section index, rejected value, ...).
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub context: IndexMap<String, serde_json::Value>,
}

impl Diagnostic {
    /// Create a warning-severity diagnostic.
    pub fn warning(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(Severity::Warning, code, message)
    }

    /// Create an error-severity diagnostic.
    pub fn error(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(Severity::Error, code, message)
    }

    fn new(severity: Severity, code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            severity,
            code: code.into(),
            message: message.into(),
            suggestion: String::new(),
            context: IndexMap::new(),
        }
    }

    /// Attach a remediation suggestion.
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = suggestion.into();
        self
    }

    /// Attach one structured context entry. Insertion order is preserved.
    pub fn with_context(
        mut self,
        key: impl Into<String>,
        value: impl Into<serde_json::Value>,
    ) -> Self {
        self.context.insert(key.into(), value.into());
        self
    }

    /// Whether this diagnostic is an error.
    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}]: {}", self.severity, self.code, self.message)
    }
}
