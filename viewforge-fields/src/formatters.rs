//! Named output formatters.
//!
//! Field configuration refers to formatters by string key only; the
//! executable transform lives here, never inside the data tree. Each
//! formatter is a pure function from a raw value to display text.

use chrono::DateTime;
use indexmap::IndexMap;
use serde_json::Value;

/// A pure value→text transform.
pub type Formatter = Box<dyn Fn(&Value) -> String + Send + Sync>;

const TRUNCATE_LEN: usize = 80;

/// Registry of formatters looked up by the names field configuration uses.
pub struct FormatterRegistry {
    formatters: IndexMap<String, Formatter>,
}

impl FormatterRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self {
            formatters: IndexMap::new(),
        }
    }

    /// The registry with the built-in formatters.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register("uppercase", |v| display_text(v).to_uppercase());
        registry.register("lowercase", |v| display_text(v).to_lowercase());
        registry.register("trim", |v| display_text(v).trim().to_string());
        registry.register("truncate", |v| {
            let text = display_text(v);
            match text.char_indices().nth(TRUNCATE_LEN) {
                Some((cut, _)) => format!("{}…", &text[..cut]),
                None => text,
            }
        });
        registry.register("date", |v| match v.as_str() {
            Some(s) => DateTime::parse_from_rfc3339(s)
                .map(|dt| dt.format("%Y-%m-%d").to_string())
                .unwrap_or_else(|_| s.to_string()),
            None => display_text(v),
        });
        registry.register("filesize", |v| match v.as_u64() {
            Some(bytes) => human_size(bytes),
            None => display_text(v),
        });
        registry
    }

    /// Register (or replace) a formatter under `name`.
    pub fn register(&mut self, name: impl Into<String>, f: impl Fn(&Value) -> String + Send + Sync + 'static) {
        self.formatters.insert(name.into(), Box::new(f));
    }

    /// Whether a formatter is registered under `name`.
    pub fn contains(&self, name: &str) -> bool {
        self.formatters.contains_key(name)
    }

    /// Registered names, in registration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.formatters.keys().map(String::as_str)
    }

    /// Apply the named formatter. `None` for an unknown name; callers
    /// decide how serious that is.
    pub fn apply(&self, name: &str, value: &Value) -> Option<String> {
        self.formatters.get(name).map(|f| f(value))
    }
}

impl Default for FormatterRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

fn display_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

fn human_size(bytes: u64) -> String {
    const UNITS: &[&str] = &["B", "KiB", "MiB", "GiB", "TiB"];
    let mut size = bytes as f64;
    let mut unit = 0;
    while size >= 1024.0 && unit < UNITS.len() - 1 {
        size /= 1024.0;
        unit += 1;
    }
    if unit == 0 {
        format!("{bytes} B")
    } else {
        format!("{size:.1} {}", UNITS[unit])
    }
}
