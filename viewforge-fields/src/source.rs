//! Opaque key→tree configuration lookup.
//!
//! A [`ConfigSource`] holds named namespace documents and answers dotted
//! lookups into them. Keys take two forms:
//!
//! - `"{namespace}:{dotted.path}"`: look up the path inside the named
//!   document (`"post:post_fields_edit.title"`).
//! - `"{dotted.path}"`: the first segment names the document
//!   (`"base_fields.title"` reads `title` in the `base_fields` document).
//!
//! Lookups are deterministic and side-effect free. A missing namespace or
//! path is `None`, never an error.

use std::collections::HashMap;
use std::path::Path;

use serde_json::Value;
use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::error::{FieldsError, Result};
use viewforge_common::tree::lookup_path;

/// Key-based lookup over namespace documents.
pub trait ConfigSource {
    /// Fetch the tree at `key`, or `None` if any part is missing.
    fn get(&self, key: &str) -> Option<Value>;
}

/// Split a lookup key into (document, path-within-document).
fn split_key(key: &str) -> (&str, &str) {
    if let Some((namespace, path)) = key.split_once(':') {
        (namespace, path)
    } else if let Some((head, rest)) = key.split_once('.') {
        (head, rest)
    } else {
        (key, "")
    }
}

/// In-memory source, used by tests and embedded defaults.
#[derive(Debug, Default)]
pub struct MemorySource {
    documents: HashMap<String, Value>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a namespace document.
    pub fn insert(mut self, namespace: impl Into<String>, document: Value) -> Self {
        self.documents.insert(namespace.into(), document);
        self
    }
}

impl ConfigSource for MemorySource {
    fn get(&self, key: &str) -> Option<Value> {
        let (namespace, path) = split_key(key);
        let document = self.documents.get(namespace)?;
        lookup_path(document, path).cloned()
    }
}

/// Directory-backed source: one YAML document per file, the file stem is
/// the namespace name.
///
/// All documents are loaded eagerly at open; lookups afterwards are pure
/// in-memory reads. Unparseable documents are skipped with a warning;
/// one broken file must not take down every namespace.
#[derive(Debug)]
pub struct YamlDirSource {
    documents: HashMap<String, Value>,
}

impl YamlDirSource {
    /// Load every `*.yaml`/`*.yml` under `root` (recursively).
    pub fn open(root: impl AsRef<Path>) -> Result<Self> {
        let root = root.as_ref();
        if !root.is_dir() {
            return Err(FieldsError::SourceDirNotFound {
                path: root.to_path_buf(),
            });
        }

        let mut documents = HashMap::new();
        for entry in WalkDir::new(root).into_iter().filter_map(|e| e.ok()) {
            let path = entry.path();
            let ext = path.extension().and_then(|e| e.to_str());
            if !matches!(ext, Some("yaml") | Some("yml")) {
                continue;
            }
            let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            let content = std::fs::read_to_string(path)?;
            match serde_yaml::from_str::<Value>(&content) {
                Ok(document) => {
                    documents.insert(stem.to_string(), document);
                }
                Err(e) => {
                    warn!(?path, %e, "skipping invalid config document");
                }
            }
        }

        debug!(documents = documents.len(), root = %root.display(), "config source opened");
        Ok(Self { documents })
    }

    /// Namespaces loaded from disk.
    pub fn namespaces(&self) -> impl Iterator<Item = &str> {
        self.documents.keys().map(String::as_str)
    }
}

impl ConfigSource for YamlDirSource {
    fn get(&self, key: &str) -> Option<Value> {
        let (namespace, path) = split_key(key);
        let document = self.documents.get(namespace)?;
        lookup_path(document, path).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn memory_source_resolves_namespaced_keys() {
        let source = MemorySource::new().insert(
            "post",
            json!({"post_fields_edit": {"title": {"form": {"type": "text"}}}}),
        );
        let tree = source.get("post:post_fields_edit.title").unwrap();
        assert_eq!(tree, json!({"form": {"type": "text"}}));
        assert!(source.get("post:post_fields_edit.ghost").is_none());
        assert!(source.get("comment:anything").is_none());
    }

    #[test]
    fn bare_keys_use_the_first_segment_as_namespace() {
        let source =
            MemorySource::new().insert("base_fields", json!({"title": {"form": {"type": "text"}}}));
        assert!(source.get("base_fields.title").is_some());
        assert!(source.get("base_fields.missing").is_none());
    }

    #[test]
    fn namespace_only_key_returns_whole_document() {
        let source = MemorySource::new().insert("base_fields", json!({"title": {}}));
        assert_eq!(source.get("base_fields"), Some(json!({"title": {}})));
    }

    #[test]
    fn yaml_dir_source_loads_documents_by_stem() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join("post.yaml"),
            "post_fields_edit:\n  title:\n    form:\n      type: text\n",
        )
        .unwrap();
        fs::write(
            tmp.path().join("base_fields.yml"),
            "created_at:\n  form:\n    type: date\n",
        )
        .unwrap();
        fs::write(tmp.path().join("notes.txt"), "ignored").unwrap();

        let source = YamlDirSource::open(tmp.path()).unwrap();
        assert_eq!(source.namespaces().count(), 2);
        assert_eq!(
            source.get("post:post_fields_edit.title.form.type"),
            Some(json!("text"))
        );
        assert!(source.get("base_fields.created_at").is_some());
    }

    #[test]
    fn yaml_dir_source_skips_broken_documents() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("good.yaml"), "a: 1\n").unwrap();
        fs::write(tmp.path().join("broken.yaml"), ": : :\n").unwrap();

        let source = YamlDirSource::open(tmp.path()).unwrap();
        assert_eq!(source.get("good.a"), Some(json!(1)));
        assert!(source.get("broken.a").is_none());
    }

    #[test]
    fn missing_directory_is_an_error() {
        let tmp = TempDir::new().unwrap();
        let result = YamlDirSource::open(tmp.path().join("nope"));
        assert!(matches!(
            result,
            Err(FieldsError::SourceDirNotFound { .. })
        ));
    }
}
