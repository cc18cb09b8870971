//! Static schema store (component B): an in-memory mapping from schema URI
//! to parsed document, loaded once from files/directories at startup and
//! read-only thereafter.

use std::collections::HashMap;
use std::fs;
use std::io::Read;
use std::path::Path;

use serde_json::Value;

use crate::error::SchemaError;
use crate::instance;

/// A mapping from schema URI (normalized: URL minus fragment) to schema
/// instance.
#[derive(Debug, Clone, Default)]
pub struct SchemaMap(HashMap<String, Value>);

impl SchemaMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse each reader as a JSON object and key it by its `$id`. Logs the
    /// load at `info` level.
    pub fn add(&mut self, mut readers: Vec<impl Read>) -> Result<(), SchemaError> {
        for reader in &mut readers {
            let mut buf = String::new();
            reader
                .read_to_string(&mut buf)
                .map_err(|source| SchemaError::IoError {
                    path: "<reader>".to_string(),
                    source,
                })?;
            self.add_str(&buf, "<reader>")?;
        }
        Ok(())
    }

    /// Parse `content` (the text of one schema document read from `path`,
    /// used only for error context) and insert it keyed by its `$id`.
    pub fn add_str(&mut self, content: &str, path: &str) -> Result<(), SchemaError> {
        let value: Value =
            serde_json::from_str(content).map_err(|source| SchemaError::JsonError {
                path: path.to_string(),
                source,
            })?;

        if !value.is_object() {
            return Err(SchemaError::MissingIdOnLoad {
                path: path.to_string(),
            });
        }

        let id = instance::id(&value);
        if id.is_empty() {
            return Err(SchemaError::MissingIdOnLoad {
                path: path.to_string(),
            });
        }

        tracing::info!(id, path, "loaded schema");
        self.0.insert(id.to_string(), value);
        Ok(())
    }

    /// Retrieve a schema by (possibly unclean) URL, stripping any fragment
    /// before lookup.
    pub fn get_schema(&self, url: &str) -> Option<&Value> {
        self.0.get(instance::normalize_uri(url))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Recursively walk files and directories, adding every regular file
    /// encountered (no filtering by extension). Failures propagate with the
    /// offending path.
    pub fn load<P: AsRef<Path>>(&mut self, paths: &[P]) -> Result<(), SchemaError> {
        for path in paths {
            self.load_path(path.as_ref())?;
        }
        Ok(())
    }

    fn load_path(&mut self, path: &Path) -> Result<(), SchemaError> {
        let metadata = fs::metadata(path).map_err(|source| SchemaError::IoError {
            path: path.display().to_string(),
            source,
        })?;

        if metadata.is_dir() {
            let mut entries: Vec<_> = fs::read_dir(path)
                .map_err(|source| SchemaError::IoError {
                    path: path.display().to_string(),
                    source,
                })?
                .collect::<Result<_, _>>()
                .map_err(|source| SchemaError::IoError {
                    path: path.display().to_string(),
                    source,
                })?;
            entries.sort_by_key(|e| e.path());
            for entry in entries {
                self.load_path(&entry.path())?;
            }
            return Ok(());
        }

        let content = fs::read_to_string(path).map_err(|source| SchemaError::IoError {
            path: path.display().to_string(),
            source,
        })?;
        self.add_str(&content, &path.display().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::io::Cursor;

    #[test]
    fn add_keys_by_id() {
        let mut store = SchemaMap::new();
        let doc = json!({"$id": "http://x/a", "type": "object"}).to_string();
        store.add_str(&doc, "a.json").unwrap();
        assert_eq!(store.get_schema("http://x/a"), Some(&json!({"$id": "http://x/a", "type": "object"})));
    }

    #[test]
    fn add_fails_without_id() {
        let mut store = SchemaMap::new();
        let doc = json!({"type": "object"}).to_string();
        let err = store.add_str(&doc, "a.json").unwrap_err();
        assert_eq!(
            err.error_code(),
            crate::error::ErrorCode::MissingIdOnLoad
        );
    }

    #[test]
    fn get_schema_strips_fragment() {
        let mut store = SchemaMap::new();
        store
            .add_str(&json!({"$id": "http://x/a"}).to_string(), "a.json")
            .unwrap();
        assert!(store.get_schema("http://x/a#/foo").is_some());
    }

    #[test]
    fn get_schema_missing_returns_none() {
        let store = SchemaMap::new();
        assert!(store.get_schema("http://x/missing").is_none());
    }

    #[test]
    fn add_via_reader() {
        let mut store = SchemaMap::new();
        let doc = json!({"$id": "http://x/a"}).to_string();
        store.add(vec![Cursor::new(doc)]).unwrap();
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn load_directory_recursively() {
        let dir = tempfile_dir();
        std::fs::write(
            dir.join("a.json"),
            json!({"$id": "http://x/a"}).to_string(),
        )
        .unwrap();
        let sub = dir.join("sub");
        std::fs::create_dir(&sub).unwrap();
        std::fs::write(sub.join("b.json"), json!({"$id": "http://x/b"}).to_string()).unwrap();

        let mut store = SchemaMap::new();
        store.load(&[dir.clone()]).unwrap();
        assert_eq!(store.len(), 2);
        std::fs::remove_dir_all(&dir).ok();
    }

    fn tempfile_dir() -> std::path::PathBuf {
        let mut dir = std::env::temp_dir();
        dir.push(format!("pass-schema-core-test-{:?}", std::thread::current().id()));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }
}
