//! OpenAPI document loading
//!
//! The document is kept as a generic JSON tree. YAML is parsed with `serde_yml`
//! and converted node by node so mapping order survives and non-string keys
//! (unquoted `200:` response codes) become strings.

use std::path::{Path, PathBuf};

use serde_json::{Map, Value};

use crate::operation::{MethodFilter, Operation};

/// Parsed OpenAPI document (read-only after load).
#[derive(Debug, Clone)]
pub struct Document {
    root: Value,
}

impl Document {
    /// Read and parse a YAML (or JSON) document from disk.
    ///
    /// # Errors
    ///
    /// Returns error if the file cannot be read or is not valid YAML.
    pub fn load(path: &Path) -> Result<Self, LoadError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| LoadError::Io(path.to_path_buf(), e.to_string()))?;
        let doc = Self::from_yaml_str(&content)?;
        tracing::debug!(path = %path.display(), paths = doc.paths().map_or(0, Map::len), "loaded document");
        Ok(doc)
    }

    /// Parse a document from YAML text. JSON is valid YAML and works too.
    pub fn from_yaml_str(content: &str) -> Result<Self, LoadError> {
        let yaml: serde_yml::Value =
            serde_yml::from_str(content).map_err(|e| LoadError::Parse(e.to_string()))?;
        let root = yaml_to_json(yaml);
        if !root.is_object() {
            return Err(LoadError::Parse(
                "document root must be a mapping".to_string(),
            ));
        }
        Ok(Self { root })
    }

    /// Wrap an already-built JSON tree.
    pub fn from_value(root: Value) -> Self {
        Self { root }
    }

    /// `servers[0].url`
    pub fn host(&self) -> Result<&str, LoadError> {
        self.root
            .get("servers")
            .and_then(Value::as_array)
            .and_then(|s| s.first())
            .and_then(|s| s.get("url"))
            .and_then(Value::as_str)
            .ok_or(LoadError::MissingServer)
    }

    /// `paths` mapping, if any.
    pub fn paths(&self) -> Option<&Map<String, Value>> {
        self.root.get("paths").and_then(Value::as_object)
    }

    /// `components.responses[name]`
    pub fn component_response(&self, name: &str) -> Option<&Value> {
        self.root
            .get("components")
            .and_then(|c| c.get("responses"))
            .and_then(|r| r.get(name))
    }

    /// `components.schemas[name]`
    pub fn component_schema(&self, name: &str) -> Option<&Value> {
        self.root
            .get("components")
            .and_then(|c| c.get("schemas"))
            .and_then(|r| r.get(name))
    }

    /// Operations in document order (path order, then method order within
    /// each path item) restricted to `filter`.
    pub fn operations(&self, filter: &MethodFilter) -> Vec<Operation> {
        let Some(paths) = self.paths() else {
            return Vec::new();
        };

        let mut ops = Vec::new();
        for (path, item) in paths {
            let Some(item) = item.as_object() else {
                tracing::warn!(%path, "path item is not a mapping; skipping");
                continue;
            };
            let shared = item.get("parameters");
            for (method, operation) in item {
                if !MethodFilter::is_http_method(method) || !filter.allows(method) {
                    continue;
                }
                ops.push(Operation::from_value(path, method, operation, shared));
            }
        }
        ops
    }
}

/// Convert a YAML tree to a JSON tree, preserving mapping order.
fn yaml_to_json(value: serde_yml::Value) -> Value {
    match value {
        serde_yml::Value::Null => Value::Null,
        serde_yml::Value::Bool(b) => Value::Bool(b),
        serde_yml::Value::Number(n) => yaml_number(&n),
        serde_yml::Value::String(s) => Value::String(s),
        serde_yml::Value::Sequence(seq) => Value::Array(seq.into_iter().map(yaml_to_json).collect()),
        serde_yml::Value::Mapping(mapping) => {
            let mut map = Map::with_capacity(mapping.len());
            for (k, v) in mapping {
                map.insert(yaml_key(k), yaml_to_json(v));
            }
            Value::Object(map)
        }
        serde_yml::Value::Tagged(tagged) => yaml_to_json(tagged.value),
    }
}

fn yaml_number(n: &serde_yml::Number) -> Value {
    if let Some(i) = n.as_i64() {
        Value::from(i)
    } else if let Some(u) = n.as_u64() {
        Value::from(u)
    } else {
        n.as_f64()
            .and_then(serde_json::Number::from_f64)
            .map_or(Value::Null, Value::Number)
    }
}

fn yaml_key(key: serde_yml::Value) -> String {
    match key {
        serde_yml::Value::String(s) => s,
        serde_yml::Value::Number(n) => n.to_string(),
        serde_yml::Value::Bool(b) => b.to_string(),
        serde_yml::Value::Null => "null".to_string(),
        other => yaml_to_json(other).to_string(),
    }
}

#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("Cannot read {0}: {1}")]
    Io(PathBuf, String),
    #[error("Invalid YAML: {0}")]
    Parse(String),
    #[error("Document has no servers[0].url and no host is configured")]
    MissingServer,
    #[error("Operation {0} has no operationId")]
    MissingOperationId(String),
}
