//! Response schema resolution
//!
//! Works out which named schema describes a response body. Four shapes are
//! recognized; anything else degrades to [`SchemaRef::unknown`] with a
//! warning and generation carries on.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::document::Document;

/// How the schema name was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, schemars::JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum SchemaKind {
    /// Body is a `$ref` to a named schema
    Ref,
    /// Body is an array whose items are a named schema
    Array,
    /// Inline object; name guessed from its properties
    Object,
    /// Resolution failed
    Unknown,
}

impl SchemaKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Ref => "ref",
            Self::Array => "array",
            Self::Object => "object",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for SchemaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Resolution result: `(kind, schema name)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, schemars::JsonSchema)]
pub struct SchemaRef {
    pub kind: SchemaKind,
    pub name: String,
}

impl SchemaRef {
    fn new(kind: SchemaKind, name: impl Into<String>) -> Self {
        Self {
            kind,
            name: name.into(),
        }
    }

    /// The failure sentinel `(unknown, "unknown")`.
    #[must_use]
    pub fn unknown() -> Self {
        Self::new(SchemaKind::Unknown, "unknown")
    }

    #[must_use]
    pub fn is_unknown(&self) -> bool {
        self.kind == SchemaKind::Unknown
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ResolveError {
    #[error("response has an empty content mapping")]
    EmptyContent,
    #[error("first content entry ({0}) has no schema $ref")]
    MissingSchemaRef(String),
    #[error("response $ref {0} not found in components.responses")]
    UnknownResponse(String),
    #[error("referenced response {0} has no content schema")]
    MissingContent(String),
    #[error("array schema has no items.$ref")]
    MissingItemsRef,
    #[error("object schema properties reference no named schema")]
    NoSchemaInProperties,
    #[error("schema type {0:?} is not recognized")]
    UnsupportedType(String),
    #[error("unable to determine schema from {0}")]
    Unrecognized(String),
}

/// Resolve a response's schema, degrading to `(unknown, "unknown")` on any
/// failure. The failure is logged, never propagated.
pub fn resolve(response: &Value, doc: &Document) -> SchemaRef {
    match try_resolve(response, doc) {
        Ok(schema) => schema,
        Err(e) => {
            tracing::warn!(error = %e, "schema resolution failed; setting unknown");
            SchemaRef::unknown()
        }
    }
}

/// Resolve a response's schema.
///
/// # Errors
///
/// Returns the first shape mismatch or lookup miss encountered.
pub fn try_resolve(response: &Value, doc: &Document) -> Result<SchemaRef, ResolveError> {
    if let Some(content) = response.get("content") {
        let (media_type, entry) = first_entry(content).ok_or(ResolveError::EmptyContent)?;
        let reference = entry
            .get("schema")
            .and_then(|s| s.get("$ref"))
            .and_then(Value::as_str)
            .ok_or_else(|| ResolveError::MissingSchemaRef(media_type.to_string()))?;
        return Ok(SchemaRef::new(SchemaKind::Ref, last_segment(reference)));
    }

    if let Some(reference) = response.get("$ref").and_then(Value::as_str) {
        let response_name = last_segment(reference);
        let target = doc
            .component_response(response_name)
            .ok_or_else(|| ResolveError::UnknownResponse(reference.to_string()))?;
        let schema = target
            .get("content")
            .and_then(first_entry)
            .and_then(|(_, entry)| entry.get("schema"))
            .ok_or_else(|| ResolveError::MissingContent(response_name.to_string()))?;
        return resolve_schema(schema);
    }

    Err(ResolveError::Unrecognized(response.to_string()))
}

fn resolve_schema(schema: &Value) -> Result<SchemaRef, ResolveError> {
    if let Some(reference) = schema.get("$ref").and_then(Value::as_str) {
        return Ok(SchemaRef::new(SchemaKind::Ref, last_segment(reference)));
    }

    match schema.get("type").and_then(Value::as_str) {
        Some("array") => {
            let reference = schema
                .get("items")
                .and_then(|i| i.get("$ref"))
                .and_then(Value::as_str)
                .ok_or(ResolveError::MissingItemsRef)?;
            Ok(SchemaRef::new(SchemaKind::Array, last_segment(reference)))
        }
        Some("object") => {
            tracing::info!(
                "found object response type; doing the best it can to determine the schema"
            );
            let name = guess_object_schema(schema.get("properties"))?;
            Ok(SchemaRef::new(SchemaKind::Object, name))
        }
        Some(other) => Err(ResolveError::UnsupportedType(other.to_string())),
        None => Err(ResolveError::Unrecognized(schema.to_string())),
    }
}

/// Best-effort name for an inline object: serialize its properties and take
/// the text after the last `schemas/` up to the closing quote.
fn guess_object_schema(properties: Option<&Value>) -> Result<String, ResolveError> {
    let text = properties
        .map(Value::to_string)
        .ok_or(ResolveError::NoSchemaInProperties)?;
    let (_, tail) = text
        .rsplit_once("schemas/")
        .ok_or(ResolveError::NoSchemaInProperties)?;
    let name = tail.split('"').next().unwrap_or_default();
    if name.is_empty() {
        return Err(ResolveError::NoSchemaInProperties);
    }
    Ok(name.to_string())
}

fn first_entry(content: &Value) -> Option<(&str, &Value)> {
    content
        .as_object()
        .and_then(|c| c.iter().next())
        .map(|(k, v)| (k.as_str(), v))
}

/// `#/components/schemas/Widget` → `Widget`
fn last_segment(reference: &str) -> &str {
    reference.rsplit('/').next().unwrap_or(reference)
}

/// Description of a response, following a `$ref` into
/// `components.responses` when the response has none of its own.
pub fn describe<'a>(response: &'a Value, doc: &'a Document) -> Option<&'a str> {
    if let Some(desc) = response.get("description").and_then(Value::as_str) {
        return Some(desc);
    }
    let reference = response.get("$ref").and_then(Value::as_str)?;
    doc.component_response(last_segment(reference))?
        .get("description")
        .and_then(Value::as_str)
}
