//! Reference analyzer (component C): a depth-first walk of a schema instance
//! that locates every `$ref`, resolves relative references against the
//! document's `$id`, and produces an ordered list of reference occurrences.

use serde_json::Value;
use url::Url;

use crate::error::SchemaError;
use crate::pointer::Pointer;
use crate::reference::{self, JsonReference};

/// A single `$ref` found in a document: where it sits, and what it resolves
/// to (already absolutized against the owning document's `$id`, for
/// relative references).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefOccurrence {
    pub encountered_at: Pointer,
    pub points_to: JsonReference,
}

impl RefOccurrence {
    /// The target is in the owning document (fragment-only reference).
    pub fn is_local(&self) -> bool {
        self.points_to.url.is_empty()
    }

    /// The target schema URI (empty string for local references).
    pub fn schema_uri(&self) -> &str {
        &self.points_to.url
    }
}

/// Walk `doc` and enumerate every `$ref` with its absolute target.
pub fn analyze(doc: &Value) -> Result<Vec<RefOccurrence>, SchemaError> {
    let mut refs = Vec::new();
    scan(doc, &Pointer::root(), doc, &mut refs)?;
    Ok(refs)
}

fn scan(
    node: &Value,
    at: &Pointer,
    root: &Value,
    refs: &mut Vec<RefOccurrence>,
) -> Result<(), SchemaError> {
    match node {
        Value::Object(map) => {
            for (key, value) in map {
                if key == "$ref" {
                    refs.push(resolve_ref_value(value, at, root)?);
                } else {
                    scan(value, &at.push(key.clone()), root, refs)?;
                }
            }
            Ok(())
        }
        Value::Array(items) => {
            for (i, value) in items.iter().enumerate() {
                scan(value, &at.push(i.to_string()), root, refs)?;
            }
            Ok(())
        }
        _ => Ok(()),
    }
}

fn resolve_ref_value(
    value: &Value,
    at: &Pointer,
    root: &Value,
) -> Result<RefOccurrence, SchemaError> {
    let ref_string = value.as_str().ok_or_else(|| SchemaError::RefNotString {
        path: at.to_string(),
    })?;

    let parsed = reference::parse(ref_string);

    if parsed.is_fragment_only() || parsed.is_full_url() {
        return Ok(RefOccurrence {
            encountered_at: at.clone(),
            points_to: parsed,
        });
    }

    // Path-only: resolve against the owning document's $id.
    let id_value = root
        .get("$id")
        .ok_or_else(|| SchemaError::NoIdForRelativeRef {
            path: at.to_string(),
            reference: ref_string.to_string(),
        })?;
    let id_str = id_value
        .as_str()
        .ok_or_else(|| SchemaError::NoIdForRelativeRef {
            path: at.to_string(),
            reference: ref_string.to_string(),
        })?;
    let base = Url::parse(id_str).map_err(|_| SchemaError::BadId {
        id: id_str.to_string(),
    })?;

    let combined = if parsed.fragment.is_empty() {
        parsed.url.clone()
    } else {
        format!("{}#{}", parsed.url, parsed.fragment)
    };
    let joined = base.join(&combined).map_err(|_| SchemaError::MalformedRef {
        path: at.to_string(),
        reference: ref_string.to_string(),
    })?;

    let mut url_only = joined.clone();
    url_only.set_fragment(None);

    Ok(RefOccurrence {
        encountered_at: at.clone(),
        points_to: JsonReference {
            url: url_only.to_string(),
            fragment: joined.fragment().unwrap_or("").to_string(),
        },
    })
}
