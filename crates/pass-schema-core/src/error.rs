//! Error types for schema analysis, dereferencing, sorting, and merging.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Stable, machine-readable error codes.
///
/// These form the taxonomy of spec.md §7; the HTTP layer maps `BadRequest`
/// to 400 and everything else to 500.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[non_exhaustive]
pub enum ErrorCode {
    RefNotString,
    MalformedRef,
    NoIdForRelativeRef,
    BadId,
    SelfCycle,
    LocalCycle,
    ResolutionStuck,
    CycleInSchemaGraph,
    SchemaNotFound,
    FetchFailed,
    TypeConflict,
    ValueConflict,
    NilSchema,
    MissingIdOnLoad,
    IoError,
}

#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("$ref at {path} is not a string")]
    RefNotString { path: String },

    #[error("could not parse $ref at {path}: {reference}")]
    MalformedRef { path: String, reference: String },

    #[error("found relative reference {reference} at {path}, but the document has no $id")]
    NoIdForRelativeRef { path: String, reference: String },

    #[error("$id is not a well-formed URL: {id}")]
    BadId { id: String },

    #[error("self-cycle: {path} points to itself")]
    SelfCycle { path: String },

    #[error("local cycle detected among references in {schema_id}")]
    LocalCycle { schema_id: String },

    #[error("schema resolution did not converge after 100 passes in {schema_id}")]
    ResolutionStuck { schema_id: String },

    #[error("cycle detected in schema dependency graph at {schema_id}")]
    CycleInSchemaGraph { schema_id: String },

    #[error("schema not found: {uri}")]
    SchemaNotFound { uri: String },

    #[error("could not fetch schema {uri}: {message}")]
    FetchFailed { uri: String, message: String },

    #[error("type conflict for property '{field}': {left} vs {right}")]
    TypeConflict {
        field: String,
        left: &'static str,
        right: &'static str,
    },

    #[error("value conflict for property '{field}'")]
    ValueConflict { field: String },

    #[error("nil schema encountered during sort")]
    NilSchema,

    #[error("schema loaded from {path} has no $id")]
    MissingIdOnLoad { path: String },

    #[error("I/O error reading {path}: {source}")]
    IoError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed JSON at {path}: {source}")]
    JsonError {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

impl SchemaError {
    pub fn error_code(&self) -> ErrorCode {
        match self {
            SchemaError::RefNotString { .. } => ErrorCode::RefNotString,
            SchemaError::MalformedRef { .. } => ErrorCode::MalformedRef,
            SchemaError::NoIdForRelativeRef { .. } => ErrorCode::NoIdForRelativeRef,
            SchemaError::BadId { .. } => ErrorCode::BadId,
            SchemaError::SelfCycle { .. } => ErrorCode::SelfCycle,
            SchemaError::LocalCycle { .. } => ErrorCode::LocalCycle,
            SchemaError::ResolutionStuck { .. } => ErrorCode::ResolutionStuck,
            SchemaError::CycleInSchemaGraph { .. } => ErrorCode::CycleInSchemaGraph,
            SchemaError::SchemaNotFound { .. } => ErrorCode::SchemaNotFound,
            SchemaError::FetchFailed { .. } => ErrorCode::FetchFailed,
            SchemaError::TypeConflict { .. } => ErrorCode::TypeConflict,
            SchemaError::ValueConflict { .. } => ErrorCode::ValueConflict,
            SchemaError::NilSchema => ErrorCode::NilSchema,
            SchemaError::MissingIdOnLoad { .. } => ErrorCode::MissingIdOnLoad,
            SchemaError::IoError { .. } => ErrorCode::IoError,
            SchemaError::JsonError { .. } => ErrorCode::IoError,
        }
    }

    /// Structured representation suitable for logging or an HTTP error body.
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "code": self.error_code(),
            "message": self.to_string(),
        })
    }
}
