//! Service-layer errors: wraps [`pass_schema_core::SchemaError`] with the
//! outer failure modes that only make sense once HTTP requests and outbound
//! fetches are involved.

use axum::http::StatusCode;
use pass_schema_core::SchemaError;

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("malformed request: {0}")]
    BadRequest(String),

    #[error("could not fetch {uri}: {message}")]
    FetchFailed { uri: String, message: String },

    #[error(transparent)]
    Schema(#[from] SchemaError),
}

impl ServiceError {
    /// The HTTP status this error should be reported as: `bad-request`
    /// failures are client errors (400), everything else is a server
    /// error (500) per spec.md §7.
    pub fn status_code(&self) -> StatusCode {
        match self {
            ServiceError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ServiceError::FetchFailed { .. } | ServiceError::Schema(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}
