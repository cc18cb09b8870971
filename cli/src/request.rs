//! Request parsing (component G, inbound half): a schema-service request is
//! just an ordered list of resource URIs, carried as either a JSON array or
//! newline-delimited text.
//!
//! Grounded on `lib/web/request.go`'s `Request.ReadJSON`/`ReadText`.

use crate::error::ServiceError;

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Request {
    pub resources: Vec<String>,
}

impl Request {
    /// Parse `body` as a JSON array of URI strings.
    pub fn read_json(body: &[u8]) -> Result<Self, ServiceError> {
        let given: Vec<String> = serde_json::from_slice(body)
            .map_err(|e| ServiceError::BadRequest(format!("could not parse json input: {e}")))?;

        let mut resources = Vec::with_capacity(given.len());
        for addr in given {
            validate_url(&addr)?;
            resources.push(addr);
        }
        Ok(Request { resources })
    }

    /// Parse `body` as newline-delimited URIs; blank lines (after trimming)
    /// are skipped.
    pub fn read_text(body: &str) -> Result<Self, ServiceError> {
        let mut resources = Vec::new();
        for line in body.lines() {
            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }
            validate_url(trimmed)?;
            resources.push(trimmed.to_string());
        }
        Ok(Request { resources })
    }
}

fn validate_url(addr: &str) -> Result<(), ServiceError> {
    url::Url::parse(addr)
        .map(|_| ())
        .map_err(|e| ServiceError::BadRequest(format!("\"{addr}\" is not a URL: {e}")))
}
