//! Entity fetcher (component H): retrieves the PASS repository entity at a
//! resource URI and deserializes it.
//!
//! Grounded on `lib/web/resolv.go`'s `InternalPassClient`/`PassEntityFetcher`
//! (named and partially specified by `serve.go`, not present in full in the
//! retrieved source): base-URI rewriting so the service can address Fedora
//! on a private network while resources are named by their public URI, plus
//! optional HTTP basic auth.

use reqwest::header::ACCEPT;
use serde::de::DeserializeOwned;

use crate::error::ServiceError;

const MEDIA_JSON_TYPES: &str = "application/json, application/ld+json";

#[derive(Debug, Clone, Default)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

/// A schema-bearing PASS entity: the subset of fields this service cares
/// about. Mirrors `lib/web/resolv.go`'s `SchemaRef`.
#[derive(Debug, Clone, serde::Deserialize)]
pub struct SchemaRef {
    pub schemas: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct EntityFetcher {
    client: reqwest::Client,
    external_base: String,
    internal_base: String,
    credentials: Option<Credentials>,
}

impl EntityFetcher {
    pub fn new(
        client: reqwest::Client,
        external_base: String,
        internal_base: String,
        credentials: Option<Credentials>,
    ) -> Self {
        Self {
            client,
            external_base,
            internal_base,
            credentials,
        }
    }

    /// Rewrite `url` to target the internal base URI if it starts with the
    /// configured external one; otherwise leave it untouched.
    fn rewrite(&self, url: &str) -> String {
        if !self.external_base.is_empty() {
            if let Some(suffix) = url.strip_prefix(self.external_base.as_str()) {
                return format!("{}{}", self.internal_base, suffix);
            }
        }
        url.to_string()
    }

    /// Fetch and deserialize the JSON(-LD) entity at `url`.
    pub async fn fetch_entity<T: DeserializeOwned>(&self, url: &str) -> Result<T, ServiceError> {
        let target = self.rewrite(url);

        let mut request = self.client.get(&target).header(ACCEPT, MEDIA_JSON_TYPES);
        if let Some(creds) = &self.credentials {
            request = request.basic_auth(&creds.username, Some(&creds.password));
        }

        let response = request
            .send()
            .await
            .map_err(|e| ServiceError::FetchFailed {
                uri: url.to_string(),
                message: e.to_string(),
            })?
            .error_for_status()
            .map_err(|e| ServiceError::FetchFailed {
                uri: url.to_string(),
                message: e.to_string(),
            })?;

        response
            .json::<T>()
            .await
            .map_err(|e| ServiceError::FetchFailed {
                uri: url.to_string(),
                message: e.to_string(),
            })
    }
}
