//! Schema service orchestration (components G–I glue): turns a parsed
//! [`Request`] into the assembled schema response, combining the static
//! store, the outbound entity fetcher, and the core crate's analysis
//! pipeline.
//!
//! Grounded on `lib/web/service.go`'s `SchemaService.Schemas`.

use std::collections::HashSet;
use std::sync::Arc;

use serde_json::Value;

use pass_schema_core::{SchemaError, SchemaFetcher, SchemaMap};

use crate::error::ServiceError;
use crate::fetch::{EntityFetcher, SchemaRef};
use crate::request::Request;

/// Adapts the static [`SchemaMap`] to [`pass_schema_core::SchemaFetcher`].
/// The dereferencer only ever needs schemas already present in the static
/// store; it never reaches out over the network itself.
struct StoreFetcher<'s>(&'s SchemaMap);

impl<'s> SchemaFetcher for StoreFetcher<'s> {
    fn fetch_schema(&self, uri: &str) -> Result<Option<Value>, SchemaError> {
        Ok(self.0.get_schema(uri).cloned())
    }
}

pub struct SchemaService {
    store: Arc<SchemaMap>,
    entities: EntityFetcher,
}

impl SchemaService {
    pub fn new(store: Arc<SchemaMap>, entities: EntityFetcher) -> Self {
        Self { store, entities }
    }

    /// Resolve `request`'s resource URIs to the schemas that govern them,
    /// sort and dereference the result, and merge it down to a single
    /// schema when `merge` is set.
    pub async fn schemas(
        &self,
        request: &Request,
        merge: bool,
    ) -> Result<Vec<Value>, ServiceError> {
        let mut seen = HashSet::new();
        let mut gathered = Vec::new();

        for resource in &request.resources {
            let entity: SchemaRef = self.entities.fetch_entity(resource).await?;
            for schema_uri in entity.schemas {
                if !seen.insert(schema_uri.clone()) {
                    continue;
                }
                let schema = self.store.get_schema(&schema_uri).ok_or_else(|| {
                    ServiceError::Schema(SchemaError::SchemaNotFound {
                        uri: schema_uri.clone(),
                    })
                })?;
                gathered.push(schema.clone());
            }
        }

        let sorted = pass_schema_core::sorted(gathered)?;
        let dereferenced =
            pass_schema_core::dereference(&StoreFetcher(self.store.as_ref()), sorted)?;

        if merge {
            let merged = pass_schema_core::merge(&dereferenced)?;
            Ok(vec![merged])
        } else {
            Ok(dereferenced)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn store_with(schemas: &[Value]) -> Arc<SchemaMap> {
        let mut store = SchemaMap::new();
        for schema in schemas {
            store.add_str(&schema.to_string(), "<test>").unwrap();
        }
        Arc::new(store)
    }

    fn fetcher() -> EntityFetcher {
        EntityFetcher::new(reqwest::Client::new(), String::new(), String::new(), None)
    }

    #[tokio::test]
    async fn schema_not_found_is_reported() {
        let store = store_with(&[]);
        let service = SchemaService::new(store, fetcher());
        let err = service
            .gather_only(&["http://x/missing".to_string()])
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ServiceError::Schema(SchemaError::SchemaNotFound { .. })
        ));
    }

    impl SchemaService {
        /// Test seam: exercise the dedup/lookup loop without a live entity
        /// fetch, by pretending each resource URI names a schema URI
        /// directly.
        async fn gather_only(&self, schema_uris: &[String]) -> Result<Vec<Value>, ServiceError> {
            let mut seen = HashSet::new();
            let mut gathered = Vec::new();
            for uri in schema_uris {
                if !seen.insert(uri.clone()) {
                    continue;
                }
                let schema = self.store.get_schema(uri).ok_or_else(|| {
                    ServiceError::Schema(SchemaError::SchemaNotFound { uri: uri.clone() })
                })?;
                gathered.push(schema.clone());
            }
            Ok(gathered)
        }
    }

    #[tokio::test]
    async fn dedups_repeated_schema_uris() {
        let store = store_with(&[json!({"$id": "http://x/a", "type": "object"})]);
        let service = SchemaService::new(store, fetcher());
        let result = service
            .gather_only(&[
                "http://x/a".to_string(),
                "http://x/a".to_string(),
            ])
            .await
            .unwrap();
        assert_eq!(result.len(), 1);
    }
}
