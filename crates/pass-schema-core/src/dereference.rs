//! Dereferencer (component D): replaces every `$ref` in a set of schema
//! instances with the value it points to, so the result is fully inlined
//! and self-contained.
//!
//! Grounded on `lib/jsonschema/deref.go`: a per-pass map from schema URI to
//! a tri-state (absent / in-progress / done), local refs resolved to a
//! fixed point before any external ones are touched, external refs pulled
//! in (recursively dereferencing the fetched schema first) via a
//! caller-supplied fetcher.

use std::collections::HashMap;

use serde_json::Value;

use crate::analyzer::{self, RefOccurrence};
use crate::error::SchemaError;
use crate::instance;
use crate::pointer::Pointer;

/// Looks schemas up by URI on demand, for the schemas a dereference pass
/// was not given directly. Implementations should be cheap to call more
/// than once for the same URI (the dereferencer caches results itself, but
/// a fetcher is free to cache too).
pub trait SchemaFetcher {
    /// Fetch the schema document identified by `uri`, or `Ok(None)` if no
    /// such schema exists.
    fn fetch_schema(&self, uri: &str) -> Result<Option<Value>, SchemaError>;
}

/// Dereference every schema in `schemas`, in order. Schemas already fully
/// resolved earlier in the same call (by `$id`) are skipped on a later
/// occurrence rather than reprocessed.
pub fn dereference<F: SchemaFetcher>(
    fetcher: &F,
    schemas: Vec<Value>,
) -> Result<Vec<Value>, SchemaError> {
    let mut state = State {
        analyzed: HashMap::new(),
        fetcher,
    };

    schemas
        .into_iter()
        .map(|schema| state.dereference_one(schema))
        .collect()
}

struct State<'f, F: SchemaFetcher> {
    /// `None` marks a schema URI as in-progress (the tri-state's
    /// in-progress sentinel); `Some` marks it done.
    analyzed: HashMap<String, Option<Value>>,
    fetcher: &'f F,
}

impl<'f, F: SchemaFetcher> State<'f, F> {
    fn dereference_one(&mut self, schema: Value) -> Result<Value, SchemaError> {
        let id = instance::id(&schema).to_string();

        if let Some(entry) = self.analyzed.get(&id) {
            return match entry {
                None => Err(SchemaError::CycleInSchemaGraph {
                    schema_id: id.clone(),
                }),
                Some(done) => Ok(done.clone()),
            };
        }
        self.analyzed.insert(id.clone(), None);

        let mut doc = schema;
        self.resolve_local(&mut doc, &id)?;

        for occurrence in analyzer::analyze(&doc)? {
            self.resolve_external(&mut doc, &occurrence)?;
        }

        self.analyzed.insert(id.clone(), Some(doc.clone()));
        Ok(doc)
    }

    /// Repeatedly replace terminal local refs until none remain, bounded at
    /// 100 passes.
    fn resolve_local(&mut self, doc: &mut Value, schema_id: &str) -> Result<(), SchemaError> {
        for _ in 0..100 {
            let refs = analyzer::analyze(doc)?;
            let local: Vec<&RefOccurrence> = refs.iter().filter(|r| r.is_local()).collect();

            if local.is_empty() {
                return Ok(());
            }

            let terminal: Vec<&RefOccurrence> = local
                .iter()
                .copied()
                .filter(|r| is_local_terminal(r, &local))
                .collect();

            if terminal.is_empty() {
                return Err(SchemaError::LocalCycle {
                    schema_id: schema_id.to_string(),
                });
            }

            for r in terminal {
                self.resolve_local_one(doc, r)?;
            }
        }

        Err(SchemaError::ResolutionStuck {
            schema_id: schema_id.to_string(),
        })
    }

    fn resolve_local_one(&self, doc: &mut Value, r: &RefOccurrence) -> Result<(), SchemaError> {
        let target = Pointer::parse(&r.points_to.fragment);

        if target == r.encountered_at {
            return Err(SchemaError::SelfCycle {
                path: r.encountered_at.to_string(),
            });
        }

        let value = target
            .get(doc)
            .cloned()
            .ok_or_else(|| SchemaError::SchemaNotFound {
                uri: r.points_to.to_ref_string(),
            })?;

        r.encountered_at.set(doc, value);
        Ok(())
    }

    fn resolve_external(&mut self, doc: &mut Value, r: &RefOccurrence) -> Result<(), SchemaError> {
        if r.is_local() {
            return Ok(());
        }

        let target_doc = self.get_schema(r.schema_uri())?;
        let target_pointer = Pointer::parse(&r.points_to.fragment);
        let value = target_pointer
            .get(&target_doc)
            .cloned()
            .ok_or_else(|| SchemaError::SchemaNotFound {
                uri: r.points_to.to_ref_string(),
            })?;

        r.encountered_at.set(doc, value);
        Ok(())
    }

    /// Resolve (fetching and fully dereferencing, if needed) the schema
    /// identified by `uri`.
    fn get_schema(&mut self, uri: &str) -> Result<Value, SchemaError> {
        if let Some(entry) = self.analyzed.get(uri) {
            return match entry {
                None => Err(SchemaError::CycleInSchemaGraph {
                    schema_id: uri.to_string(),
                }),
                Some(done) => Ok(done.clone()),
            };
        }

        let fetched = self
            .fetcher
            .fetch_schema(uri)?
            .ok_or_else(|| SchemaError::SchemaNotFound {
                uri: uri.to_string(),
            })?;

        self.dereference_one(fetched)
    }
}

/// A local ref is terminal iff no other local ref's `encountered_at` lies
/// strictly below the location this ref points to — i.e. inlining it now
/// would not reintroduce an unresolved ref.
fn is_local_terminal(r: &RefOccurrence, local: &[&RefOccurrence]) -> bool {
    let target = Pointer::parse(&r.points_to.fragment);
    !local
        .iter()
        .any(|t| t.encountered_at.is_strict_descendant_of(&target))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    struct StaticFetcher(HashMap<&'static str, Value>);

    impl SchemaFetcher for StaticFetcher {
        fn fetch_schema(&self, uri: &str) -> Result<Option<Value>, SchemaError> {
            Ok(self.0.get(uri).cloned())
        }
    }

    struct NoFetcher;
    impl SchemaFetcher for NoFetcher {
        fn fetch_schema(&self, _uri: &str) -> Result<Option<Value>, SchemaError> {
            Ok(None)
        }
    }

    #[test]
    fn resolves_local_ref() {
        let doc = json!({
            "$id": "http://x/a",
            "definitions": {"b": {"type": "string"}},
            "properties": {"foo": {"$ref": "#/definitions/b"}},
        });
        let out = dereference(&NoFetcher, vec![doc]).unwrap();
        assert_eq!(out[0]["properties"]["foo"], json!({"type": "string"}));
    }

    #[test]
    fn resolves_chained_local_refs_to_fixed_point() {
        let doc = json!({
            "$id": "http://x/a",
            "definitions": {
                "b": {"$ref": "#/definitions/c"},
                "c": {"type": "number"},
            },
            "properties": {"foo": {"$ref": "#/definitions/b"}},
        });
        let out = dereference(&NoFetcher, vec![doc]).unwrap();
        assert_eq!(out[0]["properties"]["foo"], json!({"type": "number"}));
    }

    #[test]
    fn self_cycle_fails() {
        let doc = json!({
            "$id": "http://x/a",
            "properties": {"foo": {"$ref": "#/properties/foo"}},
        });
        let err = dereference(&NoFetcher, vec![doc]).unwrap_err();
        assert_eq!(err.error_code(), crate::error::ErrorCode::SelfCycle);
    }

    #[test]
    fn local_cycle_fails() {
        // This ref's target ("/definitions/wrapper") is a strict ancestor of
        // the ref itself: it can never become terminal, since the ref
        // always lies beneath its own target.
        let doc = json!({
            "$id": "http://x/a",
            "definitions": {
                "wrapper": {"inner": {"$ref": "#/definitions/wrapper"}},
            },
        });
        let err = dereference(&NoFetcher, vec![doc]).unwrap_err();
        assert_eq!(err.error_code(), crate::error::ErrorCode::LocalCycle);
    }

    #[test]
    fn resolves_external_ref() {
        let mut others = HashMap::new();
        others.insert(
            "http://x/b",
            json!({"$id": "http://x/b", "definitions": {"thing": {"type": "boolean"}}}),
        );
        let fetcher = StaticFetcher(others);

        let a = json!({
            "$id": "http://x/a",
            "properties": {"foo": {"$ref": "http://x/b#/definitions/thing"}},
        });
        let out = dereference(&fetcher, vec![a]).unwrap();
        assert_eq!(out[0]["properties"]["foo"], json!({"type": "boolean"}));
    }

    #[test]
    fn missing_external_schema_fails() {
        let a = json!({
            "$id": "http://x/a",
            "properties": {"foo": {"$ref": "http://x/missing#/x"}},
        });
        let err = dereference(&NoFetcher, vec![a]).unwrap_err();
        assert_eq!(err.error_code(), crate::error::ErrorCode::SchemaNotFound);
    }

    #[test]
    fn cross_schema_cycle_fails() {
        let mut others = HashMap::new();
        others.insert(
            "http://x/b",
            json!({
                "$id": "http://x/b",
                "properties": {"bar": {"$ref": "http://x/a#/properties/foo"}},
            }),
        );
        let fetcher = StaticFetcher(others);

        let a = json!({
            "$id": "http://x/a",
            "properties": {"foo": {"$ref": "http://x/b#/properties/bar"}},
        });
        let err = dereference(&fetcher, vec![a]).unwrap_err();
        assert_eq!(err.error_code(), crate::error::ErrorCode::CycleInSchemaGraph);
    }

    #[test]
    fn already_done_schema_is_not_reprocessed() {
        let shared = json!({"$id": "http://x/a", "type": "object"});
        let out = dereference(&NoFetcher, vec![shared.clone(), shared]).unwrap();
        assert_eq!(out.len(), 2);
        assert_eq!(out[0], out[1]);
    }
}
