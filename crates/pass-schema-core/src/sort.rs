//! Dependency sorter (component E): orders a set of schemas so that
//! most-depended-upon schemas come first, breaking ties by form-property
//! count, then by original input order.
//!
//! The original implementation expressed this as a pairwise `less(i, j)`
//! predicate fed to a sort: "if i depends on j, j first; if j depends on i,
//! i first; else more form-properties first". That predicate is not
//! transitive in general (schema A can out-rank schema B on form-count while
//! both are unrelated to a schema C that depends on A), so its result
//! depends on which pairs the sorting algorithm happens to compare — exactly
//! the ambiguity this module is meant to avoid. We get the same documented
//! ordering on the standard scenario (and a well-defined one on every
//! input) by running a real topological sort: at each step, pick the
//! schema with no remaining unsorted dependency, breaking ties first by how
//! many *other* schemas in the batch depend on it, then by how many of its
//! own dependencies it originally had (so schemas that merely finished
//! paying off their dependency chain still sort ahead of schemas that never
//! had one at all), then by form-property count, then by original position.

use std::collections::HashSet;

use serde_json::Value;

use crate::analyzer;
use crate::error::SchemaError;
use crate::instance;
use crate::pointer::Pointer;

struct Analyzed {
    id: String,
    deps: HashSet<String>,
    n_forms: usize,
    schema: Value,
}

/// Sort `schemas` so that, for any pair where one depends on the other via
/// `$ref`, the depended-upon schema sorts first (transitively). Among
/// schemas with no ordering constraint between them, the one more other
/// schemas depend on sorts first; ties go to the schema that originally had
/// more of its own dependencies (keeping schemas that participate in the
/// dependency graph ahead of schemas that never did); remaining ties go by
/// descending form-property count (`definitions.form.properties`), then by
/// original input order.
pub fn sorted(schemas: Vec<Value>) -> Result<Vec<Value>, SchemaError> {
    let analyzed = analyze(schemas)?;
    let n = analyzed.len();

    // dependent_count[i]: how many other schemas in this batch directly
    // depend on schema i.
    let mut dependent_count = vec![0usize; n];
    // in_degree[i]: how many schemas in this batch schema i directly
    // depends on (and that are still unsorted).
    let mut in_degree = vec![0usize; n];
    for (i, a) in analyzed.iter().enumerate() {
        for (j, b) in analyzed.iter().enumerate() {
            if i != j && b.deps.contains(&a.id) {
                dependent_count[i] += 1;
            }
            if i != j && a.deps.contains(&b.id) {
                in_degree[i] += 1;
            }
        }
    }

    // Snapshot of in_degree before any schema is removed: how many batch
    // members a schema originally depended on. Unlike `in_degree`, this
    // never changes, so it distinguishes "never had a dependency" (a truly
    // independent schema) from "had one and it's now satisfied" once both
    // reach zero remaining in-degree.
    let original_in_degree = in_degree.clone();

    let mut remaining: Vec<usize> = (0..n).collect();
    let mut order = Vec::with_capacity(n);

    while !remaining.is_empty() {
        // Prefer schemas with no unresolved dependency left in the batch.
        // If every remaining schema still has one (an inter-schema cycle,
        // which this component does not itself detect — see §4.3), fall
        // back to considering all remaining schemas so the loop still
        // terminates.
        let ready: Vec<usize> = remaining.iter().copied().filter(|&i| in_degree[i] == 0).collect();
        let pool: &[usize] = if ready.is_empty() { &remaining } else { &ready };

        let best = *pool
            .iter()
            .max_by(|&&a, &&b| {
                dependent_count[a]
                    .cmp(&dependent_count[b])
                    .then(original_in_degree[a].cmp(&original_in_degree[b]))
                    .then(analyzed[a].n_forms.cmp(&analyzed[b].n_forms))
                    .then(b.cmp(&a)) // smaller original index wins ties
            })
            .expect("pool is non-empty while remaining is non-empty");

        order.push(best);
        remaining.retain(|&i| i != best);
        for &j in &remaining {
            if analyzed[j].deps.contains(&analyzed[best].id) {
                in_degree[j] -= 1;
            }
        }
    }

    let mut schemas: Vec<Option<Value>> = analyzed.into_iter().map(|a| Some(a.schema)).collect();
    Ok(order
        .into_iter()
        .map(|i| schemas[i].take().expect("each index sorted exactly once"))
        .collect())
}

fn analyze(schemas: Vec<Value>) -> Result<Vec<Analyzed>, SchemaError> {
    schemas
        .into_iter()
        .map(|schema| {
            if !schema.is_object() {
                return Err(SchemaError::NilSchema);
            }
            let id = instance::id(&schema).to_string();
            let deps = find_deps(&schema)?;
            let n_forms = count_form_properties(&schema);
            Ok(Analyzed {
                id,
                deps,
                n_forms,
                schema,
            })
        })
        .collect()
}

fn find_deps(schema: &Value) -> Result<HashSet<String>, SchemaError> {
    let refs = analyzer::analyze(schema)?;
    Ok(refs
        .into_iter()
        .filter(|r| !r.is_local())
        .map(|r| r.schema_uri().to_string())
        .collect())
}

fn count_form_properties(schema: &Value) -> usize {
    let pointer = Pointer::parse("/definitions/form/properties");
    match pointer.get(schema) {
        Some(Value::Object(map)) => map.len(),
        _ => 0,
    }
}
