//! Structural merger (component F): folds an ordered list of schema
//! instances into a single instance that is their structural union.

use serde_json::{Map, Value};

use crate::error::SchemaError;

/// Fields that never participate in conflict detection. At the top level
/// they are dropped entirely from the merged result (each input schema
/// keeps its own `$id`, after all); nested under a merged object they are
/// still copied in (last write wins) but never raise a conflict.
const IGNORABLE: &[&str] = &["title", "description", "$id", "$schema", "$comment"];

fn is_ignorable(field: &str) -> bool {
    IGNORABLE.contains(&field)
}

/// Merge `schemas` in order into a single instance, or fail with
/// `type-conflict`/`value-conflict` on the first incompatible field.
pub fn merge(schemas: &[Value]) -> Result<Value, SchemaError> {
    let mut result = Map::new();

    for schema in schemas {
        let obj = schema.as_object().ok_or(SchemaError::NilSchema)?;
        for (field, value) in obj {
            if is_ignorable(field) {
                continue;
            }
            merge_in(&mut result, field, value.clone())?;
        }
    }

    Ok(Value::Object(result))
}

fn merge_in(m: &mut Map<String, Value>, field: &str, value: Value) -> Result<(), SchemaError> {
    // A field that hasn't been set yet, or was set to `null`, never
    // conflicts with whatever comes next: `null` is a placeholder, not a
    // type commitment, so a later scalar/array/object simply overwrites it.
    let existing_is_null = m.get(field).map_or(true, Value::is_null);

    if existing_is_null {
        match &value {
            Value::Array(_) => {
                m.insert(field.to_string(), Value::Array(Vec::new()));
            }
            Value::Object(_) => {
                m.insert(field.to_string(), Value::Object(Map::new()));
            }
            _ => {}
        }
    } else if let Some(existing) = m.get(field) {
        if type_name(existing) != type_name(&value) {
            return Err(SchemaError::TypeConflict {
                field: field.to_string(),
                left: type_name(existing),
                right: type_name(&value),
            });
        }
    }

    match value {
        Value::Array(items) => {
            let arr = m
                .get_mut(field)
                .and_then(Value::as_array_mut)
                .expect("array placeholder inserted above");
            for item in items {
                if !arr.iter().any(|existing| existing == &item) {
                    arr.push(item);
                }
            }
        }
        Value::Object(nested) => {
            let existing = m
                .get_mut(field)
                .and_then(Value::as_object_mut)
                .expect("object placeholder inserted above");
            for (k, v) in nested {
                merge_in(existing, &k, v)?;
            }
        }
        scalar => {
            if !existing_is_null && !is_ignorable(field) {
                if let Some(existing) = m.get(field) {
                    if existing != &scalar {
                        return Err(SchemaError::ValueConflict {
                            field: field.to_string(),
                        });
                    }
                }
            }
            m.insert(field.to_string(), scalar);
        }
    }

    Ok(())
}

fn type_name(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
