//! Schema instance identity: a schema instance is a JSON object, identified
//! by the string value of its `$id` key (empty string if absent or
//! non-string).

use serde_json::Value;

pub const ID_KEY: &str = "$id";

/// The `$id` of a schema instance, or `""` if absent / not a string.
pub fn id(instance: &Value) -> &str {
    instance
        .get(ID_KEY)
        .and_then(Value::as_str)
        .unwrap_or_default()
}

/// Normalize a schema URI by stripping any fragment, matching the key form
/// used in a [`crate::store::SchemaMap`].
pub fn normalize_uri(uri: &str) -> &str {
    uri.split('#').next().unwrap_or(uri)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn id_present() {
        let v = json!({"$id": "http://x/a"});
        assert_eq!(id(&v), "http://x/a");
    }

    #[test]
    fn id_absent_is_empty() {
        let v = json!({"type": "object"});
        assert_eq!(id(&v), "");
    }

    #[test]
    fn id_non_string_is_empty() {
        let v = json!({"$id": 5});
        assert_eq!(id(&v), "");
    }

    #[test]
    fn normalize_strips_fragment() {
        assert_eq!(normalize_uri("http://x/a#/b"), "http://x/a");
        assert_eq!(normalize_uri("http://x/a"), "http://x/a");
    }
}
