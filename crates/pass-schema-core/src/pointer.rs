//! JSON Pointer (RFC 6901): an ordered sequence of unescaped path segments
//! addressing a location within a [`serde_json::Value`].

use std::fmt;

use serde_json::Value;

/// A JSON Pointer into a document: a sequence of object keys / decimal array
/// indices, already unescaped (`~1` → `/`, `~0` → `~`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Pointer(Vec<String>);

impl Pointer {
    /// The pointer to the document root.
    pub fn root() -> Self {
        Pointer(Vec::new())
    }

    /// Returns a new pointer with `segment` appended.
    pub fn push(&self, segment: impl Into<String>) -> Self {
        let mut segments = self.0.clone();
        segments.push(segment.into());
        Pointer(segments)
    }

    pub fn segments(&self) -> &[String] {
        &self.0
    }

    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    /// True if `self` is a strict descendant of `other` — i.e. `other` is a
    /// proper prefix of `self`.
    pub fn is_strict_descendant_of(&self, other: &Pointer) -> bool {
        self.0.len() > other.0.len() && self.0[..other.0.len()] == other.0[..]
    }

    /// Parse the standard slash-delimited text form (`/a/b~1c`, or `""` / `"/"`
    /// for the root).
    pub fn parse(text: &str) -> Self {
        let stripped = text.strip_prefix('#').unwrap_or(text);
        if stripped.is_empty() {
            return Pointer::root();
        }
        let mut iter = stripped.split('/');
        if stripped.starts_with('/') {
            iter.next();
        }
        Pointer(iter.map(unescape_segment).collect())
    }

    /// Read the value at this location, if it exists.
    pub fn get<'a>(&self, root: &'a Value) -> Option<&'a Value> {
        let mut current = root;
        for segment in &self.0 {
            current = index(current, segment)?;
        }
        Some(current)
    }

    /// Overwrite the value at this location. The location must already exist
    /// as a descendant of `root`; returns `false` if it does not.
    pub fn set(&self, root: &mut Value, value: Value) -> bool {
        let Some((last, parents)) = self.0.split_last() else {
            *root = value;
            return true;
        };

        let mut current = root;
        for segment in parents {
            match index_mut(current, segment) {
                Some(next) => current = next,
                None => return false,
            }
        }

        match current {
            Value::Object(map) => {
                if !map.contains_key(last) {
                    return false;
                }
                map.insert(last.clone(), value);
                true
            }
            Value::Array(arr) => match last.parse::<usize>() {
                Ok(i) if i < arr.len() => {
                    arr[i] = value;
                    true
                }
                _ => false,
            },
            _ => false,
        }
    }
}

impl fmt::Display for Pointer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for segment in &self.0 {
            write!(f, "/{}", escape_segment(segment))?;
        }
        Ok(())
    }
}

fn index<'a>(value: &'a Value, segment: &str) -> Option<&'a Value> {
    match value {
        Value::Object(map) => map.get(segment),
        Value::Array(arr) => arr.get(segment.parse::<usize>().ok()?),
        _ => None,
    }
}

fn index_mut<'a>(value: &'a mut Value, segment: &str) -> Option<&'a mut Value> {
    match value {
        Value::Object(map) => map.get_mut(segment),
        Value::Array(arr) => arr.get_mut(segment.parse::<usize>().ok()?),
        _ => None,
    }
}

fn escape_segment(segment: &str) -> String {
    if segment.contains('~') || segment.contains('/') {
        segment.replace('~', "~0").replace('/', "~1")
    } else {
        segment.to_string()
    }
}

fn unescape_segment(segment: &str) -> String {
    if segment.contains("~1") || segment.contains("~0") {
        segment.replace("~1", "/").replace("~0", "~")
    } else {
        segment.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn root_renders_empty() {
        assert_eq!(Pointer::root().to_string(), "");
    }

    #[test]
    fn push_and_display() {
        let p = Pointer::root().push("a").push("b");
        assert_eq!(p.to_string(), "/a/b");
    }

    #[test]
    fn escapes_tilde_and_slash() {
        let p = Pointer::root().push("a/b").push("c~d");
        assert_eq!(p.to_string(), "/a~1b/c~0d");
    }

    #[test]
    fn parse_round_trips() {
        let p = Pointer::parse("/a~1b/c~0d/0");
        assert_eq!(p.segments(), &["a/b", "c~d", "0"]);
        assert_eq!(p.to_string(), "/a~1b/c~0d/0");
    }

    #[test]
    fn parse_root_forms() {
        assert_eq!(Pointer::parse(""), Pointer::root());
        assert_eq!(Pointer::parse("#"), Pointer::root());
    }

    #[test]
    fn get_reads_nested_value() {
        let doc = json!({"a": {"b": [1, 2, 3]}});
        let p = Pointer::parse("/a/b/1");
        assert_eq!(p.get(&doc), Some(&json!(2)));
    }

    #[test]
    fn get_missing_returns_none() {
        let doc = json!({"a": 1});
        assert_eq!(Pointer::parse("/a/b").get(&doc), None);
    }

    #[test]
    fn set_overwrites_existing_location() {
        let mut doc = json!({"a": {"b": 1}});
        let ok = Pointer::parse("/a/b").set(&mut doc, json!(42));
        assert!(ok);
        assert_eq!(doc, json!({"a": {"b": 42}}));
    }

    #[test]
    fn set_fails_on_nonexistent_location() {
        let mut doc = json!({"a": {}});
        let ok = Pointer::parse("/a/b").set(&mut doc, json!(1));
        assert!(!ok);
    }

    #[test]
    fn strict_descendant_detection() {
        let parent = Pointer::parse("/a");
        let child = Pointer::parse("/a/b");
        assert!(child.is_strict_descendant_of(&parent));
        assert!(!parent.is_strict_descendant_of(&parent));
        assert!(!parent.is_strict_descendant_of(&child));
    }
}
