//! Parsed JSON References: a `$ref` string split into an absolute URL
//! (possibly empty) and a fragment (possibly empty), per spec.md §3.

use url::Url;

/// A parsed `$ref` string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JsonReference {
    /// The URL the reference points at, minus its fragment. Empty for
    /// fragment-only references (local to the owning document).
    pub url: String,
    /// The fragment (JSON Pointer text form), without its leading `#`.
    pub fragment: String,
}

impl JsonReference {
    /// Fragment-only: `#/a/b`.
    pub fn is_fragment_only(&self) -> bool {
        self.url.is_empty()
    }

    /// Path-only, relative: `foo.json` or `foo.json#/a/b` — has a path but
    /// no scheme/host, and is not fragment-only.
    pub fn is_path_only(&self) -> bool {
        !self.url.is_empty() && Url::parse(&self.url).is_err()
    }

    /// Full URL: `http://host/foo.json#/a/b`.
    pub fn is_full_url(&self) -> bool {
        !self.url.is_empty() && Url::parse(&self.url).is_ok()
    }

    /// Render back to the standard `url#fragment` text form.
    pub fn to_ref_string(&self) -> String {
        format!("{}#{}", self.url, self.fragment)
    }
}

/// Parse a `$ref` string into a [`JsonReference`]. Splits on the first `#`;
/// everything before is the URL part, everything after is the fragment.
/// Never fails on its own — malformedness is only meaningful once resolution
/// against a base URI is attempted (see `analyzer::resolve_ref`).
pub fn parse(ref_string: &str) -> JsonReference {
    match ref_string.split_once('#') {
        Some((url, fragment)) => JsonReference {
            url: url.to_string(),
            fragment: fragment.to_string(),
        },
        None => JsonReference {
            url: ref_string.to_string(),
            fragment: String::new(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fragment_only() {
        let r = parse("#/a/b");
        assert!(r.is_fragment_only());
        assert_eq!(r.fragment, "/a/b");
    }

    #[test]
    fn path_only_no_fragment() {
        let r = parse("foo.json");
        assert!(r.is_path_only());
        assert_eq!(r.url, "foo.json");
        assert_eq!(r.fragment, "");
    }

    #[test]
    fn path_only_with_fragment() {
        let r = parse("foo.json#/a/b");
        assert!(r.is_path_only());
        assert_eq!(r.url, "foo.json");
        assert_eq!(r.fragment, "/a/b");
    }

    #[test]
    fn full_url() {
        let r = parse("http://example.org/foo.json#/a/b");
        assert!(r.is_full_url());
        assert_eq!(r.url, "http://example.org/foo.json");
        assert_eq!(r.fragment, "/a/b");
    }

    #[test]
    fn to_ref_string_round_trips() {
        let r = parse("http://example.org/foo.json#/a/b");
        assert_eq!(r.to_ref_string(), "http://example.org/foo.json#/a/b");
    }
}
