//! Assembles, dereferences, sorts, and merges JSON Schema documents.
//!
//! This crate is the transport-agnostic core of the PASS schema service: it
//! knows nothing about HTTP, only about `serde_json::Value` documents and
//! the `$id`/`$ref` conventions that relate them. The binary crate wires it
//! up to a request surface and an outbound fetcher.

pub mod analyzer;
pub mod dereference;
pub mod error;
pub mod instance;
pub mod merge;
pub mod pointer;
pub mod reference;
pub mod sort;
pub mod store;

pub use dereference::{dereference, SchemaFetcher};
pub use error::{ErrorCode, SchemaError};
pub use merge::merge;
pub use pointer::Pointer;
pub use reference::JsonReference;
pub use sort::sorted;
pub use store::SchemaMap;
