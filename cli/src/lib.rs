//! HTTP service and CLI for the PASS schema assembly service.
//!
//! This crate is a thin transport layer over `pass-schema-core`: it parses
//! requests, fetches PASS entities over HTTP, and serves the result.

pub mod cli;
pub mod error;
pub mod fetch;
pub mod request;
pub mod server;
pub mod service;
