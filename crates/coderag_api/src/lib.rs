//! Transport-only client primitives for the CodeRAG indexing service.
//!
//! This crate owns request building, response decoding, and HTTP error
//! mapping for the two JSON endpoints the client consumes (`/api/ingest` and
//! `/api/retreive`). It contains no session or screen logic and performs no
//! retries: every call is issued once and its outcome handed back verbatim.
//!
//! Status discriminators in response bodies are decoded but not judged here;
//! callers decide what a non-`success` status means.

pub mod client;
pub mod config;
pub mod error;
pub mod headers;
pub mod payload;
pub mod url;

pub use client::CodeRagApiClient;
pub use config::CodeRagApiConfig;
pub use error::CodeRagApiError;
pub use payload::{IngestRequest, IngestResponse, RetrieveRequest, RetrieveResponse};
pub use url::{ingest_url, normalize_base_url, retrieve_url};
pub use reqwest::StatusCode;
