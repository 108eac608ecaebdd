/// Default base URL for a locally running indexing service.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";
/// Path of the repository ingestion endpoint.
pub const INGEST_PATH: &str = "/api/ingest";
/// Path of the retrieval endpoint, spelled the way the service mounts it.
pub const RETRIEVE_PATH: &str = "/api/retreive";

/// Normalize a base URL to the service root.
///
/// Normalization rules:
/// 1) blank input falls back to [`DEFAULT_BASE_URL`]
/// 2) trailing slashes are removed
/// 3) a trailing `/api` segment is removed so endpoint paths are not doubled
pub fn normalize_base_url(input: &str) -> String {
    let base = if input.trim().is_empty() {
        DEFAULT_BASE_URL
    } else {
        input.trim()
    };

    let trimmed = base.trim_end_matches('/');
    trimmed
        .strip_suffix("/api")
        .unwrap_or(trimmed)
        .to_string()
}

pub fn ingest_url(base_url: &str) -> String {
    format!("{}{INGEST_PATH}", normalize_base_url(base_url))
}

pub fn retrieve_url(base_url: &str) -> String {
    format!("{}{RETRIEVE_PATH}", normalize_base_url(base_url))
}
