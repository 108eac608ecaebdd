use coderag_api::url::DEFAULT_BASE_URL;
use coderag_api::{ingest_url, normalize_base_url, retrieve_url};

#[test]
fn url_normalization_trims_trailing_slashes() {
    assert_eq!(
        normalize_base_url("https://rag.example.com///"),
        "https://rag.example.com"
    );
}

#[test]
fn url_normalization_drops_trailing_api_segment() {
    assert_eq!(
        ingest_url("https://rag.example.com/api/"),
        "https://rag.example.com/api/ingest"
    );
}

#[test]
fn url_normalization_falls_back_to_default_for_blank_input() {
    assert_eq!(normalize_base_url("   "), DEFAULT_BASE_URL);
}

#[test]
fn endpoints_use_served_paths() {
    assert_eq!(
        ingest_url("http://127.0.0.1:8000"),
        "http://127.0.0.1:8000/api/ingest"
    );
    assert_eq!(
        retrieve_url("http://127.0.0.1:8000"),
        "http://127.0.0.1:8000/api/retreive"
    );
}
