use std::time::Duration;

use coderag_api::{
    CodeRagApiClient, CodeRagApiConfig, CodeRagApiError, IngestRequest, RetrieveRequest,
};

fn body_json(request: &reqwest::Request) -> serde_json::Value {
    let bytes = request
        .body()
        .and_then(|body| body.as_bytes())
        .expect("request body should be buffered JSON");
    serde_json::from_slice(bytes).expect("request body should be valid JSON")
}

#[test]
fn ingest_request_posts_repo_url_to_ingest_endpoint() {
    let client = CodeRagApiClient::new(CodeRagApiConfig::new("http://localhost:8000/"))
        .expect("client");

    let request = client
        .build_ingest_request(&IngestRequest::new("https://github.com/acme/widgets"))
        .expect("build request")
        .build()
        .expect("request");

    assert_eq!(request.method(), "POST");
    assert_eq!(request.url().as_str(), "http://localhost:8000/api/ingest");
    assert_eq!(
        body_json(&request),
        serde_json::json!({ "repo_url": "https://github.com/acme/widgets" })
    );
    assert_eq!(
        request
            .headers()
            .get("content-type")
            .and_then(|value| value.to_str().ok()),
        Some("application/json")
    );
}

#[test]
fn retrieve_request_carries_session_and_query() {
    let client = CodeRagApiClient::new(
        CodeRagApiConfig::new("https://rag.example.com").with_timeout(Duration::from_secs(30)),
    )
    .expect("client");

    let request = client
        .build_retrieve_request(&RetrieveRequest::new(
            "11111111-1111-1111-1111-111111111111",
            "What does main.go do?",
        ))
        .expect("build request")
        .build()
        .expect("request");

    assert_eq!(request.url().as_str(), "https://rag.example.com/api/retreive");
    assert_eq!(
        body_json(&request),
        serde_json::json!({
            "session_id": "11111111-1111-1111-1111-111111111111",
            "query": "What does main.go do?",
        })
    );
}

#[test]
fn client_rejects_unparseable_or_non_http_base_url() {
    let unparseable = CodeRagApiClient::new(CodeRagApiConfig::new("not a url"));
    let ftp = CodeRagApiClient::new(CodeRagApiConfig::new("ftp://rag.example.com"));

    assert!(matches!(unparseable, Err(CodeRagApiError::InvalidBaseUrl(_))));
    assert!(matches!(ftp, Err(CodeRagApiError::InvalidBaseUrl(_))));
}
