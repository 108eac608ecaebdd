use coderag_api::headers::{build_headers, HEADER_ACCEPT, HEADER_CONTENT_TYPE, HEADER_USER_AGENT};
use coderag_api::{CodeRagApiConfig, CodeRagApiError};

#[test]
fn header_map_contains_json_headers_and_extras() {
    let config = CodeRagApiConfig::new("http://localhost:8000").insert_header(" X-Trace ", " abc ");

    let headers = build_headers(&config, None).expect("header construction");

    assert_eq!(headers.get(HEADER_ACCEPT).map(String::as_str), Some("application/json"));
    assert_eq!(
        headers.get(HEADER_CONTENT_TYPE).map(String::as_str),
        Some("application/json")
    );
    assert_eq!(headers.get("x-trace").map(String::as_str), Some("abc"));
    assert!(headers
        .get(HEADER_USER_AGENT)
        .expect("default user agent")
        .starts_with("coderag/"));
}

#[test]
fn explicit_user_agent_wins_over_config() {
    let config = CodeRagApiConfig::default().with_user_agent("from-config");

    let from_config = build_headers(&config, None).expect("headers");
    let explicit = build_headers(&config, Some("explicit")).expect("headers");

    assert_eq!(from_config.get(HEADER_USER_AGENT).map(String::as_str), Some("from-config"));
    assert_eq!(explicit.get(HEADER_USER_AGENT).map(String::as_str), Some("explicit"));
}

#[test]
fn blank_extra_header_name_is_rejected() {
    let config = CodeRagApiConfig::default().insert_header("  ", "value");

    let error = build_headers(&config, None).expect_err("blank header name must fail");
    assert!(matches!(error, CodeRagApiError::InvalidHeader(_)));
}
