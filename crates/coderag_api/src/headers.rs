use std::collections::BTreeMap;

use crate::config::CodeRagApiConfig;
use crate::error::CodeRagApiError;

pub const HEADER_ACCEPT: &str = "accept";
pub const HEADER_CONTENT_TYPE: &str = "content-type";
pub const HEADER_USER_AGENT: &str = "user-agent";

const JSON_MIME: &str = "application/json";

/// Build a deterministic header map for service requests.
pub fn build_headers(
    config: &CodeRagApiConfig,
    user_agent: Option<&str>,
) -> Result<BTreeMap<String, String>, CodeRagApiError> {
    let mut headers = BTreeMap::new();

    headers.insert(HEADER_ACCEPT.to_owned(), JSON_MIME.to_owned());
    headers.insert(HEADER_CONTENT_TYPE.to_owned(), JSON_MIME.to_owned());

    let ua = match (user_agent, config.user_agent.as_deref()) {
        (Some(explicit), _) if !explicit.trim().is_empty() => explicit.trim().to_owned(),
        (None, Some(explicit)) if !explicit.trim().is_empty() => explicit.trim().to_owned(),
        _ => default_user_agent(),
    };
    headers.insert(HEADER_USER_AGENT.to_owned(), ua);

    for (key, value) in &config.extra_headers {
        let key = key.trim().to_ascii_lowercase();
        if key.is_empty() {
            return Err(CodeRagApiError::InvalidHeader(
                "header name must not be blank".to_owned(),
            ));
        }
        headers.insert(key, value.trim().to_owned());
    }

    Ok(headers)
}

fn default_user_agent() -> String {
    format!(
        "coderag/{} ({}; {})",
        env!("CARGO_PKG_VERSION"),
        std::env::consts::OS,
        std::env::consts::ARCH
    )
}
