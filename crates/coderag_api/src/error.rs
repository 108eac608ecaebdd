use std::fmt;

use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::Error as JsonError;

#[derive(Debug)]
pub enum CodeRagApiError {
    InvalidBaseUrl(String),
    InvalidHeader(String),
    Request(reqwest::Error),
    /// Non-2xx without a usable `detail`; carries the raw body or reason.
    Status(StatusCode, String),
    /// Non-2xx whose JSON body explained the failure in `detail`.
    ServiceError(StatusCode, String),
    Serde(JsonError),
    MissingField(&'static str),
    Runtime(String),
}

impl CodeRagApiError {
    /// Returns true when the failure happened before a decodable body arrived.
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            Self::InvalidBaseUrl(_)
                | Self::InvalidHeader(_)
                | Self::Request(_)
                | Self::Status(..)
                | Self::ServiceError(..)
                | Self::Runtime(_)
        )
    }
}

/// Error body shape produced by the service framework on non-2xx responses.
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorPayload {
    pub detail: Option<ErrorDetail>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum ErrorDetail {
    Text(String),
    Items(Vec<ErrorItem>),
}

#[derive(Debug, Deserialize)]
pub(crate) struct ErrorItem {
    pub msg: Option<String>,
    #[serde(default)]
    pub loc: Vec<serde_json::Value>,
}

impl ErrorItem {
    fn describe(&self) -> Option<String> {
        let message = self.msg.as_deref().and_then(non_empty_string)?;
        let location: Vec<String> = self
            .loc
            .iter()
            .map(|segment| match segment {
                serde_json::Value::String(value) => value.clone(),
                other => other.to_string(),
            })
            .collect();

        if location.is_empty() {
            Some(message.to_owned())
        } else {
            Some(format!("{} ({})", message, location.join(".")))
        }
    }
}

impl ErrorDetail {
    pub fn message(&self) -> Option<String> {
        match self {
            Self::Text(text) => non_empty_string(text).map(str::to_owned),
            Self::Items(items) => {
                let messages: Vec<String> = items.iter().filter_map(ErrorItem::describe).collect();
                if messages.is_empty() {
                    None
                } else {
                    Some(messages.join("; "))
                }
            }
        }
    }
}

impl fmt::Display for CodeRagApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidBaseUrl(value) => write!(f, "invalid base URL: {value}"),
            Self::InvalidHeader(message) => write!(f, "invalid header: {message}"),
            Self::Request(error) => write!(f, "request error: {error}"),
            Self::Status(status, message) => write!(f, "HTTP {status} {message}"),
            Self::ServiceError(status, detail) => write!(f, "HTTP {status}: {detail}"),
            Self::Serde(error) => write!(f, "serialization error: {error}"),
            Self::MissingField(field) => write!(f, "response is missing '{field}'"),
            Self::Runtime(message) => write!(f, "runtime error: {message}"),
        }
    }
}

impl std::error::Error for CodeRagApiError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Request(error) => Some(error),
            Self::Serde(error) => Some(error),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for CodeRagApiError {
    fn from(error: reqwest::Error) -> Self {
        Self::Request(error)
    }
}

impl From<JsonError> for CodeRagApiError {
    fn from(error: JsonError) -> Self {
        Self::Serde(error)
    }
}

/// Returns the JSON `detail` of an error body, when it has a non-empty one.
pub fn parse_error_detail(body: &str) -> Option<String> {
    serde_json::from_str::<ErrorPayload>(body)
        .ok()?
        .detail
        .as_ref()
        .and_then(ErrorDetail::message)
}

/// Extracts a human-readable message from a non-2xx response body.
pub fn parse_error_message(status: StatusCode, body: &str) -> String {
    if let Some(message) = parse_error_detail(body) {
        return message;
    }

    if body.trim().is_empty() {
        status
            .canonical_reason()
            .unwrap_or("request failed")
            .to_string()
    } else {
        body.trim().to_string()
    }
}

fn non_empty_string(value: &str) -> Option<&str> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed)
    }
}
