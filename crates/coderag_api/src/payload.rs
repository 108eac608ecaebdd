use serde::{Deserialize, Serialize};

use crate::error::CodeRagApiError;

/// Request body for the ingestion endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngestRequest {
    pub repo_url: String,
}

impl IngestRequest {
    pub fn new(repo_url: impl Into<String>) -> Self {
        Self {
            repo_url: repo_url.into(),
        }
    }
}

/// Response body of the ingestion endpoint. Unknown fields are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngestResponse {
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl IngestResponse {
    /// Returns the non-blank session identifier or [`CodeRagApiError::MissingField`].
    pub fn require_session_id(&self) -> Result<&str, CodeRagApiError> {
        self.session_id
            .as_deref()
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .ok_or(CodeRagApiError::MissingField("session_id"))
    }
}

/// Request body for the retrieval endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetrieveRequest {
    pub session_id: String,
    pub query: String,
}

impl RetrieveRequest {
    pub fn new(session_id: impl Into<String>, query: impl Into<String>) -> Self {
        Self {
            session_id: session_id.into(),
            query: query.into(),
        }
    }
}

/// Response body of the retrieval endpoint. Unknown fields are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetrieveResponse {
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub llm_response: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl RetrieveResponse {
    /// Returns the answer text or [`CodeRagApiError::MissingField`].
    ///
    /// An empty string is a valid answer; only an absent field is rejected.
    pub fn require_answer(&self) -> Result<&str, CodeRagApiError> {
        self.llm_response
            .as_deref()
            .ok_or(CodeRagApiError::MissingField("llm_response"))
    }
}
