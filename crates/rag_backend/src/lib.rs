//! Minimal provider-agnostic contract for the remote code-indexing service.
//!
//! This crate defines only the two calls the client issues (repository
//! ingestion and session-scoped retrieval) plus their completion events. It
//! excludes transport details, wire payloads, and screen orchestration.

use thiserror::Error;

/// Identifier for one outstanding backend request.
pub type RequestId = u64;

/// Literal status discriminator the service uses to mark a successful call.
pub const SUCCESS_STATUS: &str = "success";

/// Error returned while constructing/configuring a backend before any request.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ProviderInitError {
    message: String,
}

impl ProviderInitError {
    /// Creates a new backend initialization error.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// Returns the underlying error message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl From<String> for ProviderInitError {
    fn from(message: String) -> Self {
        Self::new(message)
    }
}

impl From<&str> for ProviderInitError {
    fn from(message: &str) -> Self {
        Self::new(message)
    }
}

/// Failure of a single backend request. Every variant is recoverable.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BackendError {
    /// The call never produced a usable response (unreachable, non-2xx, I/O).
    #[error("transport failure: {message}")]
    Transport { message: String },
    /// Non-2xx response whose body named the reason in a `detail` field.
    #[error("HTTP {code}: {detail}")]
    Status { code: u16, detail: String },
    /// Well-formed response whose status discriminator is not `success`.
    #[error("backend reported status '{status}'")]
    Rejected {
        status: String,
        detail: Option<String>,
    },
    /// Response body was missing a required field or could not be decoded.
    #[error("malformed response: {0}")]
    Malformed(String),
}

impl BackendError {
    /// Creates a transport failure.
    #[must_use]
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
        }
    }

    /// Returns the user-facing detail carried by the failure, if any.
    #[must_use]
    pub fn detail(&self) -> Option<&str> {
        match self {
            Self::Transport { message } => Some(message.as_str()),
            Self::Status { detail, .. } => Some(detail.as_str()),
            Self::Rejected { detail, .. } => detail.as_deref(),
            Self::Malformed(message) => Some(message.as_str()),
        }
    }

    /// Returns true when the failure happened below the application protocol.
    #[must_use]
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport { .. } | Self::Status { .. })
    }
}

/// Maps a response status discriminator onto success or [`BackendError::Rejected`].
pub fn ensure_success(status: &str, detail: Option<String>) -> Result<(), BackendError> {
    if status == SUCCESS_STATUS {
        return Ok(());
    }

    Err(BackendError::Rejected {
        status: status.to_string(),
        detail: detail.filter(|value| !value.trim().is_empty()),
    })
}

/// Input required to ingest one repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngestRequest {
    pub request_id: RequestId,
    pub repo_url: String,
}

/// Successful ingestion outcome carrying the server-minted session identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngestReceipt {
    pub session_id: String,
    pub detail: Option<String>,
}

/// Input required to ask one question against an ingested repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetrieveRequest {
    pub request_id: RequestId,
    pub session_id: String,
    pub query: String,
}

/// Successful answer text. Content is opaque (often markdown).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetrieveAnswer {
    pub text: String,
}

/// Completion event delivered back to the client for one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendEvent {
    Ingested {
        request_id: RequestId,
        outcome: Result<IngestReceipt, BackendError>,
    },
    Answered {
        request_id: RequestId,
        outcome: Result<RetrieveAnswer, BackendError>,
    },
}

impl BackendEvent {
    /// Returns the request identifier associated with this event.
    #[must_use]
    pub fn request_id(&self) -> RequestId {
        match self {
            Self::Ingested { request_id, .. } | Self::Answered { request_id, .. } => *request_id,
        }
    }

    /// Returns true when the request completed successfully.
    #[must_use]
    pub fn is_success(&self) -> bool {
        match self {
            Self::Ingested { outcome, .. } => outcome.is_ok(),
            Self::Answered { outcome, .. } => outcome.is_ok(),
        }
    }
}

/// Immutable metadata describing a backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendProfile {
    pub provider_id: String,
    pub endpoint: Option<String>,
}

/// Backend interface for the ingestion and retrieval calls.
///
/// Calls block the calling thread until the terminal response; callers run
/// them off the event loop. Implementations perform no retries.
pub trait RagBackend: Send + Sync + 'static {
    /// Returns provider identity metadata.
    fn profile(&self) -> BackendProfile;

    /// Submits a repository for ingestion.
    fn ingest(&self, req: IngestRequest) -> Result<IngestReceipt, BackendError>;

    /// Asks a question scoped to an ingested session.
    fn retrieve(&self, req: RetrieveRequest) -> Result<RetrieveAnswer, BackendError>;
}

#[cfg(test)]
mod tests {
    use super::{
        ensure_success, BackendError, BackendEvent, BackendProfile, IngestReceipt, IngestRequest,
        ProviderInitError, RagBackend, RetrieveAnswer, RetrieveRequest,
    };

    struct EchoBackend;

    impl RagBackend for EchoBackend {
        fn profile(&self) -> BackendProfile {
            BackendProfile {
                provider_id: "echo".to_string(),
                endpoint: None,
            }
        }

        fn ingest(&self, req: IngestRequest) -> Result<IngestReceipt, BackendError> {
            Ok(IngestReceipt {
                session_id: format!("session-{}", req.request_id),
                detail: None,
            })
        }

        fn retrieve(&self, req: RetrieveRequest) -> Result<RetrieveAnswer, BackendError> {
            Ok(RetrieveAnswer { text: req.query })
        }
    }

    #[test]
    fn ensure_success_accepts_only_literal_success_marker() {
        assert_eq!(ensure_success("success", None), Ok(()));
        assert_eq!(
            ensure_success("Success", Some("case matters".to_string())),
            Err(BackendError::Rejected {
                status: "Success".to_string(),
                detail: Some("case matters".to_string()),
            })
        );
    }

    #[test]
    fn ensure_success_drops_blank_detail() {
        let error = ensure_success("error", Some("   ".to_string()))
            .expect_err("non-success status must be rejected");

        assert_eq!(error.detail(), None);
    }

    #[test]
    fn backend_event_request_id_and_success_follow_outcome() {
        let ingested = BackendEvent::Ingested {
            request_id: 3,
            outcome: Err(BackendError::transport("connection refused")),
        };
        let answered = BackendEvent::Answered {
            request_id: 4,
            outcome: Ok(RetrieveAnswer {
                text: "It starts the server.".to_string(),
            }),
        };

        assert_eq!(ingested.request_id(), 3);
        assert!(!ingested.is_success());
        assert_eq!(answered.request_id(), 4);
        assert!(answered.is_success());
    }

    #[test]
    fn error_detail_and_transport_classification() {
        let transport = BackendError::transport("Server not reachable");
        assert!(transport.is_transport());
        assert_eq!(transport.detail(), Some("Server not reachable"));

        let malformed = BackendError::Malformed("missing session_id".to_string());
        assert!(!malformed.is_transport());
        assert_eq!(malformed.to_string(), "malformed response: missing session_id");
    }

    #[test]
    fn provider_init_error_preserves_message() {
        let error = ProviderInitError::new("missing server url");
        assert_eq!(error.message(), "missing server url");
        assert_eq!(error.to_string(), "missing server url");
    }

    #[test]
    fn trait_objects_serve_both_calls() {
        let backend: Box<dyn RagBackend> = Box::new(EchoBackend);

        let receipt = backend
            .ingest(IngestRequest {
                request_id: 9,
                repo_url: "https://github.com/acme/widgets".to_string(),
            })
            .expect("echo ingest succeeds");
        let answer = backend
            .retrieve(RetrieveRequest {
                request_id: 10,
                session_id: receipt.session_id.clone(),
                query: "ping".to_string(),
            })
            .expect("echo retrieve succeeds");

        assert_eq!(receipt.session_id, "session-9");
        assert_eq!(answer.text, "ping");
        assert_eq!(backend.profile().provider_id, "echo");
    }
}
