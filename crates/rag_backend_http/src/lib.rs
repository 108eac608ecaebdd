//! HTTP-backed implementation of the shared `rag_backend` contract.
//!
//! This adapter drives `coderag_api` transport calls to completion and
//! translates their results into provider-neutral `BackendError` values
//! expected by `coderag`.

use std::sync::Arc;
use std::time::Duration;

use coderag_api::{
    CodeRagApiClient, CodeRagApiConfig, CodeRagApiError, IngestResponse, RetrieveResponse,
};
use rag_backend::{
    ensure_success, BackendError, BackendProfile, IngestReceipt, IngestRequest,
    ProviderInitError, RagBackend, RetrieveAnswer, RetrieveRequest,
};
use tracing::{debug, warn};

/// Stable provider identifier used by `coderag_cli` startup selection.
pub const HTTP_PROVIDER_ID: &str = "http";

/// Runtime configuration for the HTTP backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpBackendConfig {
    pub base_url: String,
    pub user_agent: Option<String>,
    pub timeout: Option<Duration>,
}

impl HttpBackendConfig {
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            user_agent: None,
            timeout: None,
        }
    }

    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    fn into_api_config(self) -> CodeRagApiConfig {
        let mut config = CodeRagApiConfig::new(self.base_url);

        if let Some(user_agent) = self.user_agent {
            config = config.with_user_agent(user_agent);
        }

        if let Some(timeout) = self.timeout {
            config = config.with_timeout(timeout);
        }

        config
    }
}

trait ApiTransport: Send + Sync {
    fn ingest(
        &self,
        request: &coderag_api::IngestRequest,
    ) -> Result<IngestResponse, CodeRagApiError>;

    fn retrieve(
        &self,
        request: &coderag_api::RetrieveRequest,
    ) -> Result<RetrieveResponse, CodeRagApiError>;
}

#[derive(Debug)]
struct DefaultTransport {
    client: CodeRagApiClient,
}

impl DefaultTransport {
    fn runtime() -> Result<tokio::runtime::Runtime, CodeRagApiError> {
        tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|error| {
                CodeRagApiError::Runtime(format!("failed to initialize tokio runtime: {error}"))
            })
    }
}

impl ApiTransport for DefaultTransport {
    fn ingest(
        &self,
        request: &coderag_api::IngestRequest,
    ) -> Result<IngestResponse, CodeRagApiError> {
        let runtime = Self::runtime()?;
        runtime.block_on(self.client.ingest(request))
    }

    fn retrieve(
        &self,
        request: &coderag_api::RetrieveRequest,
    ) -> Result<RetrieveResponse, CodeRagApiError> {
        let runtime = Self::runtime()?;
        runtime.block_on(self.client.retrieve(request))
    }
}

/// `RagBackend` adapter backed by `coderag_api` transport primitives.
pub struct HttpBackend {
    endpoint: String,
    transport: Arc<dyn ApiTransport>,
}

impl HttpBackend {
    /// Creates a backend using real HTTP transport.
    pub fn new(config: HttpBackendConfig) -> Result<Self, ProviderInitError> {
        let client = CodeRagApiClient::new(config.into_api_config()).map_err(map_init_error)?;
        let endpoint = client.config().base_url.clone();

        Ok(Self {
            endpoint,
            transport: Arc::new(DefaultTransport { client }),
        })
    }

    #[cfg(test)]
    fn with_transport_for_tests(endpoint: &str, transport: Arc<dyn ApiTransport>) -> Self {
        Self {
            endpoint: endpoint.to_string(),
            transport,
        }
    }
}

impl RagBackend for HttpBackend {
    fn profile(&self) -> BackendProfile {
        BackendProfile {
            provider_id: HTTP_PROVIDER_ID.to_string(),
            endpoint: Some(self.endpoint.clone()),
        }
    }

    fn ingest(&self, req: IngestRequest) -> Result<IngestReceipt, BackendError> {
        let request_id = req.request_id;
        let response = self
            .transport
            .ingest(&coderag_api::IngestRequest::new(req.repo_url))
            .map_err(|error| map_request_error(request_id, error))?;

        ensure_success(&response.status, response.detail.clone())?;
        let session_id = response
            .require_session_id()
            .map_err(|error| map_request_error(request_id, error))?
            .to_string();

        debug!(request_id, "ingest succeeded");
        Ok(IngestReceipt {
            session_id,
            detail: response.detail,
        })
    }

    fn retrieve(&self, req: RetrieveRequest) -> Result<RetrieveAnswer, BackendError> {
        let request_id = req.request_id;
        let response = self
            .transport
            .retrieve(&coderag_api::RetrieveRequest::new(req.session_id, req.query))
            .map_err(|error| map_request_error(request_id, error))?;

        ensure_success(&response.status, response.detail.clone())?;
        let text = response
            .require_answer()
            .map_err(|error| map_request_error(request_id, error))?
            .to_string();

        debug!(request_id, bytes = text.len(), "retrieve succeeded");
        Ok(RetrieveAnswer { text })
    }
}

fn map_request_error(request_id: u64, error: CodeRagApiError) -> BackendError {
    warn!(request_id, %error, "backend request failed");
    match error {
        CodeRagApiError::MissingField(field) => {
            BackendError::Malformed(format!("response is missing '{field}'"))
        }
        CodeRagApiError::ServiceError(status, detail) => BackendError::Status {
            code: status.as_u16(),
            detail,
        },
        CodeRagApiError::Status(status, message) => {
            BackendError::transport(format!("HTTP {}: {message}", status.as_u16()))
        }
        other => BackendError::transport(other.to_string()),
    }
}

fn map_init_error(error: CodeRagApiError) -> ProviderInitError {
    ProviderInitError::new(format!("Failed to initialize http backend: {error}"))
}
