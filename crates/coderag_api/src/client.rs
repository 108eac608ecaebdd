use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::{Client, RequestBuilder, Url};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::config::CodeRagApiConfig;
use crate::error::{parse_error_detail, parse_error_message, CodeRagApiError};
use crate::headers::build_headers;
use crate::payload::{IngestRequest, IngestResponse, RetrieveRequest, RetrieveResponse};
use crate::url::{ingest_url, retrieve_url};

#[derive(Debug)]
pub struct CodeRagApiClient {
    http: Client,
    config: CodeRagApiConfig,
}

impl CodeRagApiClient {
    pub fn new(config: CodeRagApiConfig) -> Result<Self, CodeRagApiError> {
        let endpoint = ingest_url(&config.base_url);
        let parsed = Url::parse(&endpoint)
            .map_err(|error| CodeRagApiError::InvalidBaseUrl(format!("{endpoint}: {error}")))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(CodeRagApiError::InvalidBaseUrl(format!(
                "{endpoint}: unsupported scheme '{}'",
                parsed.scheme()
            )));
        }

        let mut builder = Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build().map_err(CodeRagApiError::from)?;
        Ok(Self { http, config })
    }

    pub fn config(&self) -> &CodeRagApiConfig {
        &self.config
    }

    pub fn ingest_endpoint(&self) -> String {
        ingest_url(&self.config.base_url)
    }

    pub fn retrieve_endpoint(&self) -> String {
        retrieve_url(&self.config.base_url)
    }

    pub fn build_headers(&self, user_agent: Option<&str>) -> Result<HeaderMap, CodeRagApiError> {
        let headers = build_headers(&self.config, user_agent)?;
        let mut out = HeaderMap::new();
        for (key, value) in headers {
            out.insert(
                HeaderName::from_bytes(key.as_bytes()).map_err(|_| {
                    CodeRagApiError::InvalidHeader(format!("invalid header key: {key}"))
                })?,
                HeaderValue::from_str(&value).map_err(|_| {
                    CodeRagApiError::InvalidHeader(format!("invalid header value for {key}"))
                })?,
            );
        }
        Ok(out)
    }

    pub fn build_ingest_request(
        &self,
        request: &IngestRequest,
    ) -> Result<RequestBuilder, CodeRagApiError> {
        let headers = self.build_headers(self.config.user_agent.as_deref())?;
        Ok(self
            .http
            .post(self.ingest_endpoint())
            .headers(headers)
            .json(request))
    }

    pub fn build_retrieve_request(
        &self,
        request: &RetrieveRequest,
    ) -> Result<RequestBuilder, CodeRagApiError> {
        let headers = self.build_headers(self.config.user_agent.as_deref())?;
        Ok(self
            .http
            .post(self.retrieve_endpoint())
            .headers(headers)
            .json(request))
    }

    /// Submits a repository for ingestion and decodes the response body.
    pub async fn ingest(&self, request: &IngestRequest) -> Result<IngestResponse, CodeRagApiError> {
        let builder = self.build_ingest_request(request)?;
        send_json(builder, "ingest").await
    }

    /// Asks a session-scoped question and decodes the response body.
    pub async fn retrieve(
        &self,
        request: &RetrieveRequest,
    ) -> Result<RetrieveResponse, CodeRagApiError> {
        let builder = self.build_retrieve_request(request)?;
        send_json(builder, "retrieve").await
    }
}

async fn send_json<T>(builder: RequestBuilder, endpoint: &'static str) -> Result<T, CodeRagApiError>
where
    T: DeserializeOwned,
{
    let response = builder.send().await?;
    let status = response.status();
    let body = response.text().await?;
    debug!(endpoint, status = status.as_u16(), bytes = body.len(), "response received");

    if !status.is_success() {
        return Err(match parse_error_detail(&body) {
            Some(detail) => CodeRagApiError::ServiceError(status, detail),
            None => CodeRagApiError::Status(status, parse_error_message(status, &body)),
        });
    }

    Ok(serde_json::from_str(&body)?)
}
