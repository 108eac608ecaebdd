use std::sync::Arc;

use rag_backend::{ProviderInitError, RagBackend};
use rag_backend_http::{HttpBackend, HttpBackendConfig};
use rag_backend_mock::MockBackend;

use crate::config::{Cli, ProviderKind};

/// Builds the backend selected on the command line.
pub fn backend_for(cli: &Cli) -> Result<Arc<dyn RagBackend>, ProviderInitError> {
    match cli.provider {
        ProviderKind::Mock => Ok(Arc::new(MockBackend::default())),
        ProviderKind::Http => {
            let server_url = cli.server_url().ok_or_else(|| {
                ProviderInitError::new(
                    "The http provider requires --server-url or CODERAG_SERVER_URL",
                )
            })?;

            let mut config = HttpBackendConfig::new(server_url)
                .with_user_agent(format!("coderag-cli/{}", env!("CARGO_PKG_VERSION")));
            if let Some(timeout) = cli.timeout() {
                config = config.with_timeout(timeout);
            }

            Ok(Arc::new(HttpBackend::new(config)?))
        }
    }
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::*;

    fn cli(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("coderag").chain(args.iter().copied()))
            .expect("valid arguments")
    }

    #[test]
    fn mock_provider_resolves() {
        let backend = backend_for(&cli(&["--provider", "mock"])).expect("mock backend");
        assert_eq!(backend.profile().provider_id, "mock");
    }

    #[test]
    fn http_provider_requires_server_url() {
        let error = match backend_for(&cli(&["--provider", "http", "--server-url", " "])) {
            Ok(_) => panic!("http without a server url must fail"),
            Err(error) => error,
        };

        assert!(error.message().contains("--server-url"));
    }

    #[test]
    fn http_provider_reports_normalized_endpoint() {
        let backend = backend_for(&cli(&[
            "--provider",
            "http",
            "--server-url",
            "http://localhost:8000",
        ]))
        .expect("http backend");

        let profile = backend.profile();
        assert_eq!(profile.provider_id, "http");
        assert_eq!(profile.endpoint.as_deref(), Some("http://localhost:8000"));
    }
}
