//! Command-line and environment configuration.

use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, ValueEnum};
use coderag::{ProgressTiming, Route};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ProviderKind {
    /// Deterministic in-process backend
    Mock,
    /// Remote indexing service over HTTP
    Http,
}

#[derive(Debug, Clone, Parser)]
#[command(name = "coderag")]
#[command(about = "Chat with an indexed code repository", long_about = None)]
pub struct Cli {
    /// Backend used for ingestion and retrieval
    #[arg(long, value_enum, env = "CODERAG_PROVIDER", default_value = "mock")]
    pub provider: ProviderKind,

    /// Base URL of the indexing service (required for the http provider)
    #[arg(long, value_name = "URL", env = "CODERAG_SERVER_URL")]
    pub server_url: Option<String>,

    /// Request timeout in seconds; unset means no client-side timeout
    #[arg(
        long,
        value_name = "SECONDS",
        env = "CODERAG_TIMEOUT_SEC",
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub timeout_sec: Option<u64>,

    /// Interval between loading status updates
    #[arg(
        long,
        value_name = "MS",
        env = "CODERAG_PROGRESS_INTERVAL_MS",
        default_value_t = 3000,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub progress_interval_ms: u64,

    /// Interval between loading animation frames
    #[arg(
        long,
        value_name = "MS",
        env = "CODERAG_ASSET_INTERVAL_MS",
        default_value_t = 2500,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub asset_interval_ms: u64,

    /// File receiving diagnostic logs
    #[arg(
        long,
        value_name = "PATH",
        env = "CODERAG_LOG_FILE",
        default_value = "coderag.log"
    )]
    pub log_file: PathBuf,

    /// Start at `/` or `/chat/<session-id>`
    #[arg(value_name = "ROUTE")]
    pub route: Option<Route>,
}

impl Cli {
    pub fn progress_timing(&self) -> ProgressTiming {
        ProgressTiming {
            status_interval: Duration::from_millis(self.progress_interval_ms),
            asset_interval: Duration::from_millis(self.asset_interval_ms),
        }
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_sec.map(Duration::from_secs)
    }

    /// Server URL with surrounding whitespace removed; blank counts as unset.
    pub fn server_url(&self) -> Option<&str> {
        self.server_url
            .as_deref()
            .map(str::trim)
            .filter(|value| !value.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<Cli, clap::Error> {
        Cli::try_parse_from(std::iter::once("coderag").chain(args.iter().copied()))
    }

    #[test]
    fn explicit_flags_override_defaults() {
        let cli = parse(&[
            "--provider",
            "http",
            "--server-url",
            " http://localhost:8000 ",
            "--timeout-sec",
            "30",
            "--progress-interval-ms",
            "10",
            "--asset-interval-ms",
            "20",
            "--log-file",
            "/tmp/coderag-test.log",
            "/chat/11111111-1111-1111-1111-111111111111",
        ])
        .expect("valid arguments");

        assert_eq!(cli.provider, ProviderKind::Http);
        assert_eq!(cli.server_url(), Some("http://localhost:8000"));
        assert_eq!(cli.timeout(), Some(Duration::from_secs(30)));
        assert_eq!(
            cli.progress_timing(),
            ProgressTiming {
                status_interval: Duration::from_millis(10),
                asset_interval: Duration::from_millis(20),
            }
        );
        assert_eq!(cli.log_file, PathBuf::from("/tmp/coderag-test.log"));
        assert_eq!(
            cli.route,
            Some(Route::Chat("11111111-1111-1111-1111-111111111111".to_string()))
        );
    }

    #[test]
    fn zero_intervals_and_timeouts_are_rejected() {
        assert!(parse(&["--timeout-sec", "0"]).is_err());
        assert!(parse(&["--progress-interval-ms", "0"]).is_err());
        assert!(parse(&["--asset-interval-ms", "0"]).is_err());
    }

    #[test]
    fn malformed_route_is_rejected() {
        assert!(parse(&["/settings"]).is_err());
    }

    #[test]
    fn blank_server_url_counts_as_unset() {
        let cli = parse(&["--server-url", "   "]).expect("valid arguments");
        assert_eq!(cli.server_url(), None);
    }
}
