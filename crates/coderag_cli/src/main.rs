use std::io::{self, BufReader};

use anyhow::Context;
use clap::Parser;
use coderag::App;
use coderag_cli::config::Cli;
use coderag_cli::frontend::TerminalFrontend;
use coderag_cli::logging::init_file_logging;
use coderag_cli::providers::backend_for;
use coderag_cli::runtime::{spawn_line_reader, Runtime};
use tracing::info;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_file_logging(&cli.log_file)?;

    let backend = backend_for(&cli).context("failed to initialize backend")?;
    info!(
        provider = ?cli.provider,
        version = env!("CARGO_PKG_VERSION"),
        "starting coderag"
    );

    let app = App::with_timing(cli.progress_timing());
    let runtime = Runtime::new(backend, TerminalFrontend::new(io::stdout()));
    spawn_line_reader(BufReader::new(io::stdin()), runtime.sender())
        .context("failed to start input reader")?;

    runtime.run(app, cli.route.clone());
    Ok(())
}
