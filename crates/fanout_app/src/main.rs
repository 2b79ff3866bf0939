mod cli;
mod logging;

use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use fanout_core::RunSummary;
use fanout_engine::{run_file, LogProgressSink, OpenAiCompatibleClient};
use fanout_logging::{fanout_error, fanout_info};

use crate::cli::Cli;

fn main() -> ExitCode {
    // A missing .env is fine; flags and the real environment still apply.
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();
    logging::initialize(cli.log_level.into(), cli.log_file.as_deref());

    match run(&cli) {
        Ok(_) => ExitCode::SUCCESS,
        Err(err) => {
            fanout_error!("{:#}", err);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> anyhow::Result<RunSummary> {
    let client = OpenAiCompatibleClient::new(cli.completion_settings())
        .context("failed to set up completion client")?;
    let config = cli.run_config();
    fanout_info!(
        "Processing {:?} -> {:?} with model {} via {}",
        cli.input,
        cli.output,
        client.model(),
        client.endpoint()
    );

    // One request in flight at a time; a current-thread runtime is enough.
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("failed to start async runtime")?;

    runtime
        .block_on(run_file(
            &cli.input,
            &cli.output,
            &client,
            &config,
            &LogProgressSink,
        ))
        .with_context(|| format!("batch run over {:?} failed", cli.input))
}
