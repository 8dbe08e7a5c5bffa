//! Command line checker that watches the Fargufa listing and alerts when places open up.

mod app;
mod cli;

use std::io;
use std::process::ExitCode;

use chrono::Utc;
use clap::Parser;
use tracing::error;
use tracing_subscriber::EnvFilter;

use crate::cli::Cli;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            // Help and version go to stdout, usage errors to stderr.
            err.print().unwrap_or_default();
            return ExitCode::from(cli::startup_exit_status(&err));
        }
    };

    // Logs go to stderr; stdout carries status lines and the alert body.
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    let settings = cli.into_settings();
    let result = app::check(&settings, Utc::now(), &mut io::stdout().lock()).await;

    if let Err(err) = &result {
        error!("{}", app::fatal_message(err));
    }

    ExitCode::from(app::exit_status(&result))
}
