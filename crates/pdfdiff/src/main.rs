mod cli;
mod commands;
mod compare;
mod config;
mod error;
mod geometry;
mod pdf;
mod report;

use std::process::ExitCode;

use clap::Parser;
use config::ResolvedRunConfig;
use error::{EXIT_DIFFERENT, EXIT_USAGE};
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("pdfdiff=info")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let (file1, file2, overrides) = cli::Cli::parse().into_parts();

    let config = match ResolvedRunConfig::new(overrides) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {e:#}");
            return ExitCode::from(EXIT_USAGE);
        }
    };

    match commands::compare(&file1, &file2, &config) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(EXIT_DIFFERENT),
        Err(e) => {
            let code = e.exit_code();
            eprintln!("{:#}", anyhow::Error::from(e));
            ExitCode::from(code)
        }
    }
}
