//! Suicide Stats - command line entry point.

use anyhow::Result;
use clap::Parser;
use suicide_stats::cli::Cli;
use tracing::{error, info};
use tracing_subscriber::{fmt, EnvFilter};

fn main() {
    // Logs go to stderr; stdout carries the summary tables.
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder()
        .with_env_filter(env)
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run() {
        error!("{e:#}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    let config = cli.resolve()?;
    info!(input = %config.input_path.display(), "startup");

    let report = suicide_stats::run(&config)?;
    info!(
        rows = report.rows_after_cleaning(),
        duplicates = report.duplicates_removed,
        charts = report.charts.len(),
        "done"
    );
    Ok(())
}
