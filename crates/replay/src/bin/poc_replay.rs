use anyhow::{Context, Result};
use clap::Parser;
use poc_core::Config;
use poc_replay::{read_events, write_outputs, ReplayRunner};
use std::fs::File;
use std::io::{self, BufReader};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Replay a JSON-lines event stream through the POC moving average.
#[derive(Parser)]
#[command(version, about = "POC moving average replay")]
struct Cli {
    /// Configuration file (.toml or .json). Defaults are used when omitted.
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Event stream, one JSON event per line.
    #[arg(long, value_name = "FILE")]
    events: PathBuf,

    /// Emit every publication instead of the last one per primary bar.
    #[arg(long)]
    all: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => Config::from_file(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => Config::default(),
    };

    let file = File::open(&cli.events)
        .with_context(|| format!("opening events {}", cli.events.display()))?;
    let events = read_events(BufReader::new(file)).context("decoding events")?;

    let report = ReplayRunner::new(config).keep_all(cli.all).run(&events)?;

    write_outputs(io::stdout().lock(), &report.outputs).context("writing outputs")?;

    tracing::info!(
        outputs = report.outputs.len(),
        final_value = ?report.final_value,
        "done"
    );
    Ok(())
}
