use clap::Parser;
use preheat_engine::{CliOverrides, PreheatConfigLoader};
use std::path::PathBuf;

mod commands;
mod simulated;

use commands::Commands;

#[derive(Parser)]
#[command(name = "preheat")]
#[command(about = "Adaptive cache preheating engine", long_about = None)]
#[command(version)]
struct Cli {
    /// Configuration file (defaults to $PREHEAT_CONFIG or the user config dir)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Fallback log filter when RUST_LOG is unset
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Probability that a simulated warming call fails
    #[arg(long, global = true, default_value_t = 0.0, value_parser = parse_rate)]
    failure_rate: f64,

    #[command(subcommand)]
    command: Commands,
}

fn parse_rate(value: &str) -> Result<f64, String> {
    let rate: f64 = value.parse().map_err(|e| format!("{e}"))?;
    if (0.0..=1.0).contains(&rate) {
        Ok(rate)
    } else {
        Err(format!("{rate} is not between 0 and 1"))
    }
}

#[tokio::main]
async fn main() -> eyre::Result<()> {
    color_eyre::install()?;

    // Parse command-line arguments
    let cli = Cli::parse();

    let loaded = match &cli.config {
        Some(path) => PreheatConfigLoader::load_from(path)?,
        None => PreheatConfigLoader::load()?,
    };
    let loaded = PreheatConfigLoader::apply_cli_args(
        loaded,
        CliOverrides {
            enabled: None,
            schedule_interval_secs: cli.command.interval_override(),
            log_level: cli.log_level.clone(),
        },
    )?;

    preheat_utils::tracing::init(&loaded.config.log_level)
        .map_err(|e| eyre::eyre!("failed to initialize logging: {e}"))?;
    tracing::debug!(source = ?loaded.source, "configuration loaded");

    cli.command.execute(loaded.config, cli.failure_rate).await
}
