use crate::simulated::SimulatedWarmer;
use clap::Subcommand;
use preheat_core::StrategyType;
use preheat_engine::{PreheatConfig, PreheatingService, PrometheusMetricsSink, StrategyRegistry};
use prometheus::{Encoder, Registry, TextEncoder};
use std::sync::Arc;
use std::time::Duration;

#[derive(Subcommand)]
pub enum Commands {
    /// Run the service with periodic preheating until ctrl-c
    Run {
        /// Override the schedule interval (in seconds)
        #[arg(long)]
        interval_secs: Option<u64>,

        /// Stop after this many seconds instead of waiting for ctrl-c
        #[arg(long)]
        duration_secs: Option<u64>,

        /// Print Prometheus metrics to stderr on exit
        #[arg(long)]
        metrics: bool,
    },

    /// Execute strategies once, in order, and print the results
    Once {
        /// Strategy types (startup, scheduled, adaptive, predictive, recovery)
        #[arg(required = true)]
        strategies: Vec<String>,
    },

    /// List the built-in strategies with their default parameters
    Strategies,
}

impl Commands {
    /// Schedule interval requested on the command line, if any
    pub fn interval_override(&self) -> Option<u64> {
        match self {
            Commands::Run { interval_secs, .. } => *interval_secs,
            _ => None,
        }
    }

    pub async fn execute(self, config: PreheatConfig, failure_rate: f64) -> eyre::Result<()> {
        match self {
            Commands::Run {
                duration_secs,
                metrics,
                ..
            } => run(config, failure_rate, duration_secs, metrics).await,
            Commands::Once { strategies } => once(config, failure_rate, strategies).await,
            Commands::Strategies => {
                let strategies = StrategyRegistry::with_defaults().snapshot();
                println!("{}", serde_json::to_string_pretty(&strategies)?);
                Ok(())
            }
        }
    }
}

async fn run(
    config: PreheatConfig,
    failure_rate: f64,
    duration_secs: Option<u64>,
    print_metrics: bool,
) -> eyre::Result<()> {
    let registry = Registry::new();
    let sink = Arc::new(PrometheusMetricsSink::init(&registry)?);
    let service = PreheatingService::builder(Arc::new(SimulatedWarmer::new(failure_rate)))
        .config(config)
        .metrics(sink)
        .start()?;

    match duration_secs {
        Some(secs) => {
            tokio::select! {
                _ = tokio::time::sleep(Duration::from_secs(secs)) => {}
                signal = tokio::signal::ctrl_c() => signal?,
            }
        }
        None => tokio::signal::ctrl_c().await?,
    }

    tracing::info!("shutting down preheating service");
    service.shutdown().await;

    let report = service.preheating_effect_report();
    println!("{}", serde_json::to_string_pretty(&report)?);

    if print_metrics {
        let mut buffer = Vec::new();
        TextEncoder::new().encode(&registry.gather(), &mut buffer)?;
        eprintln!("{}", String::from_utf8_lossy(&buffer));
    }

    Ok(())
}

async fn once(
    config: PreheatConfig,
    failure_rate: f64,
    strategies: Vec<String>,
) -> eyre::Result<()> {
    // on-demand only: no ticker and no startup run
    let config = PreheatConfig {
        enabled: false,
        ..config
    };
    let service = PreheatingService::builder(Arc::new(SimulatedWarmer::new(failure_rate)))
        .config(config)
        .start()?;

    for name in &strategies {
        let result = service
            .execute_intelligent_preheating(StrategyType::from(name.as_str()))
            .await;
        println!("{}", serde_json::to_string_pretty(&result)?);
    }

    service.shutdown().await;
    println!(
        "{}",
        serde_json::to_string_pretty(&service.preheating_effect_report())?
    );
    Ok(())
}
