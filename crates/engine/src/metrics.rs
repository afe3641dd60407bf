//! Metrics sinks for strategy effectiveness
//!
//! Sinks are best-effort: the executor logs and swallows every error they
//! return.

use preheat_core::{Error, Result, StrategyType};
use prometheus::{GaugeVec, IntCounterVec, Opts, Registry};

/// Receives per-strategy effectiveness figures after each execution
pub trait MetricsSink: Send + Sync {
    /// Record the running success rate of a strategy
    fn record_effectiveness(&self, strategy: &StrategyType, success_rate: f64) -> Result<()>;

    /// Record the items-per-second efficiency of a strategy
    fn record_efficiency(&self, strategy: &StrategyType, value: f64) -> Result<()>;

    /// Count one finished execution
    fn record_execution(&self, _strategy: &StrategyType, _success: bool) -> Result<()> {
        Ok(())
    }
}

/// Sink that discards everything
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopMetricsSink;

impl MetricsSink for NoopMetricsSink {
    fn record_effectiveness(&self, _strategy: &StrategyType, _success_rate: f64) -> Result<()> {
        Ok(())
    }

    fn record_efficiency(&self, _strategy: &StrategyType, _value: f64) -> Result<()> {
        Ok(())
    }
}

/// Prometheus metrics for preheating strategies
pub struct PrometheusMetricsSink {
    /// Success rate per strategy
    effectiveness: GaugeVec,
    /// Items warmed per second per strategy
    efficiency: GaugeVec,
    /// Executions per strategy and result
    executions: IntCounterVec,
}

impl PrometheusMetricsSink {
    /// Initialize the metrics and register them on `registry`
    pub fn init(registry: &Registry) -> Result<Self> {
        let effectiveness = GaugeVec::new(
            Opts::new(
                "preheat_strategy_effectiveness",
                "Success rate of each preheating strategy",
            ),
            &["strategy"],
        )
        .map_err(metrics_error)?;
        registry
            .register(Box::new(effectiveness.clone()))
            .map_err(metrics_error)?;

        let efficiency = GaugeVec::new(
            Opts::new(
                "preheat_strategy_efficiency",
                "Items preheated per second by each strategy",
            ),
            &["strategy"],
        )
        .map_err(metrics_error)?;
        registry
            .register(Box::new(efficiency.clone()))
            .map_err(metrics_error)?;

        let executions = IntCounterVec::new(
            Opts::new(
                "preheat_executions_total",
                "Total number of preheating executions",
            ),
            &["strategy", "result"],
        )
        .map_err(metrics_error)?;
        registry
            .register(Box::new(executions.clone()))
            .map_err(metrics_error)?;

        Ok(Self {
            effectiveness,
            efficiency,
            executions,
        })
    }
}

impl MetricsSink for PrometheusMetricsSink {
    fn record_effectiveness(&self, strategy: &StrategyType, success_rate: f64) -> Result<()> {
        self.effectiveness
            .get_metric_with_label_values(&[strategy.as_str()])
            .map_err(metrics_error)?
            .set(success_rate);
        Ok(())
    }

    fn record_efficiency(&self, strategy: &StrategyType, value: f64) -> Result<()> {
        self.efficiency
            .get_metric_with_label_values(&[strategy.as_str()])
            .map_err(metrics_error)?
            .set(value);
        Ok(())
    }

    fn record_execution(&self, strategy: &StrategyType, success: bool) -> Result<()> {
        let result = if success { "success" } else { "failure" };
        self.executions
            .get_metric_with_label_values(&[strategy.as_str(), result])
            .map_err(metrics_error)?
            .inc();
        Ok(())
    }
}

fn metrics_error(e: prometheus::Error) -> Error {
    Error::Metrics {
        message: e.to_string(),
    }
}
