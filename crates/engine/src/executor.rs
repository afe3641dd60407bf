//! Orchestration of a single preheating execution
//!
//! evaluate load -> adjust strategy -> dispatch routine -> record outcome.
//! The executor never fails its caller: every error ends up in a
//! failure-shaped [`ExecutionResult`] plus a log line.

use crate::clock::{Clock, SystemClock};
use crate::config::{KeyPatterns, PredictiveRule, PreheatConfig};
use crate::dispatch::{self, Progress, WarmingContext};
use crate::history::HistoryRecorder;
use crate::load::{LoadEvaluator, SysinfoProbe, SystemProbe};
use crate::metrics::{MetricsSink, NoopMetricsSink};
use crate::stats::{EffectStats, EffectStatsTracker};
use crate::strategy::{Adjustment, StrategyAdjuster, StrategyRegistry};
use crate::suggestions::SuggestionGenerator;
use crate::warmer::CacheWarmer;
use futures::FutureExt;
use preheat_core::{Error, ExecutionResult, HistoryRecord, LoadScore, Strategy, StrategyType};
use preheat_utils::tracing as events;
use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::time::Instant;
use tracing::Instrument;

/// Runs preheating strategies against a cache-warming collaborator
pub struct PreheatingExecutor {
    registry: StrategyRegistry,
    evaluator: LoadEvaluator,
    adjuster: StrategyAdjuster,
    stats: EffectStatsTracker,
    history: HistoryRecorder,
    warmer: Arc<dyn CacheWarmer>,
    metrics: Arc<dyn MetricsSink>,
    clock: Arc<dyn Clock>,
    key_patterns: KeyPatterns,
    predictive_rules: Vec<PredictiveRule>,
    total_executions: AtomicU64,
}

impl PreheatingExecutor {
    /// Start building an executor around `warmer`
    pub fn builder(warmer: Arc<dyn CacheWarmer>) -> ExecutorBuilder {
        ExecutorBuilder::new(warmer)
    }

    /// Execute one strategy and record the outcome
    pub async fn execute(&self, strategy_type: &StrategyType) -> ExecutionResult {
        let span = events::preheat_span(strategy_type.as_str());
        self.execute_inner(strategy_type).instrument(span).await
    }

    async fn execute_inner(&self, strategy_type: &StrategyType) -> ExecutionResult {
        let mut load = LoadScore::NEUTRAL;
        let mut adjustment = Adjustment::default();
        let previous = self.stats.get(strategy_type);
        let adjusted = self.registry.update(strategy_type, |strategy| {
            load = self.current_load();
            adjustment = self.adjuster.adjust(strategy, load, previous.as_ref());
        });
        let Some(strategy) = adjusted else {
            let err = Error::StrategyNotFound {
                strategy: strategy_type.to_string(),
            };
            tracing::warn!(error = %err, "skipping preheating");
            return ExecutionResult::failure(strategy_type.clone(), err.to_string(), 0, 0);
        };

        if !adjustment.is_noop() {
            tracing::debug!(
                load = load.value(),
                ?adjustment,
                timeout_ms = strategy.timeout.as_millis() as u64,
                concurrency = strategy.concurrency_level,
                high_priority = strategy.high_priority,
                "adjusted strategy"
            );
        }

        events::preheat_started(
            strategy_type.as_str(),
            load.value(),
            strategy.concurrency_level,
            strategy.timeout.as_millis() as u64,
        );

        let progress = Progress::default();
        let ctx = WarmingContext {
            warmer: self.warmer.as_ref(),
            key_patterns: &self.key_patterns,
            predictive_rules: &self.predictive_rules,
            hour: self.clock.current_hour(),
            progress: &progress,
        };

        let started = Instant::now();
        let routine = AssertUnwindSafe(dispatch::run(&strategy, &ctx)).catch_unwind();
        let outcome = match tokio::time::timeout(strategy.timeout, routine).await {
            Ok(Ok(outcome)) => outcome,
            Ok(Err(payload)) => Err(Error::warming(
                format!("{strategy_type} preheating"),
                format!("routine panicked: {}", panic_message(payload.as_ref())),
            )),
            Err(_) => Err(Error::Timeout {
                operation: format!("{strategy_type} preheating"),
                duration: strategy.timeout,
            }),
        };
        let duration_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
        let items = progress.items();

        let result = match outcome {
            Ok(()) => ExecutionResult::success(
                strategy_type.clone(),
                format!("{} completed: {items} items preheated", strategy.name),
                duration_ms,
                items,
            ),
            Err(e) => {
                tracing::debug!(
                    kind = e.kind_label(),
                    transient = e.is_transient(),
                    "preheating routine failed"
                );
                ExecutionResult::failure(strategy_type.clone(), e.to_string(), duration_ms, items)
            }
        };

        self.record(&strategy, load, &result);
        result
    }

    fn record(&self, strategy: &Strategy, load: LoadScore, result: &ExecutionResult) {
        self.total_executions.fetch_add(1, Ordering::SeqCst);

        self.history.append(HistoryRecord {
            strategy_type: strategy.strategy_type.clone(),
            name: strategy.name.clone(),
            timestamp: self.clock.now(),
            success: result.success,
            duration_ms: result.duration_ms,
            items: result.preheated_items,
            system_load: load,
        });

        let stats = self.stats.record(
            &strategy.strategy_type,
            result.success,
            result.duration_ms,
            result.preheated_items,
        );

        SuggestionGenerator::evaluate(&stats);
        self.emit_metrics(&stats, result.success);

        events::preheat_completed(
            strategy.strategy_type.as_str(),
            result.duration_ms,
            result.preheated_items,
            result.success,
            &result.message,
        );
    }

    fn emit_metrics(&self, stats: &EffectStats, success: bool) {
        let strategy = &stats.strategy_type;
        let outcomes = [
            self.metrics.record_effectiveness(strategy, stats.success_rate()),
            self.metrics.record_efficiency(strategy, stats.efficiency()),
            self.metrics.record_execution(strategy, success),
        ];
        for outcome in outcomes {
            if let Err(e) = outcome {
                tracing::warn!(strategy = %strategy, error = %e, "metrics sink rejected update");
            }
        }
    }

    /// Load score as the next execution would see it
    pub fn current_load(&self) -> LoadScore {
        self.evaluator.evaluate(self.total_executions())
    }

    pub fn total_executions(&self) -> u64 {
        self.total_executions.load(Ordering::SeqCst)
    }

    pub fn registry(&self) -> &StrategyRegistry {
        &self.registry
    }

    pub fn stats(&self) -> &EffectStatsTracker {
        &self.stats
    }

    pub fn history(&self) -> &HistoryRecorder {
        &self.history
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message
    } else {
        "unknown panic"
    }
}

/// Builder for [`PreheatingExecutor`]
pub struct ExecutorBuilder {
    warmer: Arc<dyn CacheWarmer>,
    metrics: Arc<dyn MetricsSink>,
    clock: Arc<dyn Clock>,
    probe: Option<Arc<dyn SystemProbe>>,
    adjuster: StrategyAdjuster,
    registry: Option<StrategyRegistry>,
    config: PreheatConfig,
}

impl ExecutorBuilder {
    pub fn new(warmer: Arc<dyn CacheWarmer>) -> Self {
        Self {
            warmer,
            metrics: Arc::new(NoopMetricsSink),
            clock: Arc::new(SystemClock),
            probe: None,
            adjuster: StrategyAdjuster::default(),
            registry: None,
            config: PreheatConfig::default(),
        }
    }

    /// Take key patterns, predictive rules and history bounds from `config`
    pub fn config(mut self, config: &PreheatConfig) -> Self {
        self.config = config.clone();
        self
    }

    pub fn metrics(mut self, metrics: Arc<dyn MetricsSink>) -> Self {
        self.metrics = metrics;
        self
    }

    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn probe(mut self, probe: Arc<dyn SystemProbe>) -> Self {
        self.probe = Some(probe);
        self
    }

    pub fn adjuster(mut self, adjuster: StrategyAdjuster) -> Self {
        self.adjuster = adjuster;
        self
    }

    /// Use a pre-populated registry instead of the five defaults
    pub fn registry(mut self, registry: StrategyRegistry) -> Self {
        self.registry = Some(registry);
        self
    }

    pub fn build(self) -> PreheatingExecutor {
        let probe = self
            .probe
            .unwrap_or_else(|| Arc::new(SysinfoProbe::new()) as Arc<dyn SystemProbe>);

        PreheatingExecutor {
            registry: self.registry.unwrap_or_else(StrategyRegistry::with_defaults),
            evaluator: LoadEvaluator::new(probe),
            adjuster: self.adjuster,
            stats: EffectStatsTracker::new(),
            history: HistoryRecorder::new(self.config.history_max, self.config.history_trim),
            warmer: self.warmer,
            metrics: self.metrics,
            clock: self.clock,
            key_patterns: self.config.key_patterns,
            predictive_rules: self.config.predictive_rules,
            total_executions: AtomicU64::new(0),
        }
    }
}
