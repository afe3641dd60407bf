//! Public facade tying the executor, scheduler and report together

use crate::clock::Clock;
use crate::config::PreheatConfig;
use crate::executor::{ExecutorBuilder, PreheatingExecutor};
use crate::load::SystemProbe;
use crate::metrics::MetricsSink;
use crate::report::{PreheatReport, ReportBuilder};
use crate::scheduler::PreheatScheduler;
use crate::warmer::CacheWarmer;
use preheat_core::{Error, ExecutionResult, Result, Strategy, StrategyType};
use std::future::Future;
use std::sync::Arc;

/// Running preheating engine
///
/// ```no_run
/// # use std::sync::Arc;
/// # use preheat_engine::{PreheatingService, PreheatConfig, CacheWarmer};
/// # async fn demo(warmer: Arc<dyn CacheWarmer>) -> preheat_core::Result<()> {
/// let service = PreheatingService::builder(warmer)
///     .config(PreheatConfig::default())
///     .start()?;
///
/// let result = service
///     .execute_intelligent_preheating(preheat_core::StrategyType::Adaptive)
///     .await;
/// println!("{}", result.message);
///
/// service.shutdown().await;
/// # Ok(())
/// # }
/// ```
pub struct PreheatingService {
    config: PreheatConfig,
    executor: Arc<PreheatingExecutor>,
    scheduler: PreheatScheduler,
}

impl PreheatingService {
    pub fn builder(warmer: Arc<dyn CacheWarmer>) -> ServiceBuilder {
        ServiceBuilder::new(warmer)
    }

    /// Queue an execution of `strategy_type` and resolve with its result
    ///
    /// The job is enqueued before this returns, so dropping the future does
    /// not cancel the execution.
    pub fn execute_intelligent_preheating(
        &self,
        strategy_type: StrategyType,
    ) -> impl Future<Output = ExecutionResult> + Send + 'static {
        let submitted = self.scheduler.submit(strategy_type.clone());
        async move {
            match submitted {
                Ok(rx) => rx.await.unwrap_or_else(|_| {
                    ExecutionResult::failure(strategy_type, Error::QueueClosed.to_string(), 0, 0)
                }),
                Err(e) => ExecutionResult::failure(strategy_type, e.to_string(), 0, 0),
            }
        }
    }

    /// On-demand trigger of the configured scheduled strategy
    ///
    /// Fire-and-forget: the outcome is only logged.
    pub fn scheduled_intelligent_preheating(&self) {
        let strategy_type = self.config.scheduled_strategy.clone();
        if let Err(e) = self.scheduler.trigger(strategy_type.clone()) {
            tracing::warn!(
                strategy = %strategy_type,
                error = %e,
                "scheduled preheating not queued"
            );
        }
    }

    pub fn preheating_effect_report(&self) -> PreheatReport {
        ReportBuilder::new(&self.executor)
            .recent(self.config.recent_history)
            .dropped_jobs(self.scheduler.dropped_jobs())
            .build()
    }

    /// Current parameters of every registered strategy
    pub fn strategies(&self) -> Vec<Strategy> {
        self.executor.registry().snapshot()
    }

    /// Register an extra strategy; `false` when the type already exists
    pub fn register_strategy(&self, strategy: Strategy) -> bool {
        self.executor.registry().register(strategy)
    }

    pub fn executor(&self) -> &Arc<PreheatingExecutor> {
        &self.executor
    }

    pub fn config(&self) -> &PreheatConfig {
        &self.config
    }

    pub fn dropped_jobs(&self) -> u64 {
        self.scheduler.dropped_jobs()
    }

    pub async fn shutdown(&self) {
        self.scheduler.shutdown().await;
    }
}

/// Builder for [`PreheatingService`]
pub struct ServiceBuilder {
    config: PreheatConfig,
    executor: ExecutorBuilder,
}

impl ServiceBuilder {
    pub fn new(warmer: Arc<dyn CacheWarmer>) -> Self {
        Self {
            config: PreheatConfig::default(),
            executor: ExecutorBuilder::new(warmer),
        }
    }

    pub fn config(mut self, config: PreheatConfig) -> Self {
        self.config = config;
        self
    }

    pub fn metrics(mut self, metrics: Arc<dyn MetricsSink>) -> Self {
        self.executor = self.executor.metrics(metrics);
        self
    }

    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.executor = self.executor.clock(clock);
        self
    }

    pub fn probe(mut self, probe: Arc<dyn SystemProbe>) -> Self {
        self.executor = self.executor.probe(probe);
        self
    }

    /// Validate the configuration, spawn the workers and start scheduling
    ///
    /// Must be called from within a tokio runtime.
    pub fn start(self) -> Result<PreheatingService> {
        self.config.validate()?;

        let executor = Arc::new(self.executor.config(&self.config).build());
        let scheduler = PreheatScheduler::new(Arc::clone(&executor), &self.config);
        scheduler.start(self.config.enabled);

        if self.config.enabled && self.config.run_on_startup {
            scheduler.trigger(StrategyType::Startup)?;
        }

        tracing::info!(
            enabled = self.config.enabled,
            strategies = executor.registry().len(),
            "preheating service started"
        );

        Ok(PreheatingService {
            config: self.config,
            executor,
            scheduler,
        })
    }
}
