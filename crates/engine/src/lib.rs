//! Adaptive cache preheating engine
//!
//! This crate proactively populates caches through named strategies and tunes
//! itself from what it observes:
//! - Load-aware strategy adjustment (timeout, concurrency, priority)
//! - Per-strategy effect statistics and improvement suggestions
//! - Bounded execution history
//! - Time-of-day prediction and hot-key warming
//! - Periodic and on-demand scheduling over a bounded queue
//! - Prometheus metrics
//!
//! The engine talks to the cache only through the [`CacheWarmer`] trait.

pub mod clock;
pub mod config;
pub mod dispatch;
pub mod executor;
pub mod history;
pub mod load;
pub mod metrics;
pub mod report;
pub mod scheduler;
pub mod service;
pub mod stats;
pub mod strategy;
pub mod suggestions;
pub mod warmer;

pub use clock::{Clock, FixedClock, SystemClock};
pub use config::{
    CliOverrides, ConfigSource, KeyPatterns, LoadedConfig, PredictiveRule, PreheatConfig,
    PreheatConfigLoader, WarmTarget,
};
pub use executor::{ExecutorBuilder, PreheatingExecutor};
pub use history::HistoryRecorder;
pub use load::{LoadEvaluator, SysinfoProbe, SystemProbe};
pub use metrics::{MetricsSink, NoopMetricsSink, PrometheusMetricsSink};
pub use report::{PreheatReport, ReportBuilder, StrategyEffect};
pub use scheduler::{PreheatScheduler, DROPPED_MESSAGE};
pub use service::{PreheatingService, ServiceBuilder};
pub use stats::{EffectStats, EffectStatsTracker};
pub use strategy::{Adjustment, StrategyAdjuster, StrategyRegistry};
pub use suggestions::SuggestionGenerator;
pub use warmer::{CacheWarmer, WarmOutcome};
