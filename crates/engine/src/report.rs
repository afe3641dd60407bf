//! Effect report assembly

use crate::executor::PreheatingExecutor;
use crate::stats::EffectStats;
use crate::suggestions::SuggestionGenerator;
use preheat_core::{HistoryRecord, Strategy};
use serde::Serialize;
use std::collections::BTreeMap;

/// Snapshot of the engine's effectiveness
#[derive(Debug, Clone, Serialize)]
pub struct PreheatReport {
    pub total_executions: u64,
    pub current_system_load: u8,
    pub strategy_count: usize,
    pub history_count: usize,
    pub dropped_jobs: u64,
    /// Keyed by strategy type name; only types that have executed appear
    pub per_strategy: BTreeMap<String, StrategyEffect>,
    /// Most recent records, oldest first
    pub recent_history: Vec<HistoryRecord>,
}

/// Aggregated figures for one strategy type
#[derive(Debug, Clone, Serialize)]
pub struct StrategyEffect {
    pub success_rate: f64,
    pub avg_duration_ms: f64,
    pub avg_items: f64,
    pub execution_count: u64,
    pub total_items: u64,
    pub efficiency: f64,
    /// Current parameters, absent when the type was never registered
    pub strategy: Option<Strategy>,
    pub suggestions: Vec<String>,
}

impl StrategyEffect {
    fn from_stats(stats: &EffectStats, strategy: Option<Strategy>) -> Self {
        let efficiency = stats.efficiency();
        Self {
            success_rate: stats.success_rate(),
            avg_duration_ms: stats.avg_duration_ms(),
            avg_items: stats.avg_items(),
            execution_count: stats.execution_count,
            total_items: stats.total_items,
            efficiency,
            strategy,
            suggestions: SuggestionGenerator::generate(stats, efficiency),
        }
    }
}

/// Builds a [`PreheatReport`] from a live executor
pub struct ReportBuilder<'a> {
    executor: &'a PreheatingExecutor,
    recent: usize,
    dropped_jobs: u64,
}

impl<'a> ReportBuilder<'a> {
    pub fn new(executor: &'a PreheatingExecutor) -> Self {
        Self {
            executor,
            recent: preheat_core::DEFAULT_RECENT_HISTORY,
            dropped_jobs: 0,
        }
    }

    pub fn recent(mut self, recent: usize) -> Self {
        self.recent = recent;
        self
    }

    pub fn dropped_jobs(mut self, dropped_jobs: u64) -> Self {
        self.dropped_jobs = dropped_jobs;
        self
    }

    pub fn build(self) -> PreheatReport {
        let executor = self.executor;
        let registry = executor.registry();

        let per_strategy = executor
            .stats()
            .all()
            .iter()
            .map(|stats| {
                let strategy = registry.get(&stats.strategy_type);
                (
                    stats.strategy_type.to_string(),
                    StrategyEffect::from_stats(stats, strategy),
                )
            })
            .collect();

        PreheatReport {
            total_executions: executor.total_executions(),
            current_system_load: executor.current_load().value(),
            strategy_count: registry.len(),
            history_count: executor.history().len(),
            dropped_jobs: self.dropped_jobs,
            per_strategy,
            recent_history: executor.history().recent(self.recent),
        }
    }
}
