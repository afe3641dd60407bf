//! Per-strategy effect statistics
//!
//! Counters are atomics behind a get-or-create map, so recording never takes
//! a lock and concurrent executions of one type never lose an increment.

use dashmap::DashMap;
use preheat_core::StrategyType;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

#[derive(Debug, Default)]
struct EffectCounters {
    execution_count: AtomicU64,
    success_count: AtomicU64,
    total_duration_ms: AtomicU64,
    total_items: AtomicU64,
}

impl EffectCounters {
    fn record(&self, success: bool, duration_ms: u64, items: u64) {
        self.total_duration_ms.fetch_add(duration_ms, Ordering::SeqCst);
        self.total_items.fetch_add(items, Ordering::SeqCst);
        // executions before successes: readers load successes first, so
        // a snapshot never shows more successes than executions
        self.execution_count.fetch_add(1, Ordering::SeqCst);
        if success {
            self.success_count.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn snapshot(&self, strategy_type: &StrategyType) -> EffectStats {
        let success_count = self.success_count.load(Ordering::SeqCst);
        let execution_count = self.execution_count.load(Ordering::SeqCst);
        EffectStats {
            strategy_type: strategy_type.clone(),
            execution_count,
            success_count,
            total_duration_ms: self.total_duration_ms.load(Ordering::SeqCst),
            total_items: self.total_items.load(Ordering::SeqCst),
        }
    }
}

/// Point-in-time copy of a strategy's counters
///
/// Derived metrics are computed on demand and never stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EffectStats {
    pub strategy_type: StrategyType,
    pub execution_count: u64,
    pub success_count: u64,
    pub total_duration_ms: u64,
    pub total_items: u64,
}

impl EffectStats {
    /// Fraction of successful executions, 0.0 before the first execution
    pub fn success_rate(&self) -> f64 {
        if self.execution_count == 0 {
            0.0
        } else {
            self.success_count as f64 / self.execution_count as f64
        }
    }

    pub fn avg_duration_ms(&self) -> f64 {
        if self.execution_count == 0 {
            0.0
        } else {
            self.total_duration_ms as f64 / self.execution_count as f64
        }
    }

    pub fn avg_items(&self) -> f64 {
        if self.execution_count == 0 {
            0.0
        } else {
            self.total_items as f64 / self.execution_count as f64
        }
    }

    /// Items preheated per second, 0.0 when no time was measured
    pub fn efficiency(&self) -> f64 {
        let avg_duration_ms = self.avg_duration_ms();
        if avg_duration_ms == 0.0 {
            0.0
        } else {
            self.avg_items() / (avg_duration_ms / 1000.0)
        }
    }
}

/// Accumulates effect statistics keyed by strategy type
#[derive(Debug, Default)]
pub struct EffectStatsTracker {
    entries: DashMap<StrategyType, Arc<EffectCounters>>,
}

impl EffectStatsTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one execution and return the updated statistics
    pub fn record(
        &self,
        strategy_type: &StrategyType,
        success: bool,
        duration_ms: u64,
        items: u64,
    ) -> EffectStats {
        let counters = Arc::clone(
            self.entries
                .entry(strategy_type.clone())
                .or_default()
                .value(),
        );
        counters.record(success, duration_ms, items);
        counters.snapshot(strategy_type)
    }

    /// Statistics for a type, if it has ever executed
    pub fn get(&self, strategy_type: &StrategyType) -> Option<EffectStats> {
        self.entries
            .get(strategy_type)
            .map(|entry| entry.value().snapshot(strategy_type))
    }

    /// Statistics for every executed type, ordered by type
    pub fn all(&self) -> Vec<EffectStats> {
        let mut stats: Vec<_> = self
            .entries
            .iter()
            .map(|entry| entry.value().snapshot(entry.key()))
            .collect();
        stats.sort_by(|a, b| a.strategy_type.cmp(&b.strategy_type));
        stats
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
