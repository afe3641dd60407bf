//! System load evaluation
//!
//! The score combines memory pressure (up to 50 points), scarcity of
//! available parallelism (up to 25) and execution history (up to 25).

use parking_lot::Mutex;
use preheat_core::{Error, LoadScore, Result};
use std::sync::Arc;
use sysinfo::System;

/// Runtime metrics the evaluator reads
pub trait SystemProbe: Send + Sync {
    /// Fraction of memory in use, `0.0..=1.0`
    fn memory_used_ratio(&self) -> Result<f64>;

    /// Number of threads the process can run in parallel
    fn available_parallelism(&self) -> Result<usize>;
}

/// Probe backed by `sysinfo` and the standard library
pub struct SysinfoProbe {
    system: Mutex<System>,
}

impl SysinfoProbe {
    pub fn new() -> Self {
        Self {
            system: Mutex::new(System::new()),
        }
    }
}

impl Default for SysinfoProbe {
    fn default() -> Self {
        Self::new()
    }
}

impl SystemProbe for SysinfoProbe {
    fn memory_used_ratio(&self) -> Result<f64> {
        let mut system = self.system.lock();
        system.refresh_memory();

        let total_memory = system.total_memory();
        if total_memory == 0 {
            return Err(Error::LoadEvaluation {
                message: "total memory reported as zero".to_string(),
            });
        }

        Ok(system.used_memory() as f64 / total_memory as f64)
    }

    fn available_parallelism(&self) -> Result<usize> {
        std::thread::available_parallelism()
            .map(|n| n.get())
            .map_err(|e| Error::LoadEvaluation {
                message: format!("available parallelism unreadable: {e}"),
            })
    }
}

/// Compute the load score from raw readings
///
/// Degenerate inputs are clamped: the result is always within `0..=100`.
pub fn compute_score(
    memory_used_ratio: f64,
    parallelism: usize,
    total_executions: u64,
) -> LoadScore {
    let ratio = if memory_used_ratio.is_finite() {
        memory_used_ratio.clamp(0.0, 1.0)
    } else {
        0.0
    };

    let memory_score = (ratio * 50.0).round() as u32;
    let processor_score = 25usize.saturating_sub(parallelism) as u32;
    let history_score = total_executions.min(25) as u32;

    LoadScore::new(memory_score + processor_score + history_score)
}

/// Computes the 0-100 system load score
#[derive(Clone)]
pub struct LoadEvaluator {
    probe: Arc<dyn SystemProbe>,
}

impl LoadEvaluator {
    pub fn new(probe: Arc<dyn SystemProbe>) -> Self {
        Self { probe }
    }

    /// Evaluate the current load; unreadable metrics yield the neutral 50
    pub fn evaluate(&self, total_executions: u64) -> LoadScore {
        match self.try_evaluate(total_executions) {
            Ok(score) => score,
            Err(e) => {
                tracing::warn!(error = %e, "falling back to neutral system load");
                LoadScore::NEUTRAL
            }
        }
    }

    fn try_evaluate(&self, total_executions: u64) -> Result<LoadScore> {
        let ratio = self.probe.memory_used_ratio()?;
        if !ratio.is_finite() {
            return Err(Error::LoadEvaluation {
                message: format!("memory ratio is not finite: {ratio}"),
            });
        }
        let parallelism = self.probe.available_parallelism()?;
        Ok(compute_score(ratio, parallelism, total_executions))
    }
}

impl Default for LoadEvaluator {
    fn default() -> Self {
        Self::new(Arc::new(SysinfoProbe::new()))
    }
}
