//! Hand-written collaborator doubles shared by the engine integration tests

#![allow(dead_code)]

use async_trait::async_trait;
use parking_lot::Mutex;
use preheat_core::{Error, Result, StrategyType};
use preheat_engine::{CacheWarmer, MetricsSink, SystemProbe, WarmOutcome};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// How the recording warmer answers each call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Behaviour {
    Succeed,
    /// Report `ok = false`
    Report,
    /// Return an error from the call itself
    Raise,
    /// Panic inside `warm_all`, every other call succeeds
    PanicOnWarmAll,
}

/// Warmer that records every call and answers per its configuration
pub struct RecordingWarmer {
    calls: Mutex<Vec<String>>,
    hot_keys: Vec<String>,
    behaviour: Behaviour,
    delay: Duration,
    /// Calls after this many succeed with `delay`, earlier ones return at once
    slow_after: usize,
}

impl RecordingWarmer {
    pub fn new() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            hot_keys: Vec::new(),
            behaviour: Behaviour::Succeed,
            delay: Duration::ZERO,
            slow_after: 0,
        }
    }

    pub fn failing(behaviour: Behaviour) -> Self {
        Self {
            behaviour,
            ..Self::new()
        }
    }

    pub fn with_hot_keys(mut self, keys: &[&str]) -> Self {
        self.hot_keys = keys.iter().map(|k| k.to_string()).collect();
        self
    }

    /// Every call after the first `fast_calls` sleeps for `delay`
    pub fn with_delay(mut self, delay: Duration, fast_calls: usize) -> Self {
        self.delay = delay;
        self.slow_after = fast_calls;
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().clone()
    }

    async fn answer(&self, call: String) -> Result<WarmOutcome> {
        let index = {
            let mut calls = self.calls.lock();
            calls.push(call.clone());
            calls.len()
        };

        if index > self.slow_after && !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        match self.behaviour {
            Behaviour::Succeed | Behaviour::PanicOnWarmAll => {
                Ok(WarmOutcome::ok(Duration::from_millis(1)))
            }
            Behaviour::Report => Ok(WarmOutcome::failed(Duration::from_millis(1))),
            Behaviour::Raise => Err(Error::warming(call, "cache backend unavailable")),
        }
    }
}

#[async_trait]
impl CacheWarmer for RecordingWarmer {
    async fn warm_all(&self) -> Result<WarmOutcome> {
        let outcome = self.answer("warm_all".to_string()).await;
        if self.behaviour == Behaviour::PanicOnWarmAll {
            panic!("cache backend exploded");
        }
        outcome
    }

    async fn warm_permissions(&self) -> Result<WarmOutcome> {
        self.answer("warm_permissions".to_string()).await
    }

    async fn warm_config(&self, key: &str) -> Result<WarmOutcome> {
        self.answer(format!("warm_config:{key}")).await
    }

    async fn warm_by_prefix(&self, prefix: &str) -> Result<WarmOutcome> {
        self.answer(format!("warm_by_prefix:{prefix}")).await
    }

    async fn hot_keys(&self) -> Result<Vec<String>> {
        if self.behaviour == Behaviour::Raise {
            return Err(Error::warming("hot_keys", "cache backend unavailable"));
        }
        Ok(self.hot_keys.clone())
    }
}

/// Probe returning fixed readings
pub struct StaticProbe {
    pub memory_used_ratio: f64,
    pub parallelism: usize,
}

impl StaticProbe {
    /// Readings that put a fresh engine in the neutral load band
    pub fn neutral() -> Arc<Self> {
        // round(0.8 * 50) = 40, 25 - 16 = 9 -> 49 before history
        Arc::new(Self {
            memory_used_ratio: 0.8,
            parallelism: 16,
        })
    }
}

impl SystemProbe for StaticProbe {
    fn memory_used_ratio(&self) -> Result<f64> {
        Ok(self.memory_used_ratio)
    }

    fn available_parallelism(&self) -> Result<usize> {
        Ok(self.parallelism)
    }
}

/// Sink whose every call fails, counting the attempts
#[derive(Default)]
pub struct FailingMetricsSink {
    attempts: AtomicUsize,
}

impl FailingMetricsSink {
    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }

    fn reject(&self) -> Result<()> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        Err(Error::Metrics {
            message: "metrics backend unavailable".to_string(),
        })
    }
}

impl MetricsSink for FailingMetricsSink {
    fn record_effectiveness(&self, _strategy: &StrategyType, _success_rate: f64) -> Result<()> {
        self.reject()
    }

    fn record_efficiency(&self, _strategy: &StrategyType, _value: f64) -> Result<()> {
        self.reject()
    }

    fn record_execution(&self, _strategy: &StrategyType, _success: bool) -> Result<()> {
        self.reject()
    }
}
