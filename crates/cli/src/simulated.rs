//! In-process stand-in for a real cache

use async_trait::async_trait;
use preheat_core::constants::{CONFIG_KEY_PREFIX, PERMISSION_KEY_PREFIX};
use preheat_core::{Error, Result};
use preheat_engine::{CacheWarmer, WarmOutcome};
use std::time::Duration;
use tokio::time::Instant;

/// Warmer that sleeps for a random latency and fails at a fixed rate
#[derive(Debug, Clone)]
pub struct SimulatedWarmer {
    failure_rate: f64,
    min_latency_ms: u64,
    max_latency_ms: u64,
}

impl SimulatedWarmer {
    pub fn new(failure_rate: f64) -> Self {
        Self {
            failure_rate: failure_rate.clamp(0.0, 1.0),
            min_latency_ms: 5,
            max_latency_ms: 50,
        }
    }

    async fn simulate(&self, operation: &str, scale: u64) -> Result<WarmOutcome> {
        let started = Instant::now();
        let latency = fastrand::u64(self.min_latency_ms..=self.max_latency_ms) * scale;
        tokio::time::sleep(Duration::from_millis(latency)).await;

        let ok = fastrand::f64() >= self.failure_rate;
        tracing::trace!(operation, latency_ms = latency, ok, "simulated warm");
        if ok {
            Ok(WarmOutcome::ok(started.elapsed()))
        } else {
            Ok(WarmOutcome::failed(started.elapsed()))
        }
    }
}

#[async_trait]
impl CacheWarmer for SimulatedWarmer {
    async fn warm_all(&self) -> Result<WarmOutcome> {
        self.simulate("warm_all", 4).await
    }

    async fn warm_permissions(&self) -> Result<WarmOutcome> {
        self.simulate("warm_permissions", 2).await
    }

    async fn warm_config(&self, key: &str) -> Result<WarmOutcome> {
        self.simulate(key, 1).await
    }

    async fn warm_by_prefix(&self, prefix: &str) -> Result<WarmOutcome> {
        self.simulate(prefix, 1).await
    }

    async fn hot_keys(&self) -> Result<Vec<String>> {
        if fastrand::f64() < self.failure_rate {
            return Err(Error::warming("hot_keys", "simulated key scan failure"));
        }

        let mut keys: Vec<String> = (0..fastrand::usize(1..=5))
            .map(|_| format!("{PERMISSION_KEY_PREFIX}{}", fastrand::u32(1000..10000)))
            .collect();
        keys.push(format!("{CONFIG_KEY_PREFIX}feature-flags"));
        keys.push(format!("{CONFIG_KEY_PREFIX}rate-limits"));
        fastrand::shuffle(&mut keys);
        Ok(keys)
    }
}
