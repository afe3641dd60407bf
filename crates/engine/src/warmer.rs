//! Cache-warming collaborator contract
//!
//! The engine never touches the cache store itself. Every warming routine
//! goes through a [`CacheWarmer`] supplied by the host application.

use async_trait::async_trait;
use preheat_core::{Error, Result};
use std::time::Duration;

/// What a collaborator reports for one warming call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WarmOutcome {
    pub ok: bool,
    pub elapsed: Duration,
}

impl WarmOutcome {
    pub fn ok(elapsed: Duration) -> Self {
        Self { ok: true, elapsed }
    }

    pub fn failed(elapsed: Duration) -> Self {
        Self { ok: false, elapsed }
    }

    /// Turn a reported failure into a `WarmingFailure` error
    pub fn into_result(self, operation: &str) -> Result<Duration> {
        if self.ok {
            Ok(self.elapsed)
        } else {
            Err(Error::warming(
                operation,
                format!("collaborator reported failure after {:?}", self.elapsed),
            ))
        }
    }
}

/// Trait for the component that actually loads data into the cache
#[async_trait]
pub trait CacheWarmer: Send + Sync {
    /// Warm every cache domain
    async fn warm_all(&self) -> Result<WarmOutcome>;

    /// Warm the permission cache
    async fn warm_permissions(&self) -> Result<WarmOutcome>;

    /// Warm a single configuration entry
    async fn warm_config(&self, key: &str) -> Result<WarmOutcome>;

    /// Warm every entry under a key prefix or pattern
    async fn warm_by_prefix(&self, prefix: &str) -> Result<WarmOutcome>;

    /// Keys currently considered hot, in scan order
    async fn hot_keys(&self) -> Result<Vec<String>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failed_outcome_becomes_error() {
        let err = WarmOutcome::failed(Duration::from_millis(5))
            .into_result("warm_all")
            .unwrap_err();
        assert!(matches!(err, Error::WarmingFailure { .. }));
        assert_eq!(
            WarmOutcome::ok(Duration::from_millis(5))
                .into_result("warm_all")
                .unwrap(),
            Duration::from_millis(5)
        );
    }
}
