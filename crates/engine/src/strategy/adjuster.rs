//! Load- and history-driven strategy tuning

use crate::stats::EffectStats;
use preheat_core::constants::{HEALTHY_SUCCESS_RATE, HIGH_LOAD_THRESHOLD, LOW_LOAD_THRESHOLD};
use preheat_core::{LoadScore, Strategy};

/// Which rules fired during one adjustment
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Adjustment {
    /// Load above the high threshold: longer timeout, less concurrency
    pub backed_off: bool,
    /// Load below the low threshold: shorter timeout, more concurrency
    pub sped_up: bool,
    /// Success rate below the healthy threshold: much longer timeout, high priority
    pub conservative: bool,
}

impl Adjustment {
    pub fn is_noop(&self) -> bool {
        !(self.backed_off || self.sped_up || self.conservative)
    }
}

/// Mutates strategy parameters from the current load and past results
#[derive(Debug, Clone, Copy)]
pub struct StrategyAdjuster {
    pub high_load: u8,
    pub low_load: u8,
    pub healthy_success_rate: f64,
}

impl Default for StrategyAdjuster {
    fn default() -> Self {
        Self {
            high_load: HIGH_LOAD_THRESHOLD,
            low_load: LOW_LOAD_THRESHOLD,
            healthy_success_rate: HEALTHY_SUCCESS_RATE,
        }
    }
}

impl StrategyAdjuster {
    /// Apply the tuning rules in order; effects compound
    ///
    /// Between the two load thresholds, with no stats or a healthy success
    /// rate, the strategy is left untouched.
    pub fn adjust(
        &self,
        strategy: &mut Strategy,
        load: LoadScore,
        stats: Option<&EffectStats>,
    ) -> Adjustment {
        let mut adjustment = Adjustment::default();

        if load.value() > self.high_load {
            strategy.set_timeout(strategy.timeout.saturating_mul(2));
            strategy.set_concurrency_level(strategy.concurrency_level.saturating_sub(1));
            adjustment.backed_off = true;
        }

        if load.value() < self.low_load {
            strategy.set_timeout(strategy.timeout / 2);
            strategy.set_concurrency_level(strategy.concurrency_level.saturating_add(1));
            adjustment.sped_up = true;
        }

        if let Some(stats) = stats {
            if stats.success_rate() < self.healthy_success_rate {
                strategy.set_timeout(strategy.timeout.saturating_mul(3));
                strategy.high_priority = true;
                adjustment.conservative = true;
            }
        }

        adjustment
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use preheat_core::{Strategy, StrategyType};
    use proptest::prelude::*;
    use std::time::Duration;

    fn scheduled() -> Strategy {
        Strategy::new(
            StrategyType::Scheduled,
            "Scheduled preheating",
            2,
            Duration::from_secs(30),
            false,
        )
    }

    fn stats(executions: u64, successes: u64) -> EffectStats {
        EffectStats {
            strategy_type: StrategyType::Scheduled,
            execution_count: executions,
            success_count: successes,
            total_duration_ms: 100 * executions,
            total_items: 8 * successes,
        }
    }

    #[test]
    fn test_high_load_backs_off() {
        let mut strategy = scheduled();
        let adjustment =
            StrategyAdjuster::default().adjust(&mut strategy, LoadScore::new(91), None);
        assert!(adjustment.backed_off);
        assert_eq!(strategy.timeout, Duration::from_secs(60));
        assert_eq!(strategy.concurrency_level, 1);

        // concurrency is floored at one
        StrategyAdjuster::default().adjust(&mut strategy, LoadScore::new(91), None);
        assert_eq!(strategy.concurrency_level, 1);
        assert_eq!(strategy.timeout, Duration::from_secs(120));
    }

    #[test]
    fn test_low_load_speeds_up() {
        let mut strategy = scheduled();
        let adjustment =
            StrategyAdjuster::default().adjust(&mut strategy, LoadScore::new(10), None);
        assert!(adjustment.sped_up);
        assert_eq!(strategy.timeout, Duration::from_secs(15));
        assert_eq!(strategy.concurrency_level, 3);
    }

    #[test]
    fn test_low_success_rate_compounds_with_load_rule() {
        let mut strategy = scheduled();
        let adjustment = StrategyAdjuster::default().adjust(
            &mut strategy,
            LoadScore::new(95),
            Some(&stats(2, 1)),
        );
        assert!(adjustment.backed_off && adjustment.conservative);
        assert_eq!(strategy.timeout, Duration::from_secs(180));
        assert!(strategy.high_priority);
    }

    #[test]
    fn test_neutral_band_boundaries_are_noops() {
        for load in [30, 55, 80] {
            let mut strategy = scheduled();
            let adjustment = StrategyAdjuster::default().adjust(
                &mut strategy,
                LoadScore::new(load),
                Some(&stats(10, 8)),
            );
            assert!(adjustment.is_noop(), "load {load} should not adjust");
            assert_eq!(strategy, scheduled());
        }
    }

    proptest! {
        #[test]
        fn proptest_neutral_band_is_idempotent(
            load in 30u32..=80,
            executions in 1u64..500,
            failures_per_mille in 0u64..=200
        ) {
            let successes = executions - (executions * failures_per_mille / 1000);
            let mut strategy = scheduled();
            let adjustment = StrategyAdjuster::default().adjust(
                &mut strategy,
                LoadScore::new(load),
                Some(&stats(executions, successes)),
            );
            prop_assert!(adjustment.is_noop());
            prop_assert_eq!(strategy, scheduled());
        }

        #[test]
        fn proptest_invariants_hold_after_any_adjustment(
            loads in prop::collection::vec(0u32..=100, 1..200),
            rate_ok in any::<bool>()
        ) {
            let mut strategy = scheduled();
            let history = if rate_ok { stats(10, 10) } else { stats(10, 2) };
            for load in loads {
                StrategyAdjuster::default().adjust(
                    &mut strategy,
                    LoadScore::new(load),
                    Some(&history),
                );
                prop_assert!(strategy.timeout > Duration::ZERO);
                prop_assert!(strategy.concurrency_level >= 1);
            }
        }
    }
}
