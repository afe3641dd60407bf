//! Advisory suggestions derived from effect statistics

use crate::stats::EffectStats;
use preheat_core::constants::HEALTHY_SUCCESS_RATE;

const SLOW_AVG_DURATION_MS: f64 = 30_000.0;
const LOW_EFFICIENCY: f64 = 1.0;
const MIN_RELIABLE_EXECUTIONS: u64 = 5;

/// Produces improvement suggestions for a strategy
#[derive(Debug, Clone, Copy, Default)]
pub struct SuggestionGenerator;

impl SuggestionGenerator {
    /// Each threshold that is crossed contributes one suggestion
    pub fn generate(stats: &EffectStats, efficiency: f64) -> Vec<String> {
        let mut suggestions = Vec::new();
        let success_rate = stats.success_rate();
        let avg_duration_ms = stats.avg_duration_ms();

        if success_rate < HEALTHY_SUCCESS_RATE {
            suggestions.push(format!(
                "success rate is {:.1}%: improve retry and error handling for the {} strategy",
                success_rate * 100.0,
                stats.strategy_type
            ));
        }

        if avg_duration_ms > SLOW_AVG_DURATION_MS {
            suggestions.push(format!(
                "average duration is {avg_duration_ms:.0}ms: reduce the preheated data volume or raise concurrency"
            ));
        }

        if efficiency < LOW_EFFICIENCY {
            suggestions.push(format!(
                "efficiency is {efficiency:.2} items/s: optimize the data layout or the caching strategy"
            ));
        }

        if stats.execution_count < MIN_RELIABLE_EXECUTIONS {
            suggestions.push(format!(
                "only {} executions recorded: increase execution frequency for reliable statistics",
                stats.execution_count
            ));
        }

        suggestions
    }

    /// Generate suggestions and warn when the strategy is underperforming
    pub fn evaluate(stats: &EffectStats) -> Vec<String> {
        let efficiency = stats.efficiency();
        let suggestions = Self::generate(stats, efficiency);

        if stats.success_rate() < HEALTHY_SUCCESS_RATE || efficiency < LOW_EFFICIENCY {
            tracing::warn!(
                strategy = %stats.strategy_type,
                success_rate = stats.success_rate(),
                efficiency,
                suggestions = ?suggestions,
                "preheating strategy is underperforming"
            );
        }

        suggestions
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use preheat_core::StrategyType;

    fn stats(executions: u64, successes: u64, total_ms: u64, items: u64) -> EffectStats {
        EffectStats {
            strategy_type: StrategyType::Adaptive,
            execution_count: executions,
            success_count: successes,
            total_duration_ms: total_ms,
            total_items: items,
        }
    }

    #[test]
    fn test_all_four_thresholds() {
        // success rate 0.5, 40s average, 4 executions
        let stats = stats(4, 2, 160_000, 80);
        assert!((stats.avg_duration_ms() - 40_000.0).abs() < f64::EPSILON);

        let suggestions = SuggestionGenerator::generate(&stats, 0.5);
        assert_eq!(suggestions.len(), 4);
        assert!(suggestions[0].contains("retry"));
        assert!(suggestions[1].contains("concurrency"));
        assert!(suggestions[2].contains("data layout"));
        assert!(suggestions[3].contains("frequency"));
    }

    #[test]
    fn test_thresholds_are_independent() {
        let stats = stats(10, 5, 400_000, 200);
        let suggestions = SuggestionGenerator::generate(&stats, 0.5);
        assert_eq!(suggestions.len(), 3);
        assert!(!suggestions.iter().any(|s| s.contains("frequency")));

        let suggestions = SuggestionGenerator::generate(&stats, 2.0);
        assert_eq!(suggestions.len(), 2);
    }

    #[test]
    fn test_healthy_strategy_gets_no_suggestions() {
        let stats = stats(10, 10, 1_000, 80);
        assert!(SuggestionGenerator::evaluate(&stats).is_empty());
    }

    #[test]
    fn test_zero_duration_counts_as_low_efficiency() {
        let stats = stats(10, 10, 0, 80);
        let suggestions = SuggestionGenerator::evaluate(&stats);
        assert_eq!(suggestions.len(), 1);
        assert!(suggestions[0].contains("efficiency"));
    }
}
