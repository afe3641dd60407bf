//! Strategy identifiers and tunable strategy parameters

use crate::constants::{MAX_CONCURRENCY_LEVEL, MAX_STRATEGY_TIMEOUT_MS, MIN_STRATEGY_TIMEOUT_MS};
use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use std::fmt::{self, Display};
use std::str::FromStr;
use std::time::Duration;

/// Identifies a preheating strategy
///
/// The five built-in variants each have a warming routine. `Custom` names can
/// be registered but have no routine, so executing one fails with an unknown
/// strategy type result.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum StrategyType {
    Startup,
    Scheduled,
    Adaptive,
    Predictive,
    Recovery,
    Custom(String),
}

impl StrategyType {
    /// Strategies registered by default, in registration order
    pub const BUILT_IN: [StrategyType; 5] = [
        StrategyType::Startup,
        StrategyType::Scheduled,
        StrategyType::Adaptive,
        StrategyType::Predictive,
        StrategyType::Recovery,
    ];

    /// Lowercase name of the strategy type
    pub fn as_str(&self) -> &str {
        match self {
            Self::Startup => "startup",
            Self::Scheduled => "scheduled",
            Self::Adaptive => "adaptive",
            Self::Predictive => "predictive",
            Self::Recovery => "recovery",
            Self::Custom(name) => name,
        }
    }

    /// Whether a warming routine exists for this type
    pub fn is_built_in(&self) -> bool {
        !matches!(self, Self::Custom(_))
    }
}

impl Display for StrategyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StrategyType {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase();
        Ok(match normalized.as_str() {
            "startup" => Self::Startup,
            "scheduled" => Self::Scheduled,
            "adaptive" => Self::Adaptive,
            "predictive" => Self::Predictive,
            "recovery" => Self::Recovery,
            _ => Self::Custom(normalized),
        })
    }
}

impl From<&str> for StrategyType {
    fn from(value: &str) -> Self {
        match value.parse() {
            Ok(strategy_type) => strategy_type,
            Err(never) => match never {},
        }
    }
}

impl From<String> for StrategyType {
    fn from(value: String) -> Self {
        Self::from(value.as_str())
    }
}

impl From<StrategyType> for String {
    fn from(value: StrategyType) -> Self {
        value.as_str().to_string()
    }
}

/// Mutable parameters governing one preheating strategy
///
/// Invariants: `timeout > 0` and `concurrency_level >= 1`. Both are kept
/// inside fixed bounds by the setters below.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Strategy {
    pub strategy_type: StrategyType,
    pub name: String,
    pub concurrency_level: u32,
    #[serde(with = "super::duration_ms", rename = "timeout_ms")]
    pub timeout: Duration,
    pub high_priority: bool,
}

impl Strategy {
    /// Create a strategy, clamping the parameters into their valid ranges
    pub fn new(
        strategy_type: StrategyType,
        name: impl Into<String>,
        concurrency_level: u32,
        timeout: Duration,
        high_priority: bool,
    ) -> Self {
        let mut strategy = Self {
            strategy_type,
            name: name.into(),
            concurrency_level: 1,
            timeout: Duration::from_millis(MIN_STRATEGY_TIMEOUT_MS),
            high_priority,
        };
        strategy.set_concurrency_level(concurrency_level);
        strategy.set_timeout(timeout);
        strategy
    }

    /// Default definition for a built-in strategy type
    pub fn default_for(strategy_type: &StrategyType) -> Option<Self> {
        let (name, concurrency, timeout_secs, high_priority) = match strategy_type {
            StrategyType::Startup => ("Startup preheating", 4, 60, true),
            StrategyType::Scheduled => ("Scheduled preheating", 2, 30, false),
            StrategyType::Adaptive => ("Adaptive preheating", 3, 45, false),
            StrategyType::Predictive => ("Predictive preheating", 2, 30, false),
            StrategyType::Recovery => ("Recovery preheating", 5, 120, true),
            StrategyType::Custom(_) => return None,
        };

        Some(Self::new(
            strategy_type.clone(),
            name,
            concurrency,
            Duration::from_secs(timeout_secs),
            high_priority,
        ))
    }

    /// Set the timeout, clamped to the supported range
    pub fn set_timeout(&mut self, timeout: Duration) {
        self.timeout = timeout.clamp(
            Duration::from_millis(MIN_STRATEGY_TIMEOUT_MS),
            Duration::from_millis(MAX_STRATEGY_TIMEOUT_MS),
        );
    }

    /// Set the concurrency level, clamped to `1..=MAX_CONCURRENCY_LEVEL`
    pub fn set_concurrency_level(&mut self, level: u32) {
        self.concurrency_level = level.clamp(1, MAX_CONCURRENCY_LEVEL);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use super::Strategy;

    #[test]
    fn test_strategy_type_round_trips_names() {
        for strategy_type in StrategyType::BUILT_IN {
            let parsed: StrategyType = strategy_type.as_str().into();
            assert_eq!(parsed, strategy_type);
            assert!(parsed.is_built_in());
        }

        let custom = StrategyType::from("Nightly");
        assert_eq!(custom, StrategyType::Custom("nightly".to_string()));
        assert!(!custom.is_built_in());
    }

    #[test]
    fn test_strategy_type_serializes_as_string() {
        let json = serde_json::to_string(&StrategyType::Predictive).unwrap();
        assert_eq!(json, "\"predictive\"");
        let back: StrategyType = serde_json::from_str("\"recovery\"").unwrap();
        assert_eq!(back, StrategyType::Recovery);
    }

    #[test]
    fn test_defaults_exist_for_built_ins_only() {
        for strategy_type in StrategyType::BUILT_IN {
            let strategy = Strategy::default_for(&strategy_type).unwrap();
            assert_eq!(strategy.strategy_type, strategy_type);
            assert!(strategy.timeout > Duration::ZERO);
            assert!(strategy.concurrency_level >= 1);
        }
        assert!(Strategy::default_for(&StrategyType::Custom("x".into())).is_none());
    }

    #[test]
    fn test_parameters_are_clamped() {
        let strategy = Strategy::new(
            StrategyType::Scheduled,
            "zero",
            0,
            Duration::ZERO,
            false,
        );
        assert_eq!(strategy.concurrency_level, 1);
        assert_eq!(strategy.timeout, Duration::from_millis(MIN_STRATEGY_TIMEOUT_MS));

        let mut strategy = strategy;
        strategy.set_timeout(Duration::from_secs(u64::MAX));
        assert_eq!(strategy.timeout, Duration::from_millis(MAX_STRATEGY_TIMEOUT_MS));
        strategy.set_concurrency_level(u32::MAX);
        assert_eq!(strategy.concurrency_level, MAX_CONCURRENCY_LEVEL);
    }

    proptest! {
        #[test]
        fn proptest_parsed_names_are_stable(name in "\\PC{0,24}") {
            let parsed = StrategyType::from(name.as_str());
            let reparsed = StrategyType::from(parsed.to_string());
            prop_assert_eq!(reparsed, parsed);
        }
    }
}
