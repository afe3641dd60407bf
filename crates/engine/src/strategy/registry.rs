//! Registry of named, mutable strategies

use dashmap::DashMap;
use parking_lot::Mutex;
use preheat_core::{Strategy, StrategyType};
use std::sync::Arc;

/// Holds one strategy per type
///
/// Each strategy sits behind its own mutex, which serializes every mutation
/// of that type while leaving other types independent.
#[derive(Debug, Default)]
pub struct StrategyRegistry {
    strategies: DashMap<StrategyType, Arc<Mutex<Strategy>>>,
}

impl StrategyRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry holding the five built-in strategies
    pub fn with_defaults() -> Self {
        let registry = Self::new();
        for strategy_type in StrategyType::BUILT_IN {
            if let Some(strategy) = Strategy::default_for(&strategy_type) {
                registry.register(strategy);
            }
        }
        registry
    }

    /// Register a strategy unless its type is already present
    ///
    /// Returns `false` when a strategy of that type exists; registered
    /// strategies are tuned in place and never replaced.
    pub fn register(&self, strategy: Strategy) -> bool {
        match self.strategies.entry(strategy.strategy_type.clone()) {
            dashmap::mapref::entry::Entry::Occupied(_) => false,
            dashmap::mapref::entry::Entry::Vacant(entry) => {
                entry.insert(Arc::new(Mutex::new(strategy)));
                true
            }
        }
    }

    fn handle(&self, strategy_type: &StrategyType) -> Option<Arc<Mutex<Strategy>>> {
        self.strategies
            .get(strategy_type)
            .map(|entry| Arc::clone(entry.value()))
    }

    /// Copy of the current parameters of a strategy
    pub fn get(&self, strategy_type: &StrategyType) -> Option<Strategy> {
        self.handle(strategy_type).map(|handle| handle.lock().clone())
    }

    /// Apply `update` under the strategy's lock and return the new parameters
    pub fn update<F>(&self, strategy_type: &StrategyType, update: F) -> Option<Strategy>
    where
        F: FnOnce(&mut Strategy),
    {
        let handle = self.handle(strategy_type)?;
        let mut strategy = handle.lock();
        update(&mut strategy);
        Some(strategy.clone())
    }

    pub fn len(&self) -> usize {
        self.strategies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strategies.is_empty()
    }

    /// Copies of every strategy, ordered by type
    pub fn snapshot(&self) -> Vec<Strategy> {
        let handles: Vec<_> = self
            .strategies
            .iter()
            .map(|entry| Arc::clone(entry.value()))
            .collect();
        let mut strategies: Vec<_> = handles.iter().map(|h| h.lock().clone()).collect();
        strategies.sort_by(|a, b| a.strategy_type.cmp(&b.strategy_type));
        strategies
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_defaults_register_five_strategies() {
        let registry = StrategyRegistry::with_defaults();
        assert_eq!(registry.len(), 5);
        for strategy_type in StrategyType::BUILT_IN {
            assert!(registry.get(&strategy_type).is_some());
        }
        assert!(registry.get(&StrategyType::from("nightly")).is_none());
    }

    #[test]
    fn test_register_never_replaces() {
        let registry = StrategyRegistry::with_defaults();
        let replacement = Strategy::new(
            StrategyType::Scheduled,
            "replacement",
            9,
            Duration::from_secs(1),
            true,
        );
        assert!(!registry.register(replacement));
        assert_eq!(
            registry.get(&StrategyType::Scheduled).unwrap().name,
            "Scheduled preheating"
        );

        let custom = Strategy::new(
            StrategyType::from("nightly"),
            "Nightly",
            1,
            Duration::from_secs(10),
            false,
        );
        assert!(registry.register(custom));
        assert_eq!(registry.len(), 6);
    }

    #[test]
    fn test_update_mutates_in_place() {
        let registry = StrategyRegistry::with_defaults();
        let updated = registry
            .update(&StrategyType::Adaptive, |s| s.high_priority = true)
            .unwrap();
        assert!(updated.high_priority);
        assert!(registry.get(&StrategyType::Adaptive).unwrap().high_priority);
        assert!(registry
            .update(&StrategyType::from("missing"), |_| {})
            .is_none());
    }

    #[test]
    fn test_concurrent_updates_are_serialized() {
        let registry = Arc::new(StrategyRegistry::with_defaults());
        let start = registry.get(&StrategyType::Scheduled).unwrap().concurrency_level;

        let threads: Vec<_> = (0..8)
            .map(|_| {
                let registry = Arc::clone(&registry);
                std::thread::spawn(move || {
                    for _ in 0..5 {
                        registry.update(&StrategyType::Scheduled, |s| {
                            let next = s.concurrency_level + 1;
                            s.set_concurrency_level(next);
                        });
                    }
                })
            })
            .collect();
        for thread in threads {
            thread.join().unwrap();
        }

        assert_eq!(
            registry.get(&StrategyType::Scheduled).unwrap().concurrency_level,
            start + 40
        );
    }
}
