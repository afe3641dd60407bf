//! Time-of-day driven warming plan

use super::WarmTask;
use crate::config::{KeyPatterns, PredictiveRule};

/// Collect the keys of every rule whose window contains `hour`
pub fn predictive_plan(
    hour: u8,
    rules: &[PredictiveRule],
    patterns: &KeyPatterns,
) -> Vec<WarmTask> {
    rules
        .iter()
        .filter(|rule| rule.matches(hour))
        .flat_map(|rule| {
            rule.candidate_keys(patterns)
                .into_iter()
                .map(move |key| WarmTask {
                    target: rule.target,
                    key,
                    items: rule.items_per_key,
                })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::WarmTarget;

    fn plan_at(hour: u8) -> Vec<WarmTask> {
        predictive_plan(hour, &PredictiveRule::defaults(), &KeyPatterns::default())
    }

    #[test]
    fn test_ten_oclock_fires_both_rules() {
        let plan = plan_at(10);
        assert_eq!(plan.len(), 2);
        assert_eq!(plan[0].target, WarmTarget::Permissions);
        assert_eq!(plan[0].key, "user:permissions:*");
        assert_eq!(plan[0].items, 2);
        assert_eq!(plan[1].target, WarmTarget::Config);
        assert_eq!(plan[1].key, "system:config:*");
        assert_eq!(plan[1].items, 1);
    }

    #[test]
    fn test_windows_at_edges() {
        let eight: Vec<_> = plan_at(8).into_iter().map(|t| t.target).collect();
        assert_eq!(eight, vec![WarmTarget::Config]);

        let afternoon: Vec<_> = plan_at(15).into_iter().map(|t| t.target).collect();
        assert_eq!(afternoon, vec![WarmTarget::Permissions]);

        assert_eq!(plan_at(18).len(), 1);
        assert!(plan_at(19).is_empty());
        assert!(plan_at(3).is_empty());
    }

    #[test]
    fn test_explicit_rule_keys() {
        let rules = vec![PredictiveRule {
            start_hour: 0,
            end_hour: 23,
            target: WarmTarget::Permissions,
            keys: vec!["user:permissions:admin".to_string(), "user:permissions:ops".to_string()],
            items_per_key: 5,
        }];
        let plan = predictive_plan(4, &rules, &KeyPatterns::default());
        assert_eq!(plan.len(), 2);
        assert_eq!(plan.iter().map(|t| t.items).sum::<u64>(), 10);
    }
}
