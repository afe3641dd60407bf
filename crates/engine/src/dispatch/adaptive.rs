//! Hot-key driven warming plan

use super::WarmTask;
use crate::config::{KeyPatterns, WarmTarget};
use preheat_core::constants::{ADAPTIVE_CONFIG_ITEMS, ADAPTIVE_PERMISSION_ITEMS};

/// Select hot keys to warm, in scan order
///
/// Every permission key is warmed through `warm_by_prefix(key)`: the
/// warmer's `warm_permissions` refreshes the whole permission space and takes
/// no key, while a hot key names the one subject that needs refreshing.
/// Config is warmed once, through the first config key seen; later config
/// keys are skipped since one warm covers them.
pub fn adaptive_plan(hot_keys: &[String], patterns: &KeyPatterns) -> Vec<WarmTask> {
    let mut plan = Vec::new();
    let mut config_selected = false;

    for key in hot_keys {
        if key.starts_with(&patterns.permission_prefix) {
            plan.push(WarmTask {
                target: WarmTarget::Permissions,
                key: key.clone(),
                items: ADAPTIVE_PERMISSION_ITEMS,
            });
        } else if !config_selected && key.starts_with(&patterns.config_prefix) {
            plan.push(WarmTask {
                target: WarmTarget::Config,
                key: key.clone(),
                items: ADAPTIVE_CONFIG_ITEMS,
            });
            config_selected = true;
        }
    }

    plan
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|k| k.to_string()).collect()
    }

    #[test]
    fn test_permission_keys_count_one_each() {
        let plan = adaptive_plan(
            &keys(&["user:permissions:1", "session:9", "user:permissions:2"]),
            &KeyPatterns::default(),
        );
        assert_eq!(plan.len(), 2);
        assert!(plan.iter().all(|t| t.target == WarmTarget::Permissions));
        assert_eq!(plan.iter().map(|t| t.items).sum::<u64>(), 2);
    }

    #[test]
    fn test_config_warmed_once() {
        let plan = adaptive_plan(
            &keys(&[
                "system:config:features",
                "user:permissions:7",
                "system:config:limits",
                "system:config:theme",
            ]),
            &KeyPatterns::default(),
        );
        let config: Vec<_> = plan
            .iter()
            .filter(|t| t.target == WarmTarget::Config)
            .collect();
        assert_eq!(config.len(), 1);
        assert_eq!(config[0].key, "system:config:features");
        assert_eq!(plan.iter().map(|t| t.items).sum::<u64>(), 4);
    }

    #[test]
    fn test_custom_prefixes() {
        let patterns = KeyPatterns {
            permission_prefix: "perm/".to_string(),
            config_prefix: "cfg/".to_string(),
        };
        let plan = adaptive_plan(&keys(&["perm/a", "user:permissions:1", "cfg/x"]), &patterns);
        assert_eq!(plan.len(), 2);
        assert_eq!(plan[0].key, "perm/a");
        assert_eq!(plan[1].key, "cfg/x");
    }

    #[test]
    fn test_no_hot_keys_means_empty_plan() {
        assert!(adaptive_plan(&[], &KeyPatterns::default()).is_empty());
    }
}
