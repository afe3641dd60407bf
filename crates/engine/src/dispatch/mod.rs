//! Strategy-specific warming routines
//!
//! Each routine delegates to the [`CacheWarmer`] collaborator and reports a
//! coarse item-count estimate into a shared [`Progress`] counter. The counter
//! lives outside the routine's future, so a timeout or failure still reports
//! how much had been warmed.

mod adaptive;
mod predictive;

pub use adaptive::adaptive_plan;
pub use predictive::predictive_plan;

use crate::config::{KeyPatterns, PredictiveRule, WarmTarget};
use crate::warmer::CacheWarmer;
use futures::stream::{self, TryStreamExt};
use preheat_core::constants::{FULL_WARM_ITEMS, PERMISSION_WARM_ITEMS};
use preheat_core::{Error, Result, Strategy, StrategyType};
use std::sync::atomic::{AtomicU64, Ordering};

/// Items warmed so far by the running routine
#[derive(Debug, Default)]
pub struct Progress {
    items: AtomicU64,
}

impl Progress {
    pub fn add(&self, items: u64) {
        self.items.fetch_add(items, Ordering::Relaxed);
    }

    pub fn items(&self) -> u64 {
        self.items.load(Ordering::Relaxed)
    }
}

/// One key to warm and the items it is credited with
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WarmTask {
    pub target: WarmTarget,
    pub key: String,
    pub items: u64,
}

/// Everything a routine needs besides the strategy itself
pub struct WarmingContext<'a> {
    pub warmer: &'a dyn CacheWarmer,
    pub key_patterns: &'a KeyPatterns,
    pub predictive_rules: &'a [PredictiveRule],
    pub hour: u8,
    pub progress: &'a Progress,
}

/// Run the warming routine for `strategy`
pub async fn run(strategy: &Strategy, ctx: &WarmingContext<'_>) -> Result<()> {
    match &strategy.strategy_type {
        StrategyType::Startup | StrategyType::Recovery => {
            ctx.warmer.warm_all().await?.into_result("warm_all")?;
            ctx.progress.add(FULL_WARM_ITEMS);
            Ok(())
        }
        StrategyType::Scheduled => {
            ctx.warmer
                .warm_permissions()
                .await?
                .into_result("warm_permissions")?;
            ctx.progress.add(PERMISSION_WARM_ITEMS);
            Ok(())
        }
        StrategyType::Adaptive => {
            let hot_keys = ctx.warmer.hot_keys().await?;
            let plan = adaptive_plan(&hot_keys, ctx.key_patterns);
            tracing::debug!(hot_keys = hot_keys.len(), selected = plan.len(), "adaptive plan");
            execute_plan(plan, strategy.concurrency_level, ctx).await
        }
        StrategyType::Predictive => {
            let plan = predictive_plan(ctx.hour, ctx.predictive_rules, ctx.key_patterns);
            tracing::debug!(hour = ctx.hour, selected = plan.len(), "predictive plan");
            execute_plan(plan, strategy.concurrency_level, ctx).await
        }
        StrategyType::Custom(name) => Err(Error::UnknownStrategyType {
            strategy: name.clone(),
        }),
    }
}

/// Warm every task with at most `concurrency` calls in flight
///
/// Stops at the first failure; items from tasks that already finished stay
/// credited.
async fn execute_plan(
    plan: Vec<WarmTask>,
    concurrency: u32,
    ctx: &WarmingContext<'_>,
) -> Result<()> {
    let warmer = ctx.warmer;
    let progress = ctx.progress;

    stream::iter(plan.into_iter().map(Ok::<_, Error>))
        .try_for_each_concurrent(concurrency.max(1) as usize, move |task| async move {
            let (operation, outcome) = match task.target {
                WarmTarget::Permissions => {
                    ("warm_by_prefix", warmer.warm_by_prefix(&task.key).await?)
                }
                WarmTarget::Config => ("warm_config", warmer.warm_config(&task.key).await?),
            };
            outcome.into_result(operation)?;
            progress.add(task.items);
            Ok(())
        })
        .await
}
