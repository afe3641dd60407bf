//! Strategy storage and self-tuning

mod adjuster;
mod registry;

pub use adjuster::{Adjustment, StrategyAdjuster};
pub use registry::StrategyRegistry;
