//! Outcome of a single preheating execution

use super::strategy::StrategyType;
use serde::{Deserialize, Serialize};

/// Write-once result of one `execute` call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionResult {
    pub strategy_type: StrategyType,
    pub success: bool,
    pub message: String,
    pub duration_ms: u64,
    pub preheated_items: u64,
}

impl ExecutionResult {
    pub fn success(
        strategy_type: StrategyType,
        message: impl Into<String>,
        duration_ms: u64,
        preheated_items: u64,
    ) -> Self {
        Self {
            strategy_type,
            success: true,
            message: message.into(),
            duration_ms,
            preheated_items,
        }
    }

    pub fn failure(
        strategy_type: StrategyType,
        message: impl Into<String>,
        duration_ms: u64,
        preheated_items: u64,
    ) -> Self {
        Self {
            strategy_type,
            success: false,
            message: message.into(),
            duration_ms,
            preheated_items,
        }
    }
}
