//! Execution history entries

use super::load::LoadScore;
use super::strategy::StrategyType;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Immutable record of one finished execution
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryRecord {
    pub strategy_type: StrategyType,
    pub name: String,
    pub timestamp: DateTime<Utc>,
    pub success: bool,
    pub duration_ms: u64,
    pub items: u64,
    pub system_load: LoadScore,
}
