//! Classification helpers for preheat errors

use super::types::Error;

impl Error {
    /// Check if this error is transient and the next run may succeed
    #[must_use]
    pub const fn is_transient(&self) -> bool {
        matches!(
            self,
            Self::WarmingFailure { .. } | Self::Timeout { .. } | Self::LoadEvaluation { .. }
        )
    }

    /// Stable snake-case label for logs and metrics
    #[must_use]
    pub const fn kind_label(&self) -> &'static str {
        match self {
            Self::StrategyNotFound { .. } => "strategy_not_found",
            Self::UnknownStrategyType { .. } => "unknown_strategy_type",
            Self::WarmingFailure { .. } => "warming_failure",
            Self::Timeout { .. } => "timeout",
            Self::LoadEvaluation { .. } => "load_evaluation",
            Self::Metrics { .. } => "metrics",
            Self::Configuration { .. } => "configuration",
            Self::FileSystem { .. } => "file_system",
            Self::Json { .. } => "json",
            Self::QueueClosed => "queue_closed",
        }
    }
}
