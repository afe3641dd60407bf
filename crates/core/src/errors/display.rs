//! Display implementations for error types

use super::types::Error;
use std::fmt;

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::StrategyNotFound { strategy } => {
                write!(f, "strategy not found: {strategy}")
            }
            Error::UnknownStrategyType { strategy } => {
                write!(f, "unknown strategy type: {strategy}")
            }
            Error::WarmingFailure { operation, message } => {
                write!(f, "cache warming failed during {operation}: {message}")
            }
            Error::Timeout {
                operation,
                duration,
            } => {
                write!(f, "{operation} timed out after {duration:?}")
            }
            Error::LoadEvaluation { message } => {
                write!(f, "failed to evaluate system load: {message}")
            }
            Error::Metrics { message } => {
                write!(f, "metrics sink error: {message}")
            }
            Error::Configuration { message } => {
                write!(f, "configuration error: {message}")
            }
            Error::FileSystem {
                path,
                operation,
                source,
            } => {
                write!(
                    f,
                    "file system error during {} on '{}': {}",
                    operation,
                    path.display(),
                    source
                )
            }
            Error::Json { message, .. } => {
                write!(f, "JSON error: {message}")
            }
            Error::QueueClosed => write!(f, "preheating queue is closed"),
        }
    }
}
