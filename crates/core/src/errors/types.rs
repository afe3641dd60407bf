//! Core error type definitions

use std::path::PathBuf;
use std::time::Duration;

/// Result type alias for preheat operations
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for preheat operations using thiserror
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// No strategy is registered under the requested type
    StrategyNotFound { strategy: String },

    /// The strategy is registered but no warming routine handles it
    UnknownStrategyType { strategy: String },

    /// The cache-warming collaborator failed or reported failure
    WarmingFailure { operation: String, message: String },

    /// A warming routine exceeded the strategy timeout
    Timeout {
        operation: String,
        duration: Duration,
    },

    /// Runtime metrics could not be read
    LoadEvaluation { message: String },

    /// The metrics sink rejected an update
    Metrics { message: String },

    /// Configuration errors
    Configuration { message: String },

    /// File system operations
    FileSystem {
        path: PathBuf,
        operation: String,
        #[source]
        source: std::io::Error,
    },

    /// JSON serialization/deserialization errors
    Json {
        message: String,
        #[source]
        source: serde_json::Error,
    },

    /// The scheduler queue has been shut down
    QueueClosed,
}

impl Error {
    /// Create a warming failure error
    pub fn warming(operation: impl Into<String>, message: impl Into<String>) -> Self {
        Self::WarmingFailure {
            operation: operation.into(),
            message: message.into(),
        }
    }

    /// Create a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Create a file system error
    pub fn file_system(
        path: impl Into<PathBuf>,
        operation: impl Into<String>,
        source: std::io::Error,
    ) -> Self {
        Self::FileSystem {
            path: path.into(),
            operation: operation.into(),
            source,
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(source: serde_json::Error) -> Self {
        Self::Json {
            message: source.to_string(),
            source,
        }
    }
}
