/// Constants used throughout the preheat workspace
// Key patterns
pub const PERMISSION_KEY_PREFIX: &str = "user:permissions:";
pub const CONFIG_KEY_PREFIX: &str = "system:config:";

// Coarse item-count estimates reported per warming routine
pub const FULL_WARM_ITEMS: u64 = 15;
pub const PERMISSION_WARM_ITEMS: u64 = 8;
pub const ADAPTIVE_PERMISSION_ITEMS: u64 = 1;
pub const ADAPTIVE_CONFIG_ITEMS: u64 = 3;
pub const PREDICTIVE_PERMISSION_ITEMS: u64 = 2;
pub const PREDICTIVE_CONFIG_ITEMS: u64 = 1;

// Load thresholds
pub const HIGH_LOAD_THRESHOLD: u8 = 80;
pub const LOW_LOAD_THRESHOLD: u8 = 30;
pub const HEALTHY_SUCCESS_RATE: f64 = 0.8;

// Strategy parameter bounds
pub const MIN_STRATEGY_TIMEOUT_MS: u64 = 1;
pub const MAX_STRATEGY_TIMEOUT_MS: u64 = 60 * 60 * 1000;
pub const MAX_CONCURRENCY_LEVEL: u32 = 64;

// History
pub const DEFAULT_HISTORY_MAX: usize = 1000;
pub const DEFAULT_HISTORY_TRIM: usize = 500;
pub const DEFAULT_RECENT_HISTORY: usize = 10;

// Environment variable names
pub const PREHEAT_CONFIG_VAR: &str = "PREHEAT_CONFIG";
pub const PREHEAT_ENABLED_VAR: &str = "PREHEAT_ENABLED";
pub const PREHEAT_INTERVAL_VAR: &str = "PREHEAT_INTERVAL_SECS";
pub const PREHEAT_QUEUE_CAPACITY_VAR: &str = "PREHEAT_QUEUE_CAPACITY";
pub const PREHEAT_WORKERS_VAR: &str = "PREHEAT_WORKERS";
pub const PREHEAT_LOG_VAR: &str = "PREHEAT_LOG";
