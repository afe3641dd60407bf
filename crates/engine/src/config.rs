//! Preheating configuration management with precedence and validation
use preheat_core::constants::{
    CONFIG_KEY_PREFIX, DEFAULT_HISTORY_MAX, DEFAULT_HISTORY_TRIM, DEFAULT_RECENT_HISTORY,
    PERMISSION_KEY_PREFIX, PREDICTIVE_CONFIG_ITEMS, PREDICTIVE_PERMISSION_ITEMS,
    PREHEAT_CONFIG_VAR, PREHEAT_ENABLED_VAR, PREHEAT_INTERVAL_VAR, PREHEAT_LOG_VAR,
    PREHEAT_QUEUE_CAPACITY_VAR, PREHEAT_WORKERS_VAR,
};
use preheat_core::{Error, Result, StrategyType};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

/// Engine configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PreheatConfig {
    /// Whether the periodic trigger and the startup run are started
    pub enabled: bool,
    /// Interval of the periodic trigger, in seconds
    pub schedule_interval_secs: u64,
    /// Strategy submitted by the periodic trigger
    pub scheduled_strategy: StrategyType,
    /// Submit the startup strategy once when the service starts
    pub run_on_startup: bool,
    /// Maximum number of queued jobs before the oldest is dropped
    pub queue_capacity: usize,
    /// Worker tasks draining the job queue
    pub workers: usize,
    /// History size that triggers a bulk trim
    pub history_max: usize,
    /// Number of oldest records removed by a bulk trim
    pub history_trim: usize,
    /// Records included in a report
    pub recent_history: usize,
    /// Key prefixes used by the adaptive and predictive routines
    pub key_patterns: KeyPatterns,
    /// Time-of-day rules used by the predictive routine
    pub predictive_rules: Vec<PredictiveRule>,
    /// Fallback tracing filter when `RUST_LOG` is unset
    pub log_level: String,
}

impl Default for PreheatConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            schedule_interval_secs: 30 * 60,
            scheduled_strategy: StrategyType::Scheduled,
            run_on_startup: true,
            queue_capacity: 16,
            workers: 2,
            history_max: DEFAULT_HISTORY_MAX,
            history_trim: DEFAULT_HISTORY_TRIM,
            recent_history: DEFAULT_RECENT_HISTORY,
            key_patterns: KeyPatterns::default(),
            predictive_rules: PredictiveRule::defaults(),
            log_level: "info".to_string(),
        }
    }
}

impl PreheatConfig {
    pub fn schedule_interval(&self) -> Duration {
        Duration::from_secs(self.schedule_interval_secs)
    }

    /// Reject settings the engine cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.schedule_interval_secs == 0 {
            return Err(Error::configuration("schedule_interval_secs must be positive"));
        }
        if self.queue_capacity == 0 {
            return Err(Error::configuration("queue_capacity must be positive"));
        }
        if self.workers == 0 {
            return Err(Error::configuration("workers must be positive"));
        }
        if self.history_trim == 0 || self.history_trim > self.history_max {
            return Err(Error::configuration(format!(
                "history_trim ({}) must be positive and not exceed history_max ({})",
                self.history_trim, self.history_max
            )));
        }
        if self.key_patterns.permission_prefix.is_empty()
            || self.key_patterns.config_prefix.is_empty()
        {
            return Err(Error::configuration("key prefixes must not be empty"));
        }
        for rule in &self.predictive_rules {
            rule.validate()?;
        }
        Ok(())
    }
}

/// Tunable key prefixes for hot-key detection and prediction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyPatterns {
    pub permission_prefix: String,
    pub config_prefix: String,
}

impl Default for KeyPatterns {
    fn default() -> Self {
        Self {
            permission_prefix: PERMISSION_KEY_PREFIX.to_string(),
            config_prefix: CONFIG_KEY_PREFIX.to_string(),
        }
    }
}

impl KeyPatterns {
    /// Glob-style pattern covering every permission key
    pub fn permission_pattern(&self) -> String {
        format!("{}*", self.permission_prefix)
    }

    /// Glob-style pattern covering every config key
    pub fn config_pattern(&self) -> String {
        format!("{}*", self.config_prefix)
    }

    pub fn pattern_for(&self, target: WarmTarget) -> String {
        match target {
            WarmTarget::Permissions => self.permission_pattern(),
            WarmTarget::Config => self.config_pattern(),
        }
    }
}

/// Collaborator call used to warm a predicted key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarmTarget {
    Permissions,
    Config,
}

/// Time-of-day rule: during `start_hour..=end_hour`, warm `keys`
///
/// Rules are evaluated independently, so overlapping windows all fire.
/// An empty `keys` list means the configured pattern for `target`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PredictiveRule {
    pub start_hour: u8,
    pub end_hour: u8,
    pub target: WarmTarget,
    #[serde(default)]
    pub keys: Vec<String>,
    pub items_per_key: u64,
}

impl PredictiveRule {
    /// Business hours warm permissions, the morning ramp-up also warms config
    pub fn defaults() -> Vec<Self> {
        vec![
            Self {
                start_hour: 9,
                end_hour: 18,
                target: WarmTarget::Permissions,
                keys: Vec::new(),
                items_per_key: PREDICTIVE_PERMISSION_ITEMS,
            },
            Self {
                start_hour: 8,
                end_hour: 10,
                target: WarmTarget::Config,
                keys: Vec::new(),
                items_per_key: PREDICTIVE_CONFIG_ITEMS,
            },
        ]
    }

    pub fn matches(&self, hour: u8) -> bool {
        (self.start_hour..=self.end_hour).contains(&hour)
    }

    /// Keys this rule selects, falling back to the target's pattern
    pub fn candidate_keys(&self, patterns: &KeyPatterns) -> Vec<String> {
        if self.keys.is_empty() {
            vec![patterns.pattern_for(self.target)]
        } else {
            self.keys.clone()
        }
    }

    fn validate(&self) -> Result<()> {
        if self.start_hour > 23 || self.end_hour > 23 || self.start_hour > self.end_hour {
            return Err(Error::configuration(format!(
                "invalid predictive rule hours {}..={}",
                self.start_hour, self.end_hour
            )));
        }
        Ok(())
    }
}

/// Source of configuration for debugging and precedence tracking
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConfigSource {
    /// Default configuration
    Default,
    /// Configuration file
    ConfigFile(PathBuf),
    /// Environment variable
    EnvironmentVariable(String),
    /// Command line argument
    CommandLine,
}

/// Configuration together with the last source that changed it
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub config: PreheatConfig,
    pub source: ConfigSource,
}

/// Command line overrides, highest precedence
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub enabled: Option<bool>,
    pub schedule_interval_secs: Option<u64>,
    pub log_level: Option<String>,
}

/// Configuration loader that handles precedence
pub struct PreheatConfigLoader;

impl PreheatConfigLoader {
    /// Load configuration: defaults, then the config file, then environment
    pub fn load() -> Result<LoadedConfig> {
        let path = Self::get_config_file_path()?;
        Self::load_with_file(&path, false)
    }

    /// Load configuration from an explicit file, which must exist
    pub fn load_from(path: &Path) -> Result<LoadedConfig> {
        Self::load_with_file(path, true)
    }

    fn load_with_file(path: &Path, required: bool) -> Result<LoadedConfig> {
        let mut loaded = LoadedConfig {
            config: PreheatConfig::default(),
            source: ConfigSource::Default,
        };

        if let Some(file_config) = Self::load_from_config_file(path, required)? {
            loaded = LoadedConfig {
                config: file_config,
                source: ConfigSource::ConfigFile(path.to_path_buf()),
            };
        }

        if Self::apply_env(&mut loaded.config)? {
            loaded.source = ConfigSource::EnvironmentVariable("PREHEAT_*".to_string());
        }

        loaded.config.validate()?;
        Ok(loaded)
    }

    /// Load configuration from a JSON config file
    fn load_from_config_file(path: &Path, required: bool) -> Result<Option<PreheatConfig>> {
        if !path.exists() {
            if required {
                return Err(Error::configuration(format!(
                    "config file '{}' does not exist",
                    path.display()
                )));
            }
            return Ok(None);
        }

        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::file_system(path, "read config file", e))?;
        let config: PreheatConfig = serde_json::from_str(&content)?;
        tracing::debug!(path = %path.display(), "loaded preheat config file");
        Ok(Some(config))
    }

    /// Apply `PREHEAT_*` environment variables, returning whether any was set
    fn apply_env(config: &mut PreheatConfig) -> Result<bool> {
        let mut has_env_config = false;

        if let Ok(enabled) = std::env::var(PREHEAT_ENABLED_VAR) {
            config.enabled = parse_env(PREHEAT_ENABLED_VAR, &enabled.to_lowercase())?;
            has_env_config = true;
        }

        if let Ok(interval) = std::env::var(PREHEAT_INTERVAL_VAR) {
            config.schedule_interval_secs = parse_env(PREHEAT_INTERVAL_VAR, &interval)?;
            has_env_config = true;
        }

        if let Ok(capacity) = std::env::var(PREHEAT_QUEUE_CAPACITY_VAR) {
            config.queue_capacity = parse_env(PREHEAT_QUEUE_CAPACITY_VAR, &capacity)?;
            has_env_config = true;
        }

        if let Ok(workers) = std::env::var(PREHEAT_WORKERS_VAR) {
            config.workers = parse_env(PREHEAT_WORKERS_VAR, &workers)?;
            has_env_config = true;
        }

        if let Ok(level) = std::env::var(PREHEAT_LOG_VAR) {
            config.log_level = level;
            has_env_config = true;
        }

        Ok(has_env_config)
    }

    /// Get the configuration file path
    pub fn get_config_file_path() -> Result<PathBuf> {
        if let Ok(explicit) = std::env::var(PREHEAT_CONFIG_VAR) {
            return Ok(PathBuf::from(explicit));
        }

        let config_dir = if let Ok(xdg_config_home) = std::env::var("XDG_CONFIG_HOME") {
            PathBuf::from(xdg_config_home)
        } else {
            dirs::config_dir().ok_or_else(|| {
                Error::configuration("could not determine config directory; set XDG_CONFIG_HOME")
            })?
        };

        Ok(config_dir.join("preheat").join("config.json"))
    }

    /// Apply command line arguments (highest precedence)
    pub fn apply_cli_args(
        mut loaded: LoadedConfig,
        overrides: CliOverrides,
    ) -> Result<LoadedConfig> {
        let mut changed = false;

        if let Some(enabled) = overrides.enabled {
            loaded.config.enabled = enabled;
            changed = true;
        }

        if let Some(interval) = overrides.schedule_interval_secs {
            loaded.config.schedule_interval_secs = interval;
            changed = true;
        }

        if let Some(level) = overrides.log_level {
            loaded.config.log_level = level;
            changed = true;
        }

        if changed {
            loaded.source = ConfigSource::CommandLine;
        }

        loaded.config.validate()?;
        Ok(loaded)
    }
}

fn parse_env<T: FromStr>(variable: &str, value: &str) -> Result<T> {
    value.trim().parse().map_err(|_| {
        Error::configuration(format!("invalid value '{value}' for {variable}"))
    })
}
