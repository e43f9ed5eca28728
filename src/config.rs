//! Engine configuration.
//!
//! Stored in `.sprintgraph/config.toml` and controls duration derivation,
//! lag-day semantics, and analytics defaults.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::calendar::LagUnit;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Scheduling behavior
    #[serde(default)]
    pub schedule: ScheduleConfig,

    /// Analytics defaults
    #[serde(default)]
    pub analytics: AnalyticsConfig,
}

/// Where a task's duration in days comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DurationSource {
    /// `ceil(estimated_hours / hours_per_day)`, falling back to the date
    /// range when no estimate exists.
    #[default]
    EstimatedHours,
    /// `due_date - start_date`, falling back to the estimate.
    DateRange,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleConfig {
    /// Authoritative duration source per task
    #[serde(default)]
    pub duration_source: DurationSource,

    /// Working hours per day when converting estimates
    #[serde(default = "default_hours_per_day")]
    pub hours_per_day: f64,

    /// Lag semantics: "calendar" or "working" days
    #[serde(default)]
    pub lag_unit: LagUnit,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyticsConfig {
    /// Sprints averaged for velocity (None = all completed sprints)
    #[serde(default)]
    pub velocity_window: Option<usize>,

    /// Extend burndown's real series past as-of, flat at the last value
    #[serde(default)]
    pub project_future: bool,
}

fn default_hours_per_day() -> f64 {
    8.0
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            duration_source: DurationSource::default(),
            hours_per_day: default_hours_per_day(),
            lag_unit: LagUnit::default(),
        }
    }
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            velocity_window: None,
            project_future: false,
        }
    }
}

impl Config {
    /// Load configuration from .sprintgraph/config.toml
    /// Returns default config if file doesn't exist
    pub fn load(sprintgraph_dir: &Path) -> anyhow::Result<Self> {
        let config_path = sprintgraph_dir.join("config.toml");

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&config_path)
            .map_err(|e| anyhow::anyhow!("Failed to read config: {}", e))?;

        let config: Config = toml::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Failed to parse config: {}", e))?;

        Ok(config)
    }

    /// Save configuration to .sprintgraph/config.toml
    pub fn save(&self, sprintgraph_dir: &Path) -> anyhow::Result<()> {
        let config_path = sprintgraph_dir.join("config.toml");

        let content = toml::to_string_pretty(self)
            .map_err(|e| anyhow::anyhow!("Failed to serialize config: {}", e))?;

        fs::write(&config_path, content)
            .map_err(|e| anyhow::anyhow!("Failed to write config: {}", e))?;

        Ok(())
    }

    /// Initialize default config file if it doesn't exist
    pub fn init(sprintgraph_dir: &Path) -> anyhow::Result<bool> {
        let config_path = sprintgraph_dir.join("config.toml");

        if config_path.exists() {
            return Ok(false); // Already exists
        }

        let config = Self::default();
        config.save(sprintgraph_dir)?;
        Ok(true) // Created new
    }
}
