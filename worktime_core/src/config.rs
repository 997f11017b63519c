//! Configuration file support for worktime.
//!
//! Configuration is loaded from `$XDG_CONFIG_HOME/worktime/config.toml`.

use crate::engine::WEEKLY_TARGET_MINUTES;
use crate::period::PeriodKind;
use crate::{BreakInterval, ClockTime, Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Application configuration
#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub data: DataConfig,

    #[serde(default)]
    pub tracking: TrackingConfig,

    #[serde(default)]
    pub breaks: BreaksConfig,
}

/// Data storage configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DataConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
        }
    }
}

pub type TrackingMode = PeriodKind;

/// How the weekly target is derived
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetMode {
    /// A fixed number of minutes per week
    #[default]
    Fixed,
    /// The sum of each day-type's target
    DayTypes,
}

/// Period and target configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TrackingConfig {
    #[serde(default)]
    pub mode: TrackingMode,

    #[serde(default)]
    pub target: TargetMode,

    #[serde(default = "default_weekly_target_minutes")]
    pub weekly_target_minutes: u32,
}

impl Default for TrackingConfig {
    fn default() -> Self {
        Self {
            mode: TrackingMode::default(),
            target: TargetMode::default(),
            weekly_target_minutes: default_weekly_target_minutes(),
        }
    }
}

/// Break list given to newly created days
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BreaksConfig {
    #[serde(default = "default_breaks")]
    pub default: Vec<BreakInterval>,
}

impl Default for BreaksConfig {
    fn default() -> Self {
        Self {
            default: default_breaks(),
        }
    }
}

// Default value functions
fn default_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .or_else(|| dirs::home_dir().map(|home| home.join(".local/share")))
        .unwrap_or_else(|| PathBuf::from("."))
        .join("worktime")
}

fn default_weekly_target_minutes() -> u32 {
    WEEKLY_TARGET_MINUTES
}

fn default_breaks() -> Vec<BreakInterval> {
    match (ClockTime::from_hm(12, 0), ClockTime::from_hm(13, 0)) {
        (Some(start), Some(end)) => vec![BreakInterval::new(start, end)],
        _ => Vec::new(),
    }
}

impl Config {
    /// Load configuration from the standard config path
    pub fn load() -> Result<Self> {
        let config_path = Self::default_config_path();
        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            tracing::info!(
                "No config file found at {:?}, using defaults",
                config_path
            );
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        config.validate()?;
        tracing::info!("Loaded config from {:?}", path);
        Ok(config)
    }

    /// Get the default config file path
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .or_else(|| dirs::home_dir().map(|home| home.join(".config")))
            .unwrap_or_else(|| PathBuf::from("."))
            .join("worktime")
            .join("config.toml")
    }

    /// Reject settings the engine would silently ignore
    pub fn validate(&self) -> Result<()> {
        if let Some(b) = self.breaks.default.iter().find(|b| !b.is_well_formed()) {
            return Err(Error::Config(format!(
                "Default break {} ends before it starts",
                b
            )));
        }
        if self.tracking.weekly_target_minutes == 0 {
            return Err(Error::Config("weekly_target_minutes must be positive".into()));
        }
        Ok(())
    }

    /// Save the current configuration to a specific path
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(path, contents)?;
        tracing::info!("Saved config to {:?}", path);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.tracking.mode, TrackingMode::Week);
        assert_eq!(config.tracking.target, TargetMode::Fixed);
        assert_eq!(config.tracking.weekly_target_minutes, 2400);
        assert_eq!(config.breaks.default.len(), 1);
        assert_eq!(config.breaks.default[0].to_string(), "12:00-13:00");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_config() {
        let toml_str = r#"
[tracking]
mode = "month"
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.tracking.mode, TrackingMode::Month);
        assert_eq!(config.tracking.weekly_target_minutes, 2400); // default
        assert_eq!(config.breaks.default.len(), 1); // default
    }

    #[test]
    fn test_custom_breaks() {
        let toml_str = r#"
[tracking]
target = "day_types"

[breaks]
default = [
    { start = "11:30", end = "12:30" },
    { start = "15:00", end = "15:15" },
]
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.tracking.target, TargetMode::DayTypes);
        assert_eq!(config.breaks.default.len(), 2);
        assert_eq!(config.breaks.default[1].to_string(), "15:00-15:15");
    }

    #[test]
    fn test_validate_rejects_inverted_break() {
        let toml_str = r#"
[breaks]
default = [{ start = "13:00", end = "12:00" }]
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert!(matches!(config.validate(), Err(Error::Config(_))));
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("worktime").join("config.toml");

        let mut config = Config::default();
        config.tracking.mode = TrackingMode::Month;
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.tracking.mode, TrackingMode::Month);
        assert_eq!(loaded.breaks.default, config.breaks.default);
    }
}
