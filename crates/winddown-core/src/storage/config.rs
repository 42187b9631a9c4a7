//! TOML-based preference storage.
//!
//! Stores the plan inputs, the notification opt-in and monitor tuning.
//! Preferences live at `~/.config/winddown/config.toml`; a missing file
//! is rewritten with defaults, and a corrupt one falls back to defaults
//! without surfacing an error.

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::data_dir;
use crate::error::{ConfigError, ValidationError};
use crate::monitor::PlanInput;

/// Plan input preferences.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanConfig {
    /// Wake-up clock time, `"HH:MM"`.
    #[serde(default = "default_wake_time")]
    pub wake_time: String,
    #[serde(default = "default_sleep_hours")]
    pub sleep_hours: f64,
    #[serde(default = "default_ritual_minutes")]
    pub ritual_minutes: f64,
}

/// Notification configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationsConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
}

/// Monitor tuning.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitorConfig {
    /// Minutes before ritual start for the early warning chime. Zero
    /// disables the warning.
    #[serde(default = "default_warning_lead")]
    pub warning_lead_minutes: i64,
    /// Monitor tick interval in seconds.
    #[serde(default = "default_tick_seconds")]
    pub tick_seconds: u64,
}

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/winddown/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub plan: PlanConfig,
    #[serde(default)]
    pub notifications: NotificationsConfig,
    #[serde(default)]
    pub monitor: MonitorConfig,
}

// Default functions
fn default_wake_time() -> String {
    "07:00".into()
}
fn default_sleep_hours() -> f64 {
    8.0
}
fn default_ritual_minutes() -> f64 {
    30.0
}
fn default_warning_lead() -> i64 {
    10
}
fn default_tick_seconds() -> u64 {
    10
}
fn default_true() -> bool {
    true
}

impl Default for PlanConfig {
    fn default() -> Self {
        Self {
            wake_time: default_wake_time(),
            sleep_hours: default_sleep_hours(),
            ritual_minutes: default_ritual_minutes(),
        }
    }
}

impl Default for NotificationsConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            warning_lead_minutes: default_warning_lead(),
            tick_seconds: default_tick_seconds(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            plan: PlanConfig::default(),
            notifications: NotificationsConfig::default(),
            monitor: MonitorConfig::default(),
        }
    }
}

impl Config {
    fn path() -> Result<PathBuf, ConfigError> {
        Ok(data_dir()?.join("config.toml"))
    }

    /// Load from disk. A missing file is replaced with defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed,
    /// or if the default config cannot be written to disk.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::path()?;
        match std::fs::read_to_string(&path) {
            Ok(content) => toml::from_str(&content).map_err(|e| ConfigError::LoadFailed {
                path,
                message: e.to_string(),
            }),
            Err(_) => {
                let cfg = Self::default();
                cfg.save()?;
                Ok(cfg)
            }
        }
    }

    /// Load from disk, falling back to defaults on a missing or corrupt
    /// file. Malformed preferences are discarded, never surfaced.
    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_else(|err| {
            tracing::warn!(%err, "preferences unreadable, using defaults");
            Self::default()
        })
    }

    /// Persist to disk.
    ///
    /// # Errors
    ///
    /// Returns an error if the config cannot be serialized or written.
    pub fn save(&self) -> Result<(), ConfigError> {
        let path = Self::path()?;
        let content = toml::to_string_pretty(self).map_err(|e| ConfigError::SaveFailed {
            path: path.clone(),
            message: e.to_string(),
        })?;
        std::fs::write(&path, content).map_err(|e| ConfigError::SaveFailed {
            path,
            message: e.to_string(),
        })?;
        Ok(())
    }

    /// Parse the stored preferences into plan inputs.
    ///
    /// The wake time is validated here so a hand-edited config surfaces
    /// as a validation error at plan-computation time rather than a
    /// crash.
    pub fn plan_input(&self) -> Result<PlanInput, ValidationError> {
        let wake_time = NaiveTime::parse_from_str(&self.plan.wake_time, "%H:%M").map_err(|_| {
            ValidationError::InvalidValue {
                field: "wake_time".into(),
                message: format!("'{}' is not an HH:MM clock time", self.plan.wake_time),
            }
        })?;
        Ok(PlanInput {
            wake_time,
            sleep_hours: self.plan.sleep_hours,
            ritual_minutes: self.plan.ritual_minutes,
        })
    }

    /// Get a config value as string by dot-separated key.
    pub fn get(&self, key: &str) -> Option<String> {
        match key {
            "plan.wake_time" => Some(self.plan.wake_time.clone()),
            "plan.sleep_hours" => Some(self.plan.sleep_hours.to_string()),
            "plan.ritual_minutes" => Some(self.plan.ritual_minutes.to_string()),
            "notifications.enabled" => Some(self.notifications.enabled.to_string()),
            "monitor.warning_lead_minutes" => Some(self.monitor.warning_lead_minutes.to_string()),
            "monitor.tick_seconds" => Some(self.monitor.tick_seconds.to_string()),
            _ => None,
        }
    }

    /// Set a config value by key and persist.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown, the value cannot be
    /// parsed, or the config cannot be saved.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        self.apply(key, value)?;
        self.save()
    }

    fn apply(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let invalid = |message: String| ConfigError::InvalidValue {
            key: key.to_string(),
            message,
        };
        match key {
            "plan.wake_time" => {
                NaiveTime::parse_from_str(value, "%H:%M")
                    .map_err(|_| invalid(format!("'{value}' is not an HH:MM clock time")))?;
                self.plan.wake_time = value.to_string();
            }
            "plan.sleep_hours" => {
                self.plan.sleep_hours = value
                    .parse()
                    .map_err(|_| invalid(format!("cannot parse '{value}' as a number")))?;
            }
            "plan.ritual_minutes" => {
                self.plan.ritual_minutes = value
                    .parse()
                    .map_err(|_| invalid(format!("cannot parse '{value}' as a number")))?;
            }
            "notifications.enabled" => {
                self.notifications.enabled = value
                    .parse()
                    .map_err(|_| invalid(format!("cannot parse '{value}' as a bool")))?;
            }
            "monitor.warning_lead_minutes" => {
                self.monitor.warning_lead_minutes = value
                    .parse()
                    .map_err(|_| invalid(format!("cannot parse '{value}' as an integer")))?;
            }
            "monitor.tick_seconds" => {
                self.monitor.tick_seconds = value
                    .parse()
                    .map_err(|_| invalid(format!("cannot parse '{value}' as an integer")))?;
            }
            _ => return Err(ConfigError::UnknownKey(key.to_string())),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_roundtrip() {
        let cfg = Config::default();
        let toml_str = toml::to_string_pretty(&cfg).unwrap();
        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.plan.wake_time, "07:00");
        assert_eq!(parsed.monitor.warning_lead_minutes, 10);
    }

    #[test]
    fn partial_config_fills_in_defaults() {
        let parsed: Config = toml::from_str("[plan]\nsleep_hours = 7.5\n").unwrap();
        assert_eq!(parsed.plan.sleep_hours, 7.5);
        assert_eq!(parsed.plan.wake_time, "07:00");
        assert!(parsed.notifications.enabled);
        assert_eq!(parsed.monitor.tick_seconds, 10);
    }

    #[test]
    fn get_supports_dot_path_keys() {
        let cfg = Config::default();
        assert_eq!(cfg.get("plan.wake_time").as_deref(), Some("07:00"));
        assert_eq!(cfg.get("plan.sleep_hours").as_deref(), Some("8"));
        assert_eq!(cfg.get("notifications.enabled").as_deref(), Some("true"));
        assert!(cfg.get("plan.missing_key").is_none());
    }

    #[test]
    fn apply_updates_each_known_key() {
        let mut cfg = Config::default();
        cfg.apply("plan.wake_time", "06:30").unwrap();
        cfg.apply("plan.sleep_hours", "7.5").unwrap();
        cfg.apply("notifications.enabled", "false").unwrap();
        cfg.apply("monitor.warning_lead_minutes", "15").unwrap();
        assert_eq!(cfg.plan.wake_time, "06:30");
        assert_eq!(cfg.plan.sleep_hours, 7.5);
        assert!(!cfg.notifications.enabled);
        assert_eq!(cfg.monitor.warning_lead_minutes, 15);
    }

    #[test]
    fn apply_rejects_unknown_key() {
        let mut cfg = Config::default();
        assert!(matches!(
            cfg.apply("plan.nonexistent", "1"),
            Err(ConfigError::UnknownKey(_))
        ));
    }

    #[test]
    fn apply_rejects_unparsable_values() {
        let mut cfg = Config::default();
        assert!(cfg.apply("plan.sleep_hours", "lots").is_err());
        assert!(cfg.apply("plan.wake_time", "25:99").is_err());
        assert!(cfg.apply("notifications.enabled", "maybe").is_err());
        // Nothing changed.
        assert_eq!(cfg.plan.sleep_hours, 8.0);
        assert_eq!(cfg.plan.wake_time, "07:00");
    }

    #[test]
    fn plan_input_parses_the_wake_time() {
        let cfg = Config::default();
        let input = cfg.plan_input().unwrap();
        assert_eq!(input.wake_time, NaiveTime::from_hms_opt(7, 0, 0).unwrap());
        assert_eq!(input.sleep_hours, 8.0);
    }

    #[test]
    fn plan_input_surfaces_a_bad_wake_time_as_validation() {
        let mut cfg = Config::default();
        cfg.plan.wake_time = "sevenish".into();
        assert!(cfg.plan_input().is_err());
    }
}
