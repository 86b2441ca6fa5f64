//! Monitor configuration
//!
//! All tunable parameters for one monitored input channel.  Values come
//! from a preset or a JSON file handed to the host binary.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::pins;
use crate::sensors::contact::ActiveLevel;

/// Debounce policy selection, fixed at construction time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PolicyConfig {
    /// Latch into Alarmed after `threshold` consecutive triggered samples.
    Threshold { threshold: u32 },
    /// Follow every edge, then ignore the input for `cooldown_ms`.
    Edge { cooldown_ms: u64 },
    /// Re-read after `delay_ms` before accepting a clear → triggered change.
    Confirm { delay_ms: u64 },
}

/// Configuration for a single monitor instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonitorConfig {
    /// GPIO channel number as the host numbers it.
    pub channel: u8,
    /// Electrical level that means "triggered".
    pub active_level: ActiveLevel,
    /// Time between samples (milliseconds).
    pub interval_ms: u64,
    pub policy: PolicyConfig,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self::water_leak()
    }
}

impl MonitorConfig {
    /// Water leak sensor on a pull-down input, two consecutive hits to alarm.
    pub fn water_leak() -> Self {
        Self {
            channel: pins::WATER_SENSOR_CHANNEL,
            active_level: ActiveLevel::High,
            interval_ms: 10,
            policy: PolicyConfig::Threshold { threshold: 2 },
        }
    }

    /// Water leak sensor reporting both leak start and leak end, with a
    /// five second settle time after each edge.
    pub fn water_leak_edge() -> Self {
        Self {
            channel: pins::WATER_SENSOR_CHANNEL,
            active_level: ActiveLevel::High,
            interval_ms: 10_000,
            policy: PolicyConfig::Edge { cooldown_ms: 5_000 },
        }
    }

    /// Fire alarm panel contact: idles high on a pull-up, pulls low on alarm.
    pub fn fire_alarm() -> Self {
        Self {
            channel: pins::FIRE_ALARM_CHANNEL,
            active_level: ActiveLevel::Low,
            interval_ms: 100,
            policy: PolicyConfig::Threshold { threshold: 1 },
        }
    }

    /// Leak sensor that must still read wet half a second after the edge.
    pub fn leak_confirm() -> Self {
        Self {
            channel: pins::LEAK_CONFIRM_CHANNEL,
            active_level: ActiveLevel::High,
            interval_ms: 10,
            policy: PolicyConfig::Confirm { delay_ms: 500 },
        }
    }

    /// Look up a preset by the name used on the command line.
    pub fn preset(name: &str) -> Option<Self> {
        match name {
            "water" | "water_leak" => Some(Self::water_leak()),
            "water_edge" | "water_leak_edge" => Some(Self::water_leak_edge()),
            "fire" | "fire_alarm" => Some(Self::fire_alarm()),
            "confirm" | "leak_confirm" => Some(Self::leak_confirm()),
            _ => None,
        }
    }

    /// Range-check every field.  Invalid values are rejected, not clamped.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.interval_ms == 0 {
            return Err(ConfigError::ValidationFailed("interval_ms must be > 0"));
        }
        match self.policy {
            PolicyConfig::Threshold { threshold } if threshold < 1 => Err(
                ConfigError::ValidationFailed("policy.threshold must be >= 1"),
            ),
            PolicyConfig::Edge { cooldown_ms: 0 } => Err(ConfigError::ValidationFailed(
                "policy.cooldown_ms must be > 0",
            )),
            PolicyConfig::Confirm { delay_ms: 0 } => Err(ConfigError::ValidationFailed(
                "policy.delay_ms must be > 0",
            )),
            _ => Ok(()),
        }
    }

    /// Parse and validate a JSON document.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json).map_err(|e| {
            log::warn!("config parse failed: {e}");
            ConfigError::Corrupted
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a JSON config file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                ConfigError::NotFound
            } else {
                log::warn!("config read failed ({}): {e}", path.display());
                ConfigError::Io
            }
        })?;
        Self::from_json_str(&json)
    }
}

/// Errors from loading or validating a [`MonitorConfig`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// No config file at the given path.
    NotFound,
    /// The file is not a valid config document.
    Corrupted,
    /// A field failed range validation.
    /// The `&'static str` describes which field and why.
    ValidationFailed(&'static str),
    /// Generic I/O error while reading the file.
    Io,
}

impl core::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::NotFound => write!(f, "config not found"),
            Self::Corrupted => write!(f, "config corrupted"),
            Self::ValidationFailed(msg) => write!(f, "validation failed: {}", msg),
            Self::Io => write!(f, "I/O error"),
        }
    }
}

impl std::error::Error for ConfigError {}
