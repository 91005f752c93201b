//! # Configuration
//!
//! Optional `ticketwatch.toml`. Every key has a default, so a missing file or
//! a missing section behaves like an empty one.
//!
//! ```toml
//! [storage]
//! path = "tickets.json"
//!
//! [clock]
//! enabled = true
//! url = "https://worldtimeapi.org/api/timezone/Europe/Bucharest"
//! timeout_secs = 5
//!
//! [scheduler]
//! interval_secs = 300
//!
//! [calendar]
//! utc_offset_minutes = 120
//! ```

use chrono::FixedOffset;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use ticketwatch_core::primitives::DEFAULT_CHECK_INTERVAL_SECS;
use ticketwatch_core::{EscalationRunner, TicketwatchError};

/// Default config file name, resolved against the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "ticketwatch.toml";

/// Default data file name.
pub const DEFAULT_DATA_FILE: &str = "tickets.json";

/// Default remote clock endpoint.
pub const DEFAULT_CLOCK_URL: &str = "https://worldtimeapi.org/api/timezone/Europe/Bucharest";

/// Default remote clock request timeout.
pub const DEFAULT_CLOCK_TIMEOUT_SECS: u64 = 5;

/// Maximum config file size (1 MB).
const MAX_CONFIG_FILE_SIZE: u64 = 1024 * 1024;

/// Largest UTC offset accepted for the calendar override, in minutes.
const MAX_OFFSET_MINUTES: i32 = 14 * 60;

// =============================================================================
// SECTIONS
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Data file path.
    pub path: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from(DEFAULT_DATA_FILE),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ClockConfig {
    /// Use the remote clock; `false` always uses local time.
    pub enabled: bool,
    pub url: String,
    pub timeout_secs: u64,
}

impl Default for ClockConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            url: DEFAULT_CLOCK_URL.to_string(),
            timeout_secs: DEFAULT_CLOCK_TIMEOUT_SECS,
        }
    }
}

impl ClockConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SchedulerConfig {
    /// Seconds between periodic passes in `watch`.
    pub interval_secs: u64,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            interval_secs: DEFAULT_CHECK_INTERVAL_SECS,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct CalendarConfig {
    /// Pin the weekday offset instead of following the clock's offset.
    pub utc_offset_minutes: Option<i32>,
}

// =============================================================================
// CONFIG
// =============================================================================

/// Complete application configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub storage: StorageConfig,
    pub clock: ClockConfig,
    pub scheduler: SchedulerConfig,
    pub calendar: CalendarConfig,
}

impl Config {
    /// Load from `path`. A missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self, TicketwatchError> {
        if !path.exists() {
            tracing::debug!("No config file at {:?}, using defaults", path);
            return Ok(Self::default());
        }

        let metadata = std::fs::metadata(path)
            .map_err(|e| TicketwatchError::IoError(format!("Cannot read config metadata: {}", e)))?;
        if metadata.len() > MAX_CONFIG_FILE_SIZE {
            return Err(TicketwatchError::ConfigError(format!(
                "Config file size {} bytes exceeds maximum allowed {} bytes",
                metadata.len(),
                MAX_CONFIG_FILE_SIZE
            )));
        }

        let text = std::fs::read_to_string(path)
            .map_err(|e| TicketwatchError::IoError(format!("Read config: {}", e)))?;
        let config = Self::from_toml_str(&text).map_err(|e| match e {
            TicketwatchError::ConfigError(msg) => {
                TicketwatchError::ConfigError(format!("{}: {}", path.display(), msg))
            }
            other => other,
        })?;

        tracing::debug!("Loaded config from {:?}", path);
        Ok(config)
    }

    /// Parse and validate TOML text.
    pub fn from_toml_str(text: &str) -> Result<Self, TicketwatchError> {
        let config: Self =
            toml::from_str(text).map_err(|e| TicketwatchError::ConfigError(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), TicketwatchError> {
        if self.scheduler.interval_secs == 0 {
            return Err(TicketwatchError::ConfigError(
                "scheduler.interval_secs must be at least 1".to_string(),
            ));
        }
        if self.clock.timeout_secs == 0 {
            return Err(TicketwatchError::ConfigError(
                "clock.timeout_secs must be at least 1".to_string(),
            ));
        }
        if self.clock.enabled && self.clock.url.trim().is_empty() {
            return Err(TicketwatchError::ConfigError(
                "clock.url is required when the remote clock is enabled".to_string(),
            ));
        }
        self.calendar_offset()?;
        Ok(())
    }

    /// The pinned calendar offset, if configured.
    pub fn calendar_offset(&self) -> Result<Option<FixedOffset>, TicketwatchError> {
        let Some(minutes) = self.calendar.utc_offset_minutes else {
            return Ok(None);
        };
        if minutes.abs() > MAX_OFFSET_MINUTES {
            return Err(TicketwatchError::ConfigError(format!(
                "calendar.utc_offset_minutes {} is outside +/-{}",
                minutes, MAX_OFFSET_MINUTES
            )));
        }
        FixedOffset::east_opt(minutes * 60)
            .map(Some)
            .ok_or_else(|| {
                TicketwatchError::ConfigError(format!("Invalid UTC offset: {} minutes", minutes))
            })
    }

    /// Escalation runner honouring the calendar override.
    pub fn runner(&self) -> Result<EscalationRunner, TicketwatchError> {
        Ok(match self.calendar_offset()? {
            Some(offset) => EscalationRunner::with_offset(offset),
            None => EscalationRunner::new(),
        })
    }

    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.scheduler.interval_secs)
    }
}
