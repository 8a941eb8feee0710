//! Configuration for the alarm service.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::alarm::scheduler::ArmPolicy;
use crate::error::{AlarmError, Result};

/// Top-level alarm configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AlarmConfig {
    /// Where the alarm list is persisted.
    pub storage: StorageConfig,
    /// Deadline timer tuning.
    pub scheduler: SchedulerConfig,
    /// Side effects emitted when an alarm fires.
    pub notify: NotifyConfig,
}

/// Persistence settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Root directory of the settings store (None = [`alarm_data_dir`]).
    pub dir: Option<PathBuf>,
}

impl StorageConfig {
    /// Configured directory or the platform default.
    pub fn resolved_dir(&self) -> PathBuf {
        self.dir.clone().unwrap_or_else(alarm_data_dir)
    }
}

/// Deadline timer settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SchedulerConfig {
    /// Extra delay added to every armed deadline, in milliseconds.
    ///
    /// Absorbs coarse clock/timer granularity so the timer never wakes a
    /// hair before the trigger second and finds nothing due.
    pub safety_margin_ms: u64,
    /// Smallest delay ever requested from the timer, in milliseconds.
    pub min_resolution_ms: u64,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            safety_margin_ms: 1000,
            min_resolution_ms: 1,
        }
    }
}

impl SchedulerConfig {
    pub fn arm_policy(&self) -> ArmPolicy {
        ArmPolicy {
            min_resolution: Duration::from_millis(self.min_resolution_ms.max(1)),
            safety_margin: Duration::from_millis(self.safety_margin_ms),
        }
    }
}

/// Firing side-effect settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NotifyConfig {
    /// Sound cue played on every firing.
    pub sound_cue: String,
    /// Conversation role used for the display message.
    pub display_role: String,
    /// Follow-up request sent to the assistant. `{label}` is replaced by
    /// the alarm label.
    pub follow_up_template: String,
}

impl Default for NotifyConfig {
    fn default() -> Self {
        Self {
            sound_cue: "popup".to_owned(),
            display_role: "assistant".to_owned(),
            follow_up_template: "It's time for {label}. Remind me once more, loudly, \
                                 and ask whether I've finished it."
                .to_owned(),
        }
    }
}

/// Default settings root for alarm data.
///
/// Resolves to `dirs::config_dir()/fae/`. Override with `FAE_ALARM_DIR`.
#[must_use]
pub fn alarm_data_dir() -> PathBuf {
    if let Some(override_dir) = std::env::var_os("FAE_ALARM_DIR") {
        return PathBuf::from(override_dir);
    }
    dirs::config_dir()
        .map(|d| d.join("fae"))
        .unwrap_or_else(|| PathBuf::from("/tmp/fae-config"))
}

impl AlarmConfig {
    /// Load configuration from a TOML file, falling back to defaults for missing fields.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| AlarmError::Config(e.to_string()))
    }

    /// Save configuration to a TOML file, creating parent directories as needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written or the config cannot be serialized.
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content =
            toml::to_string_pretty(self).map_err(|e| AlarmError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Returns the default config file path: `~/.config/fae/alarm.toml`.
    ///
    /// Override with `FAE_ALARM_CONFIG`.
    pub fn default_config_path() -> PathBuf {
        if let Some(path) = std::env::var_os("FAE_ALARM_CONFIG") {
            return PathBuf::from(path);
        }
        dirs::config_dir()
            .map(|d| d.join("fae").join("alarm.toml"))
            .unwrap_or_else(|| PathBuf::from("/tmp/fae-config/alarm.toml"))
    }
}
