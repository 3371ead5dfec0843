//! Configuration loading and management.

use std::path::{Path, PathBuf};

use compass_core::{CapacityConfig, PartialCapacityConfig};
use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use serde::{Deserialize, Serialize};

/// Application configuration.
///
/// These are the capacity defaults; a payload's own `config` object
/// overrides them field by field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Working hours available per day.
    pub hours_per_day: f64,
    /// Number of days in the forecast window, starting today.
    pub window_days: u32,
    /// IANA timezone used to bucket meetings and to decide what "today" is.
    pub timezone: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            hours_per_day: CapacityConfig::DEFAULT_HOURS_PER_DAY,
            window_days: CapacityConfig::DEFAULT_WINDOW_DAYS,
            timezone: CapacityConfig::DEFAULT_TIMEZONE.to_string(),
        }
    }
}

impl Config {
    /// Loads configuration, optionally from a specific file.
    ///
    /// Later layers win: defaults, the platform config file, `config_path`,
    /// then `COMPASS_*` environment variables.
    #[expect(
        clippy::result_large_err,
        reason = "figment::Error is large but only returned at startup"
    )]
    pub fn load_from(config_path: Option<&Path>) -> Result<Self, figment::Error> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Some(config_dir) = dirs_config_path() {
            figment = figment.merge(Toml::file(config_dir.join("config.toml")));
        }

        if let Some(path) = config_path {
            figment = figment.merge(Toml::file(path));
        }

        figment = figment.merge(Env::prefixed("COMPASS_"));

        figment.extract()
    }

    /// The configured values as the lowest-precedence capacity layer.
    pub fn capacity_defaults(&self) -> PartialCapacityConfig {
        PartialCapacityConfig {
            hours_per_day: Some(self.hours_per_day),
            window_days: Some(self.window_days),
            timezone: Some(self.timezone.clone()),
        }
    }
}

/// Returns the platform-specific config directory for compass.
///
/// On Linux: `~/.config/compass`
pub fn dirs_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("compass"))
}
