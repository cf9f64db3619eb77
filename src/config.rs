use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use crate::notification::DEFAULT_NOTIFICATION_TIMEOUT_SECS;
use crate::phrases::PHRASES_FILE;
use crate::settings::SETTINGS_FILE;
use crate::theme::ThemeHint;

const APP_DIR: &str = "duaa-reminder";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Show reminders as desktop notifications; when off they only go to the log
    pub enable_notifications: bool,

    /// Appearance hint for notifications
    pub theme: ThemeHint,

    /// Seconds before a notification closes itself
    pub notification_timeout_secs: u64,

    /// Period of the reminder due-check in milliseconds
    pub check_interval_ms: u64,

    /// Period of the countdown refresh in milliseconds
    pub display_refresh_ms: u64,

    /// Where settings.json and duaas.json live. Defaults to the platform data directory.
    pub data_dir: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            enable_notifications: true,
            theme: ThemeHint::default(),
            notification_timeout_secs: DEFAULT_NOTIFICATION_TIMEOUT_SECS,
            check_interval_ms: 1000,
            display_refresh_ms: 500,
            data_dir: None,
        }
    }
}

impl Config {
    pub fn config_dir() -> Result<PathBuf> {
        let base = dirs::config_dir().context("Unable to determine the config directory")?;
        Ok(base.join(APP_DIR))
    }

    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        if !config_path.exists() {
            let config = Self::default();
            config.save()?;
            return Ok(config);
        }

        let content = fs::read_to_string(&config_path)
            .context("Failed to read config file")?;

        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse config file")
    }

    pub fn save(&self) -> Result<()> {
        let config_dir = Self::config_dir()?;
        fs::create_dir_all(&config_dir)
            .context("Failed to create config directory")?;

        let config_path = Self::config_path()?;
        let content = toml::to_string_pretty(self)
            .context("Failed to serialize config")?;

        fs::write(&config_path, content)
            .context("Failed to write config file")?;

        Ok(())
    }

    pub fn data_dir(&self) -> Result<PathBuf> {
        match &self.data_dir {
            Some(dir) => Ok(dir.clone()),
            None => {
                let base = dirs::data_dir().context("Unable to determine the data directory")?;
                Ok(base.join(APP_DIR))
            }
        }
    }

    pub fn phrases_path(&self) -> Result<PathBuf> {
        Ok(self.data_dir()?.join(PHRASES_FILE))
    }

    pub fn settings_path(&self) -> Result<PathBuf> {
        Ok(self.data_dir()?.join(SETTINGS_FILE))
    }

    pub fn notification_timeout(&self) -> Duration {
        Duration::from_secs(self.notification_timeout_secs)
    }

    pub fn check_interval(&self) -> Duration {
        Duration::from_millis(self.check_interval_ms)
    }

    pub fn display_refresh(&self) -> Duration {
        Duration::from_millis(self.display_refresh_ms)
    }

    pub fn validate(&self) -> Result<()> {
        if self.notification_timeout_secs == 0 {
            anyhow::bail!("Notification timeout must be greater than 0");
        }
        if self.check_interval_ms == 0 {
            anyhow::bail!("Check interval must be greater than 0");
        }
        if self.display_refresh_ms == 0 {
            anyhow::bail!("Display refresh must be greater than 0");
        }
        Ok(())
    }
}
