use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::path::PathBuf;
use tracing::{error, info, warn};

use crate::persistence::JsonDocument;

pub const SETTINGS_FILE: &str = "settings.json";

/// Interval used at startup and whenever user input cannot be parsed.
pub const DEFAULT_INTERVAL_MINUTES: u32 = 30;

/// Smallest accepted interval; non-positive input is raised to this.
pub const MIN_INTERVAL_MINUTES: u32 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Language {
    #[default]
    English,
    #[serde(rename = "العربية")]
    Arabic,
}

impl Language {
    pub fn display_name(&self) -> &'static str {
        match self {
            Language::English => "English",
            Language::Arabic => "العربية",
        }
    }

    /// Unknown names fall back to English instead of rejecting the whole file.
    pub fn from_name(name: &str) -> Self {
        match name {
            "العربية" => Language::Arabic,
            _ => Language::English,
        }
    }
}

fn lenient_language<'de, D>(deserializer: D) -> Result<Language, D::Error>
where
    D: Deserializer<'de>,
{
    let name = String::deserialize(deserializer)?;
    Ok(Language::from_name(&name))
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Minutes between reminders. Deliberately not written to disk, so every
    /// launch starts from the default.
    #[serde(skip)]
    pub interval_minutes: u32,

    #[serde(deserialize_with = "lenient_language")]
    pub language: Language,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            interval_minutes: DEFAULT_INTERVAL_MINUTES,
            language: Language::default(),
        }
    }
}

impl Settings {
    pub fn interval_secs(&self) -> i64 {
        i64::from(self.interval_minutes.max(MIN_INTERVAL_MINUTES)) * 60
    }
}

/// Coerces raw interval input: unparseable text becomes 30, anything at or
/// below zero becomes 1.
pub fn validate_interval(raw: &str) -> u32 {
    match raw.trim().parse::<i64>() {
        Ok(value) if value < i64::from(MIN_INTERVAL_MINUTES) => MIN_INTERVAL_MINUTES,
        Ok(value) => u32::try_from(value).unwrap_or(u32::MAX),
        Err(_) => DEFAULT_INTERVAL_MINUTES,
    }
}

pub struct SettingsStore {
    document: JsonDocument,
    settings: Settings,
}

impl SettingsStore {
    /// Loads settings, falling back to defaults on a missing or malformed file.
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let document = JsonDocument::new(path);

        let settings = match document.load::<Settings>() {
            Ok(Some(settings)) => {
                info!(language = %settings.language, "loaded settings");
                settings
            }
            Ok(None) => Settings::default(),
            Err(err) => {
                warn!(path = %document.path().display(), error = %err, "unable to load settings, using defaults");
                Settings::default()
            }
        };

        Self { document, settings }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn settings_mut(&mut self) -> &mut Settings {
        &mut self.settings
    }

    pub fn language(&self) -> Language {
        self.settings.language
    }

    pub fn set_language(&mut self, language: Language) {
        self.settings.language = language;
        self.save();
    }

    pub fn save(&self) {
        if let Err(err) = self.document.save(&self.settings) {
            error!(path = %self.document.path().display(), error = %err, "failed to save settings");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn interval_coercion() {
        assert_eq!(validate_interval("0"), 1);
        assert_eq!(validate_interval("-5"), 1);
        assert_eq!(validate_interval("abc"), 30);
        assert_eq!(validate_interval(""), 30);
        assert_eq!(validate_interval(" 15 "), 15);
        assert_eq!(validate_interval("99999999999"), u32::MAX);
    }

    #[test]
    fn missing_file_gives_defaults_without_writing() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join(SETTINGS_FILE);

        let store = SettingsStore::load(&path);
        assert_eq!(store.settings(), &Settings::default());
        assert!(!path.exists());
    }

    #[test]
    fn malformed_file_gives_defaults() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join(SETTINGS_FILE);
        fs::write(&path, "{\"language\": 42}").expect("write fixture");

        let store = SettingsStore::load(&path);
        assert_eq!(store.language(), Language::English);
    }

    #[test]
    fn unknown_language_and_extra_keys_are_tolerated() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join(SETTINGS_FILE);

        fs::write(&path, "{\"language\": \"Français\", \"theme\": \"dark\"}").expect("write fixture");
        assert_eq!(SettingsStore::load(&path).language(), Language::English);

        fs::write(&path, "{\"language\": \"العربية\", \"font_size\": 14}").expect("write fixture");
        assert_eq!(SettingsStore::load(&path).language(), Language::Arabic);
    }

    #[test]
    fn write_failures_keep_the_in_memory_language() {
        let dir = tempdir().expect("tempdir");
        let blocker = dir.path().join("blocker");
        fs::write(&blocker, "not a directory").expect("write fixture");

        let mut store = SettingsStore::load(blocker.join(SETTINGS_FILE));
        store.set_language(Language::Arabic);
        assert_eq!(store.language(), Language::Arabic);

        store.save();
        assert_eq!(store.language(), Language::Arabic);
    }

    #[test]
    fn language_change_is_persisted_but_interval_is_not() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join(SETTINGS_FILE);

        let mut store = SettingsStore::load(&path);
        store.settings_mut().interval_minutes = 5;
        store.set_language(Language::Arabic);

        let raw = fs::read_to_string(&path).expect("read back");
        assert!(raw.contains("العربية"));
        assert!(!raw.contains("interval"));

        let reloaded = SettingsStore::load(&path);
        assert_eq!(reloaded.language(), Language::Arabic);
        assert_eq!(reloaded.settings().interval_minutes, DEFAULT_INTERVAL_MINUTES);
    }
}
