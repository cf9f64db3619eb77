use serde::{Deserialize, Serialize};

/// Appearance hint handed to the notification surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeHint {
    #[default]
    Light,
    Dark,
}

impl ThemeHint {
    /// Freedesktop icon name used for the desktop notification.
    pub fn icon_name(&self) -> &'static str {
        match self {
            ThemeHint::Light => "weather-clear",
            ThemeHint::Dark => "weather-clear-night",
        }
    }
}
