use serde::{Deserialize, Serialize};

/// Playback and notification preferences.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct UserSettings {
    pub notifications: bool,
    pub autoplay: bool,
    pub language: String,
    pub quality: String,
    pub volume: u8,
}

impl Default for UserSettings {
    fn default() -> Self {
        Self {
            notifications: true,
            autoplay: true,
            language: "en".to_string(),
            quality: "auto".to_string(),
            volume: 100,
        }
    }
}
