//! Persisted user settings: the caption shown under the wallpaper and the
//! local emergency services number.

use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};

pub const SETTINGS_FILE: &str = "qr_info_settings.json";
pub const DEFAULT_INFO_MESSAGE: &str =
    "This QR code contains vital medical information for emergency use.";
pub const DEFAULT_EMERGENCY_NUMBER: &str = "911";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub info_message: String,
    pub emergency_number: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            info_message: DEFAULT_INFO_MESSAGE.into(),
            emergency_number: DEFAULT_EMERGENCY_NUMBER.into(),
        }
    }
}

impl Settings {
    /// Load settings from `dir`. A missing or unreadable file yields defaults.
    pub fn load(dir: &Path) -> Self {
        let path = dir.join(SETTINGS_FILE);
        let data = match std::fs::read(&path) {
            Ok(data) => data,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Self::default(),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Failed to read settings, using defaults");
                return Self::default();
            }
        };
        match serde_json::from_slice(&data) {
            Ok(settings) => settings,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Invalid settings file, using defaults");
                Self::default()
            }
        }
    }

    pub fn save(&self, dir: &Path) -> anyhow::Result<()> {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create data directory {}", dir.display()))?;
        let path = dir.join(SETTINGS_FILE);
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(&path, json)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        tracing::info!(path = %path.display(), "Settings saved");
        Ok(())
    }

    /// Apply `MEDQR_INFO_MESSAGE` / `MEDQR_EMERGENCY_NUMBER` overrides.
    ///
    /// Blank values are ignored.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let non_blank = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(v) = non_blank("MEDQR_INFO_MESSAGE") {
            self.info_message = v;
        }
        if let Some(v) = non_blank("MEDQR_EMERGENCY_NUMBER") {
            self.emergency_number = v.trim().to_string();
        }
    }
}
