//! User preferences with TOML persistence.

use crate::error::SettingsError;
use derive_getters::Getters;
use derive_setters::Setters;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::Path;
use tracing::{debug, info, instrument};

/// User-configurable preferences for the game.
///
/// Missing fields in a settings file fall back to their defaults, so
/// files written by older versions keep loading.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Getters, Setters)]
#[serde(default)]
#[setters(prefix = "with_", into)]
pub struct GameSettings {
    /// Master sound toggle.
    sound_enabled: bool,
    /// Music volume in `[0.0, 1.0]`.
    #[setters(skip)]
    music_volume: f32,
    /// Sound-effect volume in `[0.0, 1.0]`.
    #[setters(skip)]
    sfx_volume: f32,
    /// Haptic feedback toggle.
    haptic_enabled: bool,
    /// Calm presentation mode (slower animations, softer audio).
    asmr_mode: bool,
    /// Theme restored when a session has no preference of its own.
    last_theme_id: String,
    /// Ids of premium themes the player has unlocked.
    #[setters(skip)]
    unlocked_themes: BTreeSet<String>,
}

impl Default for GameSettings {
    fn default() -> Self {
        Self {
            sound_enabled: true,
            music_volume: 0.7,
            sfx_volume: 1.0,
            haptic_enabled: true,
            asmr_mode: false,
            last_theme_id: "starlight_realm".to_string(),
            unlocked_themes: BTreeSet::new(),
        }
    }
}

impl GameSettings {
    /// Creates settings with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the music volume, clamped to `[0.0, 1.0]`.
    pub fn with_music_volume(mut self, volume: f32) -> Self {
        self.music_volume = volume.clamp(0.0, 1.0);
        self
    }

    /// Sets the sound-effect volume, clamped to `[0.0, 1.0]`.
    pub fn with_sfx_volume(mut self, volume: f32) -> Self {
        self.sfx_volume = volume.clamp(0.0, 1.0);
        self
    }

    /// Marks a premium theme as unlocked.
    pub fn unlock_theme(&mut self, theme_id: impl Into<String>) {
        self.unlocked_themes.insert(theme_id.into());
    }

    /// Loads settings from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError`] if the file cannot be read or parsed.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        debug!("Loading settings");
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| SettingsError::new(format!("failed to read settings file: {}", e)))?;
        let settings: Self = toml::from_str(&content)
            .map_err(|e| SettingsError::new(format!("failed to parse settings: {}", e)))?;
        info!(theme = %settings.last_theme_id, "Settings loaded");
        Ok(settings)
    }

    /// Writes settings to a TOML file, replacing any existing content.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError`] if serialization or the write fails.
    #[instrument(skip(self, path), fields(path = %path.as_ref().display()))]
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), SettingsError> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| SettingsError::new(format!("failed to serialize settings: {}", e)))?;
        std::fs::write(path.as_ref(), content)
            .map_err(|e| SettingsError::new(format!("failed to write settings file: {}", e)))?;
        debug!("Settings saved");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = GameSettings::new();
        assert!(*settings.sound_enabled());
        assert_eq!(*settings.music_volume(), 0.7);
        assert_eq!(settings.last_theme_id(), "starlight_realm");
        assert!(settings.unlocked_themes().is_empty());
    }

    #[test]
    fn test_volume_clamped() {
        let settings = GameSettings::new().with_music_volume(1.8).with_sfx_volume(-0.3);
        assert_eq!(*settings.music_volume(), 1.0);
        assert_eq!(*settings.sfx_volume(), 0.0);
    }

    #[test]
    fn test_builder_setters() {
        let settings = GameSettings::new()
            .with_sound_enabled(false)
            .with_asmr_mode(true)
            .with_last_theme_id("tideglass");
        assert!(!settings.sound_enabled());
        assert!(*settings.asmr_mode());
        assert_eq!(settings.last_theme_id(), "tideglass");
    }

    #[test]
    fn test_unlock_theme() {
        let mut settings = GameSettings::new();
        settings.unlock_theme("ashwood");
        settings.unlock_theme("ashwood");
        assert_eq!(settings.unlocked_themes().len(), 1);
    }
}
