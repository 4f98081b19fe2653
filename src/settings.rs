//! Player settings and profile
//!
//! Persisted separately from high scores. The customization blob belongs to
//! the menu UI and is stored as-is without being interpreted.

use serde::{Deserialize, Serialize};

use crate::persistence::{self, Storage};

/// Longest accepted username, in characters
pub const MAX_USERNAME_LEN: usize = 16;

/// Shown when no username is set
pub const DEFAULT_PLAYER_NAME: &str = "Potato";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Show FPS counter
    pub show_fps: bool,
    /// Reduced motion (no death flash)
    pub reduced_motion: bool,
    /// Name recorded with high scores
    pub username: Option<String>,
    /// Opaque character customization data
    pub customization: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            show_fps: true,
            reduced_motion: false,
            username: None,
            customization: None,
        }
    }
}

impl Settings {
    pub const STORAGE_KEY: &'static str = "jumping_potato_settings";

    /// Set the username. Whitespace is trimmed, empty clears it, and long
    /// names are cut to `MAX_USERNAME_LEN` characters.
    pub fn set_username(&mut self, name: &str) {
        let name: String = name.trim().chars().take(MAX_USERNAME_LEN).collect();
        self.username = if name.is_empty() { None } else { Some(name) };
    }

    /// Name to show on the leaderboard
    pub fn display_name(&self) -> &str {
        self.username.as_deref().unwrap_or(DEFAULT_PLAYER_NAME)
    }

    /// Store the customization blob. Empty input clears it.
    pub fn set_customization(&mut self, blob: Option<String>) {
        self.customization = blob.filter(|b| !b.trim().is_empty());
    }

    pub fn load(storage: &dyn Storage) -> Self {
        let settings = persistence::load_or_default(storage, Self::STORAGE_KEY);
        log::info!("Settings loaded");
        settings
    }

    pub fn save(&self, storage: &mut dyn Storage) {
        match persistence::save_json(storage, Self::STORAGE_KEY, self) {
            Ok(()) => log::info!("Settings saved"),
            Err(e) => log::warn!("Failed to save settings: {}", e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryStorage;

    #[test]
    fn test_username_rules() {
        let mut settings = Settings::default();
        assert_eq!(settings.display_name(), "Potato");

        settings.set_username("  Spud  ");
        assert_eq!(settings.username.as_deref(), Some("Spud"));

        settings.set_username("   ");
        assert!(settings.username.is_none());

        settings.set_username("abcdefghijklmnopqrstuvwxyz");
        assert_eq!(settings.username.as_deref(), Some("abcdefghijklmnop"));
    }

    #[test]
    fn test_customization_is_stored_verbatim() {
        let mut storage = MemoryStorage::new();
        let mut settings = Settings::default();
        let blob = r##"{"hat":"beanie","color":"#c8a165"}"##.to_string();
        settings.set_customization(Some(blob.clone()));
        settings.save(&mut storage);

        let loaded = Settings::load(&storage);
        assert_eq!(loaded.customization, Some(blob));
        assert_eq!(loaded, settings);
    }

    #[test]
    fn test_blank_customization_clears() {
        let mut settings = Settings::default();
        settings.set_customization(Some("#ff0000".to_string()));
        assert_eq!(settings.customization.as_deref(), Some("#ff0000"));

        settings.set_customization(Some("  ".to_string()));
        assert!(settings.customization.is_none());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let mut storage = MemoryStorage::new();
        storage
            .set(Settings::STORAGE_KEY, r#"{"reduced_motion":true}"#)
            .unwrap();

        let settings = Settings::load(&storage);
        assert!(settings.reduced_motion);
        assert!(settings.show_fps);
        assert!(settings.username.is_none());
    }
}
