//! Game settings and preferences
//!
//! Persisted separately from tuning in LocalStorage.

use serde::{Deserialize, Serialize};

use crate::tuning::Tuning;

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Visual Effects ===
    /// Bird trail behind the player
    pub trails: bool,

    // === Input ===
    /// `KeyboardEvent.code` that makes the bird jump
    pub jump_key: String,

    // === Audio ===
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,
    /// Background theme volume (0.0 - 1.0)
    pub music_volume: f32,
    pub muted: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            trails: true,
            jump_key: "Space".to_string(),

            master_volume: 1.0,
            sfx_volume: 1.0,
            music_volume: 0.2,
            muted: false,
        }
    }
}

impl Settings {
    /// Volume applied to the background theme at round start
    pub fn theme_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            (self.master_volume * self.music_volume).clamp(0.0, 1.0)
        }
    }

    /// Volume for one-shot effects
    pub fn effects_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            (self.master_volume * self.sfx_volume).clamp(0.0, 1.0)
        }
    }

    /// Tuning with preference overrides applied (trail off = zero capacity)
    pub fn apply_to(&self, tuning: &Tuning) -> Tuning {
        let mut tuning = tuning.clone();
        if !self.trails {
            tuning.trail_capacity = 0;
        }
        tuning
    }

    /// Parse a stored settings document; `None` if it is malformed
    pub fn from_stored(json: &str) -> Option<Self> {
        match serde_json::from_str(json) {
            Ok(settings) => Some(settings),
            Err(e) => {
                log::warn!("Ignoring stored settings: {e}");
                None
            }
        }
    }

    /// LocalStorage key
    #[cfg(target_arch = "wasm32")]
    const STORAGE_KEY: &'static str = "flappy_run_settings";

    /// Load settings from LocalStorage, falling back to defaults
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let stored = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten()
            .and_then(|storage| storage.get_item(Self::STORAGE_KEY).ok().flatten());

        if let Some(settings) = stored.as_deref().and_then(Self::from_stored) {
            log::info!("Loaded settings from LocalStorage");
            return settings;
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Native builds have no settings store
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_theme_volume() {
        let settings = Settings::default();
        assert!((settings.theme_volume() - 0.2).abs() < 1e-6);
        assert_eq!(settings.jump_key, "Space");
    }

    #[test]
    fn test_muted_silences_everything() {
        let settings = Settings {
            muted: true,
            ..Settings::default()
        };
        assert_eq!(settings.theme_volume(), 0.0);
        assert_eq!(settings.effects_volume(), 0.0);
    }

    #[test]
    fn test_volume_is_clamped() {
        let settings = Settings {
            master_volume: 3.0,
            music_volume: 1.0,
            ..Settings::default()
        };
        assert_eq!(settings.theme_volume(), 1.0);
    }

    #[test]
    fn test_trails_off_zeroes_capacity() {
        let settings = Settings {
            trails: false,
            ..Settings::default()
        };
        assert_eq!(settings.apply_to(&Tuning::default()).trail_capacity, 0);
        assert_eq!(Settings::default().apply_to(&Tuning::default()).trail_capacity, 200);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let settings: Settings = serde_json::from_str(r#"{ "muted": true }"#).unwrap();
        assert!(settings.muted);
        assert!(settings.trails);
    }

    #[test]
    fn test_stored_settings() {
        let settings = Settings::from_stored(r#"{ "jump_key": "ArrowUp", "trails": false }"#).unwrap();
        assert_eq!(settings.jump_key, "ArrowUp");
        assert!(!settings.trails);
        assert_eq!(settings.music_volume, 0.2);

        assert_eq!(Settings::from_stored("not json"), None);
    }
}
