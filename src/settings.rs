//! Game settings and preferences
//!
//! Persisted separately from the high score through the `Storage` backend.

use serde::{Deserialize, Serialize};

use crate::input::KeyBindings;
use crate::persistence::Storage;

/// Volume change per options-screen step
pub const VOLUME_STEP: f32 = 0.1;

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Master volume (0.0 - 1.0)
    pub volume: f32,
    /// Key bindings for every action
    pub bindings: KeyBindings,
    /// Start rounds with god mode already on
    pub god_mode: bool,
    /// Fixed seed for reproducible runs (random when unset)
    pub seed: Option<u64>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            volume: 0.5,
            bindings: KeyBindings::default(),
            god_mode: false,
            seed: None,
        }
    }
}

impl Settings {
    pub fn volume_up(&mut self) {
        self.set_volume(self.volume + VOLUME_STEP);
    }

    pub fn volume_down(&mut self) {
        self.set_volume(self.volume - VOLUME_STEP);
    }

    /// Clamp to 0..=1 and snap to the step grid so repeated steps don't drift
    pub fn set_volume(&mut self, volume: f32) {
        let snapped = (volume / VOLUME_STEP).round() * VOLUME_STEP;
        self.volume = snapped.clamp(0.0, 1.0);
    }

    pub fn volume_percent(&self) -> u32 {
        (self.volume * 100.0).round() as u32
    }

    /// Load settings, falling back to defaults on any failure
    pub fn load(store: &dyn Storage) -> Self {
        match store.load_config() {
            Ok(Some(mut settings)) => {
                settings.set_volume(settings.volume);
                log::info!("Loaded settings");
                settings
            }
            Ok(None) => {
                log::info!("Using default settings");
                Self::default()
            }
            Err(e) => {
                log::warn!("Failed to load settings, using defaults: {}", e);
                Self::default()
            }
        }
    }

    /// Save settings; failures are logged and otherwise ignored
    pub fn save(&self, store: &mut dyn Storage) {
        match store.save_config(self) {
            Ok(()) => log::info!("Settings saved"),
            Err(e) => log::warn!("Failed to save settings: {}", e),
        }
    }
}
