//! Game settings and preferences
//!
//! Stored as JSON. A missing or broken settings file falls back to defaults.

use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::consts::{DEFAULT_HEIGHT, DEFAULT_WIDTH, FRAME_INTERVAL};
use crate::error::{ConfigError, SettingsError};
use crate::sim::board::validate_size;

/// Common board presets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum BoardPreset {
    /// 3x3
    Eight,
    /// 4x4
    #[default]
    Fifteen,
    /// 5x5
    TwentyFour,
}

impl BoardPreset {
    pub fn as_str(&self) -> &'static str {
        match self {
            BoardPreset::Eight => "8-puzzle",
            BoardPreset::Fifteen => "15-puzzle",
            BoardPreset::TwentyFour => "24-puzzle",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "8" | "3x3" | "eight" => Some(BoardPreset::Eight),
            "15" | "4x4" | "fifteen" => Some(BoardPreset::Fifteen),
            "24" | "5x5" | "twenty-four" => Some(BoardPreset::TwentyFour),
            _ => None,
        }
    }

    /// Board dimensions (width, height)
    pub fn dimensions(&self) -> (usize, usize) {
        match self {
            BoardPreset::Eight => (3, 3),
            BoardPreset::Fifteen => (4, 4),
            BoardPreset::TwentyFour => (5, 5),
        }
    }
}

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Board ===
    pub width: usize,
    pub height: usize,
    /// Skip the solvability fix-up when shuffling
    pub hard_mode: bool,
    /// Presentation-defined game mode, carried into records
    pub game_mode: u32,

    // === Visuals ===
    /// Tile appearance and slide animations
    pub animations: bool,
    /// Game loop frame interval in milliseconds
    pub frame_interval_ms: u64,

    // === HUD ===
    /// Report FPS as diagnostic text
    pub show_fps: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            hard_mode: false,
            game_mode: 0,

            animations: true,
            frame_interval_ms: FRAME_INTERVAL.as_millis() as u64,

            show_fps: false,
        }
    }
}

impl Settings {
    /// Create settings from a board preset
    pub fn from_preset(preset: BoardPreset) -> Self {
        let mut settings = Self::default();
        settings.apply_preset(preset);
        settings
    }

    pub fn apply_preset(&mut self, preset: BoardPreset) {
        (self.width, self.height) = preset.dimensions();
    }

    /// Check board dimensions
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_size(self.width, self.height)
    }

    /// Frame interval, never below one millisecond
    pub fn frame_interval(&self) -> Duration {
        Duration::from_millis(self.frame_interval_ms.max(1))
    }

    /// Parse and validate settings from JSON
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn to_json(&self) -> Result<String, SettingsError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Read settings from a file
    pub fn try_load(path: &Path) -> Result<Self, SettingsError> {
        let json = fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Load settings from a file, falling back to defaults
    pub fn load(path: &Path) -> Self {
        match Self::try_load(path) {
            Ok(settings) => {
                log::info!("Loaded settings from {}", path.display());
                settings
            }
            Err(e) => {
                log::info!("Using default settings ({})", e);
                Self::default()
            }
        }
    }

    /// Write settings to a file
    pub fn save(&self, path: &Path) -> Result<(), SettingsError> {
        fs::write(path, self.to_json()?)?;
        log::info!("Settings saved to {}", path.display());
        Ok(())
    }
}
