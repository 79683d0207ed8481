//! Fifteen - A sliding-tile puzzle engine
//!
//! Core modules:
//! - `sim`: Deterministic puzzle simulation (board, tiles, animations, game session)
//! - `game_loop`: Fixed-cadence driver thread that ticks the session and requests redraws
//! - `input`: Gesture classification (swipe vs. tap)
//! - `settings`: Data-driven game configuration
//! - `records`: Completed-game records and the in-memory leaderboard

pub mod error;
pub mod game_loop;
pub mod input;
pub mod records;
pub mod settings;
pub mod sim;

pub use error::{ConfigError, LoopError, SettingsError};
pub use game_loop::{GameLoop, SharedGame};
pub use records::{GameRecord, Leaderboard, SavedGame};
pub use settings::Settings;

use std::time::Duration;

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    use std::time::Duration;

    /// Smallest allowed board edge
    pub const MIN_SIDE: usize = 2;
    /// Largest allowed board edge
    pub const MAX_SIDE: usize = 32;

    /// Default board dimensions (the classic 15-puzzle)
    pub const DEFAULT_WIDTH: usize = 4;
    pub const DEFAULT_HEIGHT: usize = 4;

    /// Target interval between game loop iterations (~60 Hz)
    pub const FRAME_INTERVAL: Duration = Duration::from_millis(16);
    /// One animation frame; all tile animation timings are multiples of it
    pub const ANIMATION_FRAME: Duration = Duration::from_millis(16);

    /// Appearance animation length in frames
    pub const APPEARANCE_FRAMES: u32 = 10;
    /// Slide animation length in frames
    pub const MOVEMENT_FRAMES: u32 = 7;
    /// Frames per unit of appearance delay
    pub const TILE_ANIM_FRAME_MULTIPLIER: u32 = 2;

    /// Number of appearance patterns cycled through on new games
    pub const APPEARANCE_PATTERNS: u32 = 10;

    /// A swipe must travel at least this fraction of a cell, otherwise it is a tap
    pub const SWIPE_THRESHOLD: f32 = 1.0 / 6.0;
}

/// Duration of `frames` animation frames
#[inline]
pub fn frames(frames: u32) -> Duration {
    consts::ANIMATION_FRAME * frames
}

/// Board-space position of a cell's top-left corner (one cell = 1.0)
#[inline]
pub fn cell_position(index: usize, width: usize) -> Vec2 {
    Vec2::new((index % width) as f32, (index / width) as f32)
}

/// Format elapsed play time for display: `m:ss.t`, or `h:mm:ss.t` past an hour
pub fn format_time(elapsed: Duration) -> String {
    let total_ms = elapsed.as_millis();
    let tenths = (total_ms / 100) % 10;
    let secs = (total_ms / 1000) % 60;
    let mins = (total_ms / 60_000) % 60;
    let hours = total_ms / 3_600_000;

    if hours > 0 {
        format!("{hours}:{mins:02}:{secs:02}.{tenths}")
    } else {
        format!("{mins}:{secs:02}.{tenths}")
    }
}
