//! Read-only view of a game handed to the presentation layer each frame

use std::time::Duration;

use glam::Vec2;
use serde::Serialize;

use super::game::GamePhase;

/// Drawable state of one tile
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TileView {
    pub number: u32,
    /// Logical cell
    pub index: usize,
    /// Board-space top-left corner (one cell = 1.0)
    pub position: Vec2,
    /// Appearance scale in [0, 1]
    pub scale: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GameSnapshot {
    pub width: usize,
    pub height: usize,
    pub cells: Vec<u32>,
    pub tiles: Vec<TileView>,
    pub moves: u32,
    pub elapsed: Duration,
    pub phase: GamePhase,
    pub hard_mode: bool,
}

impl GameSnapshot {
    /// Any tile still animating
    pub fn is_animating(&self) -> bool {
        self.tiles
            .iter()
            .any(|t| t.scale < 1.0 || t.position != crate::cell_position(t.index, self.width))
    }
}
