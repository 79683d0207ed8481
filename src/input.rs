//! Gesture classification
//!
//! Converts a press/release pair in board space into the touch point and
//! slide direction the game expects. A short movement counts as a tap.

use glam::Vec2;

use crate::consts::SWIPE_THRESHOLD;
use crate::sim::Direction;

/// Classify a gesture from its start and end points (board units)
pub fn classify_gesture(start: Vec2, end: Vec2) -> Direction {
    let delta = end - start;
    if delta.length() <= SWIPE_THRESHOLD {
        return Direction::Toward;
    }
    if delta.x.abs() > delta.y.abs() {
        if delta.x > 0.0 {
            Direction::Right
        } else {
            Direction::Left
        }
    } else if delta.y > 0.0 {
        Direction::Down
    } else {
        Direction::Up
    }
}

/// A pending press waiting for its release
#[derive(Debug, Clone, Default)]
pub struct GestureTracker {
    start: Option<Vec2>,
}

impl GestureTracker {
    pub fn new() -> Self {
        Self { start: None }
    }

    /// Pointer went down
    pub fn press(&mut self, point: Vec2) {
        self.start = Some(point);
    }

    /// Pointer went up; yields the touch point (where the gesture began) and direction
    pub fn release(&mut self, point: Vec2) -> Option<(Vec2, Direction)> {
        let start = self.start.take()?;
        Some((start, classify_gesture(start, point)))
    }

    pub fn cancel(&mut self) {
        self.start = None;
    }
}
