//! Tile visual state
//!
//! A tile's logical cell always matches the board; its animation only
//! describes how the presentation layer should get it there. Animations are
//! advanced by caller-supplied deltas and never sample the clock.

use std::time::Duration;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::board::Direction;
use crate::cell_position;
use crate::consts::{APPEARANCE_FRAMES, MOVEMENT_FRAMES};
use crate::frames;

/// What an animation interpolates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum AnimationKind {
    /// Scale up from nothing after an initial delay
    Appearance,
    /// Slide between two board-space positions
    Movement {
        from: Vec2,
        to: Vec2,
        /// Informational only; does not affect the outcome
        direction: Direction,
    },
}

/// A single in-flight transition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Animation {
    pub kind: AnimationKind,
    pub delay: Duration,
    pub duration: Duration,
    elapsed: Duration,
}

impl Animation {
    pub fn appearance(delay: Duration) -> Self {
        Self {
            kind: AnimationKind::Appearance,
            delay,
            duration: frames(APPEARANCE_FRAMES),
            elapsed: Duration::ZERO,
        }
    }

    pub fn movement(from: Vec2, to: Vec2, direction: Direction) -> Self {
        Self {
            kind: AnimationKind::Movement {
                from,
                to,
                direction,
            },
            delay: Duration::ZERO,
            duration: frames(MOVEMENT_FRAMES),
            elapsed: Duration::ZERO,
        }
    }

    #[inline]
    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    pub fn advance(&mut self, dt: Duration) {
        self.elapsed = self.elapsed.saturating_add(dt);
    }

    /// Still waiting out the initial delay
    #[inline]
    pub fn is_pending(&self) -> bool {
        self.elapsed < self.delay
    }

    #[inline]
    pub fn is_finished(&self) -> bool {
        self.elapsed >= self.delay.saturating_add(self.duration)
    }

    /// Linear progress in [0, 1] past the delay
    pub fn progress(&self) -> f32 {
        if self.is_pending() {
            return 0.0;
        }
        if self.duration.is_zero() {
            return 1.0;
        }
        let active = self.elapsed - self.delay;
        (active.as_secs_f32() / self.duration.as_secs_f32()).min(1.0)
    }
}

/// Ease-out cubic (fast start, soft landing)
#[inline]
pub fn ease_out_cubic(t: f32) -> f32 {
    let inv = 1.0 - t.clamp(0.0, 1.0);
    1.0 - inv * inv * inv
}

/// Ease-out quadratic
#[inline]
pub fn ease_out_quad(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    t * (2.0 - t)
}

/// A numbered tile (the empty slot has no tile)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tile {
    pub number: u32,
    index: usize,
    animation: Option<Animation>,
}

impl Tile {
    pub fn new(number: u32, index: usize) -> Self {
        Self {
            number,
            index,
            animation: None,
        }
    }

    /// Cell this tile occupies on the board
    #[inline]
    pub fn index(&self) -> usize {
        self.index
    }

    #[inline]
    pub fn animation(&self) -> Option<&Animation> {
        self.animation.as_ref()
    }

    /// No transition in flight
    #[inline]
    pub fn is_settled(&self) -> bool {
        self.animation.is_none()
    }

    pub fn animate_appearance(&mut self, delay: Duration) {
        self.animation = Some(Animation::appearance(delay));
    }

    /// Retarget to `to`. A tile already sliding starts from where it is drawn now.
    pub fn animate_movement(&mut self, from: usize, to: usize, direction: Direction, width: usize) {
        let sliding = matches!(
            self.animation.as_ref().map(|a| a.kind),
            Some(AnimationKind::Movement { .. })
        );
        let start = if sliding {
            self.position(width)
        } else {
            cell_position(from, width)
        };
        self.index = to;
        self.animation = Some(Animation::movement(
            start,
            cell_position(to, width),
            direction,
        ));
    }

    /// Jump straight to `to` with no transition
    pub fn place(&mut self, to: usize) {
        self.index = to;
        self.animation = None;
    }

    pub fn advance(&mut self, dt: Duration) {
        if let Some(animation) = self.animation.as_mut() {
            animation.advance(dt);
            if animation.is_finished() {
                self.animation = None;
            }
        }
    }

    /// Board-space position to draw at
    pub fn position(&self, width: usize) -> Vec2 {
        if let Some(animation) = &self.animation {
            if let AnimationKind::Movement { from, to, .. } = animation.kind {
                return from.lerp(to, ease_out_cubic(animation.progress()));
            }
        }
        cell_position(self.index, width)
    }

    /// Draw scale in [0, 1]; zero while an appearance is still delayed
    pub fn scale(&self) -> f32 {
        match &self.animation {
            Some(animation) if animation.kind == AnimationKind::Appearance => {
                if animation.is_pending() {
                    0.0
                } else {
                    ease_out_quad(animation.progress())
                }
            }
            _ => 1.0,
        }
    }

    #[inline]
    pub fn is_visible(&self) -> bool {
        self.scale() > 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FRAME: Duration = crate::consts::ANIMATION_FRAME;

    #[test]
    fn test_appearance_lifecycle() {
        let mut tile = Tile::new(1, 0);
        tile.animate_appearance(FRAME * 4);
        assert!(!tile.is_settled());
        assert!(!tile.is_visible());

        tile.advance(FRAME * 3);
        assert_eq!(tile.scale(), 0.0);

        tile.advance(FRAME);
        // Delay just elapsed, interpolation starts at zero
        assert_eq!(tile.scale(), 0.0);

        tile.advance(FRAME * (APPEARANCE_FRAMES / 2));
        let mid = tile.scale();
        assert!(mid > 0.0 && mid < 1.0);

        tile.advance(FRAME * APPEARANCE_FRAMES);
        assert!(tile.is_settled());
        assert_eq!(tile.scale(), 1.0);
    }

    #[test]
    fn test_huge_delay_never_finishes() {
        let mut tile = Tile::new(2, 1);
        tile.animate_appearance(Duration::MAX);
        tile.advance(FRAME * 100);
        assert!(!tile.is_settled());
        assert_eq!(tile.scale(), 0.0);
        assert!(!tile.animation().unwrap().is_finished());
    }

    #[test]
    fn test_appearance_without_delay() {
        let mut tile = Tile::new(3, 2);
        tile.animate_appearance(Duration::ZERO);
        tile.advance(FRAME);
        assert!(tile.is_visible());
    }

    #[test]
    fn test_movement_interpolates_monotonically() {
        let mut tile = Tile::new(5, 1);
        tile.animate_movement(1, 0, Direction::Left, 4);
        assert_eq!(tile.index(), 0);
        assert_eq!(tile.position(4), Vec2::new(1.0, 0.0));

        let mut last = tile.position(4).x;
        for _ in 0..MOVEMENT_FRAMES {
            tile.advance(FRAME);
            let x = tile.position(4).x;
            assert!(x <= last);
            last = x;
        }
        assert!(tile.is_settled());
        assert_eq!(tile.position(4), Vec2::new(0.0, 0.0));
    }

    #[test]
    fn test_movement_retarget_starts_from_drawn_position() {
        let mut tile = Tile::new(2, 0);
        tile.animate_movement(0, 1, Direction::Right, 3);
        tile.advance(FRAME * 2);
        let drawn = tile.position(3);
        assert!(drawn.x > 0.0 && drawn.x < 1.0);

        tile.animate_movement(1, 0, Direction::Left, 3);
        assert_eq!(tile.position(3), drawn);
        assert_eq!(tile.index(), 0);
    }

    #[test]
    fn test_direction_does_not_change_outcome() {
        let mut a = Tile::new(7, 4);
        let mut b = Tile::new(7, 4);
        a.animate_movement(4, 1, Direction::Up, 3);
        b.animate_movement(4, 1, Direction::Toward, 3);
        for _ in 0..3 {
            a.advance(FRAME);
            b.advance(FRAME);
            assert_eq!(a.position(3), b.position(3));
        }
    }

    #[test]
    fn test_place_clears_animation() {
        let mut tile = Tile::new(1, 0);
        tile.animate_appearance(FRAME);
        tile.place(3);
        assert!(tile.is_settled());
        assert_eq!(tile.index(), 3);
        assert_eq!(tile.scale(), 1.0);
    }

    #[test]
    fn test_easing_bounds() {
        assert_eq!(ease_out_cubic(0.0), 0.0);
        assert_eq!(ease_out_cubic(1.0), 1.0);
        assert_eq!(ease_out_quad(0.0), 0.0);
        assert_eq!(ease_out_quad(1.0), 1.0);
        assert!(ease_out_cubic(0.5) > 0.5);
    }
}
