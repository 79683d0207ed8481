//! Deterministic puzzle simulation
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Time only advances through caller-supplied deltas
//! - Seeded RNG only
//! - No rendering or platform dependencies

pub mod board;
pub mod game;
pub mod pattern;
pub mod snapshot;
pub mod tile;

pub use board::{Board, Direction, TileShift};
pub use game::{Game, GamePhase, SolvedCallback};
pub use pattern::AppearancePattern;
pub use snapshot::{GameSnapshot, TileView};
pub use tile::{Animation, AnimationKind, Tile, ease_out_cubic, ease_out_quad};
