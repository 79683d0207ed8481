//! Error types
//!
//! Illegal moves are not errors: move application simply reports `false`.

use std::io;

/// Rejected board or session configuration
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid board size {width}x{height}")]
    InvalidSize { width: usize, height: usize },
    #[error("expected {expected} cells, got {actual}")]
    CellCount { expected: usize, actual: usize },
    #[error("cells are not a permutation of 0..{size}")]
    NotAPermutation { size: usize },
}

/// Game loop lifecycle failures
#[derive(thiserror::Error, Debug)]
pub enum LoopError {
    #[error("game loop is already running")]
    AlreadyRunning,
    #[error("failed to spawn game loop thread: {0}")]
    Spawn(#[from] io::Error),
}

/// Settings load/save failures
#[derive(thiserror::Error, Debug)]
pub enum SettingsError {
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    #[error("malformed settings: {0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Invalid(#[from] ConfigError),
}
