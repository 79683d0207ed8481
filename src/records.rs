//! Completed-game records and leaderboard
//!
//! The engine hands these to the persistence layer; how they are stored is
//! up to that layer. The leaderboard keeps the top 10 per board configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Maximum number of records kept per configuration
pub const MAX_RECORDS: usize = 10;

/// A finished (solved) game
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameRecord {
    /// Presentation-defined game mode
    pub mode: u32,
    pub width: usize,
    pub height: usize,
    pub hard_mode: bool,
    pub moves: u32,
    /// Play time in milliseconds
    pub time_ms: u64,
}

impl GameRecord {
    #[inline]
    pub fn time(&self) -> Duration {
        Duration::from_millis(self.time_ms)
    }

    /// Same mode, dimensions and difficulty
    pub fn same_config(&self, other: &GameRecord) -> bool {
        self.mode == other.mode
            && self.width == other.width
            && self.height == other.height
            && self.hard_mode == other.hard_mode
    }

    /// Faster wins; fewer moves breaks ties
    fn beats(&self, other: &GameRecord) -> bool {
        (self.time_ms, self.moves) < (other.time_ms, other.moves)
    }
}

/// An unfinished game that can seed a new session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedGame {
    pub cells: Vec<u32>,
    pub moves: u32,
    pub time_ms: u64,
}

impl SavedGame {
    #[inline]
    pub fn time(&self) -> Duration {
        Duration::from_millis(self.time_ms)
    }
}

/// Best games, ordered best-first
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Leaderboard {
    entries: Vec<GameRecord>,
}

impl Leaderboard {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Records for one configuration, best first
    pub fn top<'a>(&'a self, config: &'a GameRecord) -> impl Iterator<Item = &'a GameRecord> + 'a {
        self.entries.iter().filter(move |e| e.same_config(config))
    }

    /// Check if a record would make the board
    pub fn qualifies(&self, record: &GameRecord) -> bool {
        let mut same = self.top(record);
        match same.nth(MAX_RECORDS - 1) {
            Some(worst) => record.beats(worst),
            None => true,
        }
    }

    /// Rank a record would achieve (1-indexed, None if it doesn't qualify)
    pub fn potential_rank(&self, record: &GameRecord) -> Option<usize> {
        if !self.qualifies(record) {
            return None;
        }
        Some(self.top(record).filter(|e| !record.beats(e)).count() + 1)
    }

    /// Add a record; returns its rank or None if it didn't qualify
    pub fn add(&mut self, record: GameRecord) -> Option<usize> {
        let rank = self.potential_rank(&record)?;

        let pos = self
            .entries
            .iter()
            .position(|e| record.beats(e))
            .unwrap_or(self.entries.len());
        self.entries.insert(pos, record.clone());

        // Trim the configuration back to size
        let overflow = self
            .entries
            .iter()
            .enumerate()
            .filter(|(_, e)| e.same_config(&record))
            .nth(MAX_RECORDS)
            .map(|(i, _)| i);
        if let Some(i) = overflow {
            self.entries.remove(i);
        }

        log::info!(
            "New {}x{} record #{}: {} moves in {:?}",
            record.width,
            record.height,
            rank,
            record.moves,
            record.time()
        );
        Some(rank)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}
