//! Game session state machine
//!
//! Owns the board and its tiles, counts moves, accumulates play time and
//! announces the solve. Everything here is driven by explicit calls; there is
//! no clock and no global state.

use std::fmt;
use std::time::Duration;

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::board::{Board, Direction};
use super::pattern::AppearancePattern;
use super::snapshot::{GameSnapshot, TileView};
use super::tile::Tile;
use crate::consts::TILE_ANIM_FRAME_MULTIPLIER;
use crate::error::ConfigError;
use crate::frames;
use crate::records::{GameRecord, SavedGame};
use crate::settings::Settings;

/// Current phase of the session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Accepting moves, clock running
    Active,
    /// Moves ignored, clock frozen
    Paused,
    /// Terminal until the next new game
    Solved,
}

/// Observer invoked once when the board becomes solved, with the finished game
pub type SolvedCallback = Box<dyn FnMut(&GameRecord) + Send>;

/// A single puzzle session
pub struct Game {
    board: Board,
    /// Indexed by `number - 1`
    tiles: Vec<Tile>,
    moves: u32,
    elapsed: Duration,
    phase: GamePhase,
    hard_mode: bool,
    animations: bool,
    mode: u32,
    rng: Pcg32,
    pattern_cycle: u32,
    observers: Vec<SolvedCallback>,
}

impl fmt::Debug for Game {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Game")
            .field("board", &self.board)
            .field("moves", &self.moves)
            .field("elapsed", &self.elapsed)
            .field("phase", &self.phase)
            .field("hard_mode", &self.hard_mode)
            .field("observers", &self.observers.len())
            .finish_non_exhaustive()
    }
}

impl Game {
    /// Create and deal a new game with the given seed
    pub fn new(width: usize, height: usize, hard_mode: bool, seed: u64) -> Result<Self, ConfigError> {
        let mut game = Self {
            board: Board::new(width, height)?,
            tiles: Vec::new(),
            moves: 0,
            elapsed: Duration::ZERO,
            phase: GamePhase::Active,
            hard_mode,
            animations: true,
            mode: 0,
            rng: Pcg32::seed_from_u64(seed),
            pattern_cycle: 0,
            observers: Vec::new(),
        };
        game.new_game(width, height, hard_mode)?;
        Ok(game)
    }

    /// Create a game from user settings
    pub fn from_settings(settings: &Settings, seed: u64) -> Result<Self, ConfigError> {
        settings.validate()?;
        let mut game = Self::new(settings.width, settings.height, settings.hard_mode, seed)?;
        game.mode = settings.game_mode;
        game.set_animations(settings.animations);
        if !settings.animations {
            game.settle_tiles();
        }
        Ok(game)
    }

    /// Start over with a freshly shuffled board
    pub fn new_game(&mut self, width: usize, height: usize, hard_mode: bool) -> Result<(), ConfigError> {
        let mut board = Board::new(width, height)?;
        board.shuffle(hard_mode, &mut self.rng);

        self.board = board;
        self.hard_mode = hard_mode;
        self.moves = 0;
        self.elapsed = Duration::ZERO;
        self.phase = GamePhase::Active;
        self.spawn_tiles();

        log::info!(
            "New game {}x{} (hard_mode={}, solvable={})",
            width,
            height,
            hard_mode,
            self.board.is_solvable()
        );
        Ok(())
    }

    /// Restore an unfinished game on the current board dimensions.
    ///
    /// A game with moves on the clock resumes paused.
    pub fn load(&mut self, cells: &[u32], moves: u32, elapsed: Duration) -> Result<(), ConfigError> {
        let board = Board::from_cells(self.board.width(), self.board.height(), cells.to_vec())?;

        self.board = board;
        self.moves = moves;
        self.elapsed = elapsed;
        self.phase = if self.board.is_solved() {
            GamePhase::Solved
        } else if moves > 0 {
            GamePhase::Paused
        } else {
            GamePhase::Active
        };
        self.spawn_tiles();

        log::info!(
            "Loaded {}x{} game ({} moves, {:?})",
            self.board.width(),
            self.board.height(),
            moves,
            elapsed
        );
        Ok(())
    }

    /// Restore from a persisted save
    pub fn load_saved(&mut self, saved: &SavedGame) -> Result<(), ConfigError> {
        self.load(&saved.cells, saved.moves, saved.time())
    }

    /// Build tiles for the current board and deal them in with the next appearance pattern
    fn spawn_tiles(&mut self) {
        let width = self.board.width();
        let height = self.board.height();

        let mut tiles: Vec<Tile> = (1..self.board.size() as u32)
            .map(|n| Tile::new(n, 0))
            .collect();
        for (index, &number) in self.board.cells().iter().enumerate() {
            if number > 0 {
                tiles[number as usize - 1].place(index);
            }
        }

        self.pattern_cycle = self.pattern_cycle.wrapping_add(1);
        if self.animations {
            let pattern = AppearancePattern::from_cycle(self.pattern_cycle);
            log::debug!("Appearance pattern {:?}", pattern);
            for (index, &number) in self.board.cells().iter().enumerate() {
                if number == 0 {
                    continue;
                }
                let units = pattern.delay_units(index, number, width, height, &mut self.rng);
                tiles[number as usize - 1]
                    .animate_appearance(frames(units * TILE_ANIM_FRAME_MULTIPLIER));
            }
        }

        self.tiles = tiles;
    }

    /// Drop all in-flight animations
    pub fn settle_tiles(&mut self) {
        for tile in &mut self.tiles {
            let index = tile.index();
            tile.place(index);
        }
    }

    /// Apply a gesture at a board-space point (one cell = 1.0)
    pub fn apply_move(&mut self, point: Vec2, direction: Direction) -> bool {
        match self.board.index_at(point) {
            Some(index) => self.apply_move_at(index, direction),
            None => false,
        }
    }

    /// Apply a gesture on a cell. Returns false if nothing moved.
    pub fn apply_move_at(&mut self, index: usize, direction: Direction) -> bool {
        if self.phase != GamePhase::Active {
            return false;
        }

        let path = self.board.legal_slide(index, direction);
        if path.is_empty() {
            return false;
        }

        let shifts = self.board.apply(&path);
        self.moves += 1;

        let width = self.board.width();
        for shift in &shifts {
            let Some(tile) = self.tiles.get_mut(shift.number as usize - 1) else {
                continue;
            };
            if self.animations {
                let direction = Direction::between(shift.from, shift.to, width);
                tile.animate_movement(shift.from, shift.to, direction, width);
            } else {
                tile.place(shift.to);
            }
        }
        log::debug!(
            "Move {}: {} tile(s) from cell {} ({:?})",
            self.moves,
            shifts.len(),
            index,
            direction
        );

        if self.board.is_solved() {
            self.phase = GamePhase::Solved;
            log::info!("Solved in {} moves, {:?}", self.moves, self.elapsed);
            if let Some(record) = self.record() {
                for observer in &mut self.observers {
                    observer(&record);
                }
            }
        }
        true
    }

    /// Accumulate play time (only while active)
    pub fn tick(&mut self, dt: Duration) {
        if self.phase == GamePhase::Active {
            self.elapsed = self.elapsed.saturating_add(dt);
        }
    }

    /// Advance every tile animation; runs regardless of phase
    pub fn advance_animations(&mut self, dt: Duration) {
        for tile in &mut self.tiles {
            tile.advance(dt);
        }
    }

    /// One frame: clock, animations, then a snapshot for drawing
    pub fn step(&mut self, dt: Duration) -> GameSnapshot {
        self.tick(dt);
        self.advance_animations(dt);
        self.snapshot()
    }

    /// Pause or resume. Pausing an unstarted or finished game does nothing.
    pub fn set_paused(&mut self, paused: bool) {
        self.phase = match (self.phase, paused) {
            (GamePhase::Active, true) if self.moves > 0 => GamePhase::Paused,
            (GamePhase::Paused, false) => GamePhase::Active,
            (phase, _) => phase,
        };
    }

    pub fn invert_paused(&mut self) {
        self.set_paused(!self.is_paused());
    }

    /// Register a solve observer.
    ///
    /// Observers run inside `apply_move`, so under `SharedGame`'s lock they
    /// must not lock the session again; everything they need is in the record.
    pub fn on_solved<F>(&mut self, callback: F)
    where
        F: FnMut(&GameRecord) + Send + 'static,
    {
        self.observers.push(Box::new(callback));
    }

    pub fn set_animations(&mut self, enabled: bool) {
        self.animations = enabled;
    }

    pub fn set_mode(&mut self, mode: u32) {
        self.mode = mode;
    }

    #[inline]
    pub fn board(&self) -> &Board {
        &self.board
    }

    #[inline]
    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    /// Tile carrying `number`
    pub fn tile(&self, number: u32) -> Option<&Tile> {
        number
            .checked_sub(1)
            .and_then(|i| self.tiles.get(i as usize))
    }

    #[inline]
    pub fn moves(&self) -> u32 {
        self.moves
    }

    #[inline]
    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    #[inline]
    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    #[inline]
    pub fn is_paused(&self) -> bool {
        self.phase == GamePhase::Paused
    }

    #[inline]
    pub fn is_solved(&self) -> bool {
        self.phase == GamePhase::Solved
    }

    #[inline]
    pub fn hard_mode(&self) -> bool {
        self.hard_mode
    }

    /// Result of a solved game for the persistence layer
    pub fn record(&self) -> Option<GameRecord> {
        self.is_solved().then(|| GameRecord {
            mode: self.mode,
            width: self.board.width(),
            height: self.board.height(),
            hard_mode: self.hard_mode,
            moves: self.moves,
            time_ms: self.elapsed.as_millis() as u64,
        })
    }

    /// Resumable state of an unfinished game
    pub fn saved_game(&self) -> Option<SavedGame> {
        (!self.is_solved()).then(|| SavedGame {
            cells: self.board.cells().to_vec(),
            moves: self.moves,
            time_ms: self.elapsed.as_millis() as u64,
        })
    }

    pub fn snapshot(&self) -> GameSnapshot {
        let width = self.board.width();
        GameSnapshot {
            width,
            height: self.board.height(),
            cells: self.board.cells().to_vec(),
            tiles: self
                .tiles
                .iter()
                .map(|t| TileView {
                    number: t.number,
                    index: t.index(),
                    position: t.position(width),
                    scale: t.scale(),
                })
                .collect(),
            moves: self.moves,
            elapsed: self.elapsed,
            phase: self.phase,
            hard_mode: self.hard_mode,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicU32, Ordering};

    const ONE_MOVE_FROM_SOLVED: [u32; 16] = [1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 0, 15];

    fn counting_game(cells: &[u32]) -> (Game, Arc<AtomicU32>) {
        let mut game = Game::new(4, 4, false, 12345).unwrap();
        game.load(cells, 0, Duration::ZERO).unwrap();
        let fired = Arc::new(AtomicU32::new(0));
        let counter = fired.clone();
        game.on_solved(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        (game, fired)
    }

    fn assert_tiles_match_board(game: &Game) {
        for tile in game.tiles() {
            assert_eq!(game.board().value_at(tile.index()), Some(tile.number));
        }
    }

    #[test]
    fn test_new_game_is_fresh() {
        let game = Game::new(4, 4, false, 1).unwrap();
        assert_eq!(game.phase(), GamePhase::Active);
        assert_eq!(game.moves(), 0);
        assert_eq!(game.elapsed(), Duration::ZERO);
        assert!(!game.board().is_solved());
        assert!(game.board().is_solvable());
        assert_eq!(game.tiles().len(), 15);
        assert_tiles_match_board(&game);
    }

    #[test]
    fn test_invalid_size_rejected() {
        assert_eq!(
            Game::new(1, 5, false, 1).unwrap_err(),
            ConfigError::InvalidSize { width: 1, height: 5 }
        );
        let mut game = Game::new(3, 3, false, 1).unwrap();
        assert!(game.new_game(3, 1, false).is_err());
        assert_eq!(game.board().width(), 3);
    }

    #[test]
    fn test_same_seed_same_game() {
        let a = Game::new(5, 4, false, 99).unwrap();
        let b = Game::new(5, 4, false, 99).unwrap();
        assert_eq!(a.board(), b.board());
        assert_eq!(a.snapshot(), b.snapshot());
    }

    #[test]
    fn test_winning_move_fires_once() {
        let (mut game, fired) = counting_game(&ONE_MOVE_FROM_SOLVED);
        assert_eq!(game.board().empty_index(), 14);

        // Center of cell 15 (col 3, row 3)
        assert!(game.apply_move(Vec2::new(3.5, 3.5), Direction::Toward));
        assert_eq!(game.board().empty_index(), 15);
        assert_eq!(game.moves(), 1);
        assert!(game.board().is_solved());
        assert!(game.is_solved());
        assert_eq!(fired.load(Ordering::SeqCst), 1);

        // Solved is terminal: no further moves, no clock, no second notification
        assert!(!game.apply_move_at(11, Direction::Toward));
        assert!(!game.apply_move_at(14, Direction::Toward));
        game.tick(Duration::from_secs(5));
        assert_eq!(game.elapsed(), Duration::ZERO);
        assert_eq!(game.moves(), 1);
        assert_eq!(fired.load(Ordering::SeqCst), 1);

        let record = game.record().unwrap();
        assert_eq!((record.width, record.height, record.moves), (4, 4, 1));
        assert!(game.saved_game().is_none());
    }

    #[test]
    fn test_every_observer_notified() {
        let (mut game, fired) = counting_game(&ONE_MOVE_FROM_SOLVED);
        let counter = fired.clone();
        game.on_solved(move |_| {
            counter.fetch_add(10, Ordering::SeqCst);
        });
        assert!(game.apply_move_at(15, Direction::Left));
        assert_eq!(fired.load(Ordering::SeqCst), 11);
    }

    #[test]
    fn test_observer_receives_record() {
        let mut game = Game::new(4, 4, true, 12345).unwrap();
        game.set_mode(3);
        game.load(&ONE_MOVE_FROM_SOLVED, 41, Duration::from_millis(2500)).unwrap();
        game.set_paused(false);

        let (tx, rx) = std::sync::mpsc::channel();
        game.on_solved(move |record| {
            let _ = tx.send(record.clone());
        });
        assert!(game.apply_move_at(15, Direction::Left));

        let record = rx.try_recv().unwrap();
        assert_eq!(Some(record.clone()), game.record());
        assert_eq!((record.mode, record.moves, record.time_ms), (3, 42, 2500));
        assert!(record.hard_mode);
    }

    #[test]
    fn test_unaligned_touch_is_noop() {
        let mut game = Game::new(3, 2, false, 5).unwrap();
        game.load(&[1, 2, 3, 4, 0, 5], 0, Duration::ZERO).unwrap();
        let before = game.board().clone();

        // Index 0 shares neither row nor column with the blank at index 4
        assert!(game.board().legal_slide(0, Direction::Toward).is_empty());
        assert!(!game.apply_move_at(0, Direction::Toward));
        assert!(!game.apply_move(Vec2::new(9.0, 0.0), Direction::Toward));
        assert_eq!(game.moves(), 0);
        assert_eq!(game.board(), &before);
    }

    #[test]
    fn test_row_slide_counts_one_move() {
        let mut game = Game::new(4, 4, false, 5).unwrap();
        game.load(
            &[1, 2, 3, 0, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15],
            0,
            Duration::ZERO,
        )
        .unwrap();
        game.settle_tiles();
        assert!(game.apply_move_at(0, Direction::Right));
        assert_eq!(game.moves(), 1);
        assert_eq!(&game.board().cells()[..4], &[0, 1, 2, 3]);
        assert_tiles_match_board(&game);
        // Three tiles slide
        assert_eq!(game.tiles().iter().filter(|t| !t.is_settled()).count(), 3);
    }

    #[test]
    fn test_moves_are_reversible() {
        let mut game = Game::new(4, 4, false, 77).unwrap();
        let start = game.board().clone();
        let mut undo = Vec::new();

        for touched in [0, 3, 12, 15, 5, 9, 10] {
            let empty = game.board().empty_index();
            if game.apply_move_at(touched, Direction::Toward) {
                undo.push(empty);
            }
        }
        assert!(!undo.is_empty());
        let moves = game.moves();
        assert_eq!(moves as usize, undo.len());

        while let Some(cell) = undo.pop() {
            assert!(game.apply_move_at(cell, Direction::Toward));
        }
        assert_eq!(game.board(), &start);
        assert!(game.moves() > moves);
        assert_tiles_match_board(&game);
    }

    #[test]
    fn test_moves_only_count_real_changes() {
        let mut game = Game::new(4, 4, false, 3).unwrap();
        let mut last = game.moves();
        for touched in 0..16 {
            for direction in [
                Direction::Up,
                Direction::Down,
                Direction::Left,
                Direction::Right,
                Direction::Toward,
            ] {
                if game.is_solved() {
                    return;
                }
                let before = game.board().clone();
                let moved = game.apply_move_at(touched, direction);
                assert_eq!(moved, game.board() != &before);
                assert!(game.moves() >= last);
                assert_eq!(game.moves() - last, moved as u32);
                last = game.moves();
            }
        }
    }

    #[test]
    fn test_pause_requires_moves() {
        let mut game = Game::new(4, 4, false, 8).unwrap();
        game.set_paused(true);
        assert!(!game.is_paused());
        game.invert_paused();
        assert!(!game.is_paused());

        let empty = game.board().empty_index();
        let neighbour = if empty % 4 == 0 { empty + 1 } else { empty - 1 };
        assert!(game.apply_move_at(neighbour, Direction::Toward));

        game.set_paused(true);
        assert!(game.is_paused());
        let before = game.board().clone();
        assert!(!game.apply_move_at(empty, Direction::Toward));
        assert_eq!(game.board(), &before);

        game.tick(Duration::from_secs(1));
        assert_eq!(game.elapsed(), Duration::ZERO);

        game.invert_paused();
        assert_eq!(game.phase(), GamePhase::Active);
        game.tick(Duration::from_millis(250));
        assert_eq!(game.elapsed(), Duration::from_millis(250));
    }

    #[test]
    fn test_load_validation_and_pause() {
        let mut game = Game::new(3, 3, false, 1).unwrap();
        assert_eq!(
            game.load(&[1, 2, 3], 0, Duration::ZERO),
            Err(ConfigError::CellCount {
                expected: 9,
                actual: 3
            })
        );
        assert!(game.load(&[1, 2, 3, 4, 5, 6, 7, 8, 8], 0, Duration::ZERO).is_err());

        let saved = SavedGame {
            cells: vec![1, 2, 3, 4, 5, 6, 7, 0, 8],
            moves: 12,
            time_ms: 4_500,
        };
        game.load_saved(&saved).unwrap();
        assert!(game.is_paused());
        assert_eq!(game.moves(), 12);
        assert_eq!(game.elapsed(), Duration::from_millis(4_500));
        assert_eq!(game.saved_game(), Some(saved));
    }

    #[test]
    fn test_appearance_patterns_cycle() {
        let delay_of_tile_one = |game: &Game| {
            let tile = game.tile(1).unwrap();
            let delay = tile.animation().map(|a| a.delay);
            (tile.index() as u32, delay)
        };

        let mut game = Game::new(4, 4, false, 4).unwrap();
        // First deal uses pattern 1 (by index)
        let (index, delay) = delay_of_tile_one(&game);
        assert_eq!(delay, Some(frames(index * TILE_ANIM_FRAME_MULTIPLIER)));

        // Pattern 2 (reverse index)
        game.new_game(4, 4, false).unwrap();
        let (index, delay) = delay_of_tile_one(&game);
        assert_eq!(delay, Some(frames((16 - index) * TILE_ANIM_FRAME_MULTIPLIER)));
    }

    #[test]
    fn test_animations_settle_and_disable() {
        let mut game = Game::new(3, 3, false, 2).unwrap();
        assert!(game.snapshot().is_animating());
        for _ in 0..200 {
            game.advance_animations(crate::consts::ANIMATION_FRAME);
        }
        assert!(game.tiles().iter().all(Tile::is_settled));
        assert!(!game.snapshot().is_animating());

        game.set_animations(false);
        game.new_game(3, 3, false).unwrap();
        assert!(game.tiles().iter().all(Tile::is_settled));
        let empty = game.board().empty_index();
        let neighbour = if empty % 3 == 0 { empty + 1 } else { empty - 1 };
        assert!(game.apply_move_at(neighbour, Direction::Toward));
        assert!(game.tiles().iter().all(Tile::is_settled));
        assert_tiles_match_board(&game);
    }

    #[test]
    fn test_step_advances_clock_and_tiles() {
        let mut game = Game::new(2, 2, false, 6).unwrap();
        let snapshot = game.step(Duration::from_millis(40));
        assert_eq!(snapshot.elapsed, Duration::from_millis(40));
        assert_eq!(snapshot.cells, game.board().cells());
        assert_eq!(snapshot.tiles.len(), 3);
        assert_eq!(snapshot.phase, GamePhase::Active);
    }
}
