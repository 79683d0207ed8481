//! Puzzle board: tile layout, legal slides, shuffle and win detection
//!
//! Cells hold a permutation of `0..width*height` in row-major order, `0` being
//! the empty slot. The solved layout is `[1, 2, ..., size-1, 0]`.

use glam::Vec2;
use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

use crate::consts::{MAX_SIDE, MIN_SIDE};
use crate::error::ConfigError;

/// Requested slide direction (screen space: `Up` means toward row 0)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
    /// Slide toward the empty cell along whichever axis it shares with the touched cell
    #[default]
    Toward,
}

impl Direction {
    /// Direction of a single-cell step from `from` to `to`, `Toward` when
    /// the cells are not neighbours
    pub fn between(from: usize, to: usize, width: usize) -> Self {
        let same_row = width > 0 && from / width == to / width;
        if to + width == from {
            Direction::Up
        } else if from + width == to {
            Direction::Down
        } else if to + 1 == from && same_row {
            Direction::Left
        } else if from + 1 == to && same_row {
            Direction::Right
        } else {
            Direction::Toward
        }
    }
}

/// One tile displaced by a slide
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileShift {
    pub number: u32,
    pub from: usize,
    pub to: usize,
}

/// Grid of tile values with exactly one empty cell
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    width: usize,
    height: usize,
    cells: Vec<u32>,
    empty: usize,
}

impl Board {
    /// Create a solved board
    pub fn new(width: usize, height: usize) -> Result<Self, ConfigError> {
        validate_size(width, height)?;
        let size = width * height;
        let mut cells: Vec<u32> = (1..size as u32).collect();
        cells.push(0);
        Ok(Self {
            width,
            height,
            cells,
            empty: size - 1,
        })
    }

    /// Create a board from an explicit layout (e.g. a restored game)
    pub fn from_cells(width: usize, height: usize, cells: Vec<u32>) -> Result<Self, ConfigError> {
        validate_size(width, height)?;
        let size = width * height;
        if cells.len() != size {
            return Err(ConfigError::CellCount {
                expected: size,
                actual: cells.len(),
            });
        }

        let mut seen = vec![false; size];
        for &value in &cells {
            let slot = seen
                .get_mut(value as usize)
                .ok_or(ConfigError::NotAPermutation { size })?;
            if *slot {
                return Err(ConfigError::NotAPermutation { size });
            }
            *slot = true;
        }

        let empty = cells
            .iter()
            .position(|&v| v == 0)
            .ok_or(ConfigError::NotAPermutation { size })?;

        Ok(Self {
            width,
            height,
            cells,
            empty,
        })
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    pub fn size(&self) -> usize {
        self.cells.len()
    }

    #[inline]
    pub fn cells(&self) -> &[u32] {
        &self.cells
    }

    #[inline]
    pub fn empty_index(&self) -> usize {
        self.empty
    }

    /// Value at a cell (`0` for the empty slot)
    #[inline]
    pub fn value_at(&self, index: usize) -> Option<u32> {
        self.cells.get(index).copied()
    }

    /// Cell currently holding `number`
    pub fn position_of(&self, number: u32) -> Option<usize> {
        self.cells.iter().position(|&v| v == number)
    }

    #[inline]
    fn row_col(&self, index: usize) -> (usize, usize) {
        (index / self.width, index % self.width)
    }

    /// Cell under a board-space point (one cell = 1.0)
    pub fn index_at(&self, point: Vec2) -> Option<usize> {
        if !point.is_finite() || point.x < 0.0 || point.y < 0.0 {
            return None;
        }
        let col = point.x.floor() as usize;
        let row = point.y.floor() as usize;
        (col < self.width && row < self.height).then_some(row * self.width + col)
    }

    /// True when every tile is in its home cell
    pub fn is_solved(&self) -> bool {
        let last = self.size() - 1;
        self.cells[last] == 0
            && self.cells[..last]
                .iter()
                .enumerate()
                .all(|(i, &v)| v as usize == i + 1)
    }

    /// Classical parity rule: permutation parity (relative to the solved
    /// layout) must match the taxicab distance of the blank from its home cell.
    pub fn is_solvable(&self) -> bool {
        let size = self.size();
        let home = |value: u32| {
            if value == 0 {
                size - 1
            } else {
                value as usize - 1
            }
        };

        let mut visited = vec![false; size];
        let mut cycles = 0;
        for start in 0..size {
            if visited[start] {
                continue;
            }
            cycles += 1;
            let mut i = start;
            while !visited[i] {
                visited[i] = true;
                i = home(self.cells[i]);
            }
        }
        let permutation_odd = (size - cycles) % 2 == 1;

        let (row, col) = self.row_col(self.empty);
        let distance = (self.height - 1 - row) + (self.width - 1 - col);

        permutation_odd == (distance % 2 == 1)
    }

    /// Randomize the layout.
    ///
    /// Outside hard mode an unsolvable layout is repaired by swapping two
    /// tiles; hard mode keeps whatever the shuffle produced. Never returns a
    /// solved board.
    pub fn shuffle<R: Rng + ?Sized>(&mut self, hard_mode: bool, rng: &mut R) {
        loop {
            self.cells.shuffle(rng);
            self.empty = self.cells.iter().position(|&v| v == 0).unwrap_or(0);

            if !hard_mode && !self.is_solvable() {
                self.swap_two_tiles();
            }
            if !self.is_solved() {
                break;
            }
        }
        log::debug!(
            "Shuffled {}x{} board (hard_mode={}, solvable={})",
            self.width,
            self.height,
            hard_mode,
            self.is_solvable()
        );
    }

    /// Swap the first two non-empty cells, flipping permutation parity
    fn swap_two_tiles(&mut self) {
        let mut tiles = (0..self.size()).filter(|&i| i != self.empty);
        if let (Some(a), Some(b)) = (tiles.next(), tiles.next()) {
            self.cells.swap(a, b);
        }
    }

    /// Cells to shift for a slide started at `touched`.
    ///
    /// Ordered from the cell next to the blank out to `touched`; empty when the
    /// slide is not possible.
    pub fn legal_slide(&self, touched: usize, direction: Direction) -> Vec<usize> {
        if touched >= self.size() || touched == self.empty {
            return Vec::new();
        }

        let (tr, tc) = self.row_col(touched);
        let (er, ec) = self.row_col(self.empty);
        let w = self.width as isize;

        // Offset from the blank toward the touched cell
        let step: isize = match direction {
            Direction::Left if tr == er && ec < tc => 1,
            Direction::Right if tr == er && ec > tc => -1,
            Direction::Up if tc == ec && er < tr => w,
            Direction::Down if tc == ec && er > tr => -w,
            Direction::Toward if tr == er => {
                if ec < tc {
                    1
                } else {
                    -1
                }
            }
            Direction::Toward if tc == ec => {
                if er < tr {
                    w
                } else {
                    -w
                }
            }
            _ => return Vec::new(),
        };

        let mut path = Vec::new();
        let mut i = self.empty as isize;
        loop {
            i += step;
            path.push(i as usize);
            if i as usize == touched {
                break;
            }
        }
        path
    }

    /// Shift every cell of `path` one step into the moving blank.
    ///
    /// Stops at the first cell that is not next to the blank; the shifts
    /// made up to that point stay applied.
    pub fn apply(&mut self, path: &[usize]) -> Vec<TileShift> {
        let mut shifts = Vec::with_capacity(path.len());
        for &from in path {
            if from >= self.size() || from == self.empty {
                break;
            }
            if Direction::between(from, self.empty, self.width) == Direction::Toward {
                log::warn!("Slide stopped: cell {} is not next to the blank at {}", from, self.empty);
                break;
            }
            let to = self.empty;
            let number = self.cells[from];
            self.cells.swap(from, to);
            self.empty = from;
            shifts.push(TileShift { number, from, to });
        }
        shifts
    }
}

/// Both sides within the supported range
pub(crate) fn validate_size(width: usize, height: usize) -> Result<(), ConfigError> {
    let valid = |side: usize| (MIN_SIDE..=MAX_SIDE).contains(&side);
    if valid(width) && valid(height) {
        Ok(())
    } else {
        Err(ConfigError::InvalidSize { width, height })
    }
}
