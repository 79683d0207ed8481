//! Appearance patterns for a freshly dealt board
//!
//! Each new game picks the next pattern in a fixed cycle. A pattern maps a
//! tile's cell and number to a delay in units; only `Random` consumes the RNG.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::consts::APPEARANCE_PATTERNS;

/// Frames between groups for the row/column patterns
const GROUP_GAP: u32 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AppearancePattern {
    /// Every tile at once
    Simultaneous,
    /// Cell order, top to bottom
    ByIndex,
    /// Reverse cell order, bottom to top
    ReverseIndex,
    Random,
    /// 1, 2, 3, ..., n
    ByNumber,
    /// n, n-1, ..., 1
    ReverseNumber,
    ByRow,
    ByColumn,
    ReverseRow,
    ReverseColumn,
}

impl AppearancePattern {
    /// Patterns in cycle order
    pub const ALL: [AppearancePattern; APPEARANCE_PATTERNS as usize] = [
        AppearancePattern::Simultaneous,
        AppearancePattern::ByIndex,
        AppearancePattern::ReverseIndex,
        AppearancePattern::Random,
        AppearancePattern::ByNumber,
        AppearancePattern::ReverseNumber,
        AppearancePattern::ByRow,
        AppearancePattern::ByColumn,
        AppearancePattern::ReverseRow,
        AppearancePattern::ReverseColumn,
    ];

    /// Pattern for the given cycle counter
    pub fn from_cycle(counter: u32) -> Self {
        Self::ALL[(counter % APPEARANCE_PATTERNS) as usize]
    }

    /// Delay units for the tile `number` sitting at `index`
    pub fn delay_units<R: Rng + ?Sized>(
        &self,
        index: usize,
        number: u32,
        width: usize,
        height: usize,
        rng: &mut R,
    ) -> u32 {
        let size = (width * height) as u32;
        // Larger boards appear in groups
        let shift = size / 26 + 1;
        let index = index as u32;
        let row = index / width as u32;
        let col = index % width as u32;

        match self {
            AppearancePattern::Simultaneous => 0,
            AppearancePattern::ByIndex => index / shift,
            AppearancePattern::ReverseIndex => (size - index) / shift,
            AppearancePattern::Random => rng.random_range(0..10 + 10 * (shift - 1)),
            AppearancePattern::ByNumber => number / shift,
            AppearancePattern::ReverseNumber => (size - number) / shift,
            AppearancePattern::ByRow => row * GROUP_GAP,
            AppearancePattern::ByColumn => col * GROUP_GAP,
            AppearancePattern::ReverseRow => (height as u32 - row) * GROUP_GAP,
            AppearancePattern::ReverseColumn => (width as u32 - col) * GROUP_GAP,
        }
    }
}
