//! Fixed-size tile count arrays.

use std::ops::{Index, IndexMut};

use super::tile::{Tile, INDEX_COUNT};

/// How many copies of each indexed face a hand holds.
///
/// `Copy` so the evaluator can branch on independent snapshots.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TileCounts([u8; INDEX_COUNT]);

impl Default for TileCounts {
    fn default() -> Self {
        Self::new()
    }
}

impl TileCounts {
    #[must_use]
    pub const fn new() -> Self {
        Self([0; INDEX_COUNT])
    }

    /// Count the indexed faces of a hand. Flowers are skipped.
    pub fn from_tiles<'a>(tiles: impl IntoIterator<Item = &'a Tile>) -> Self {
        let mut counts = Self::new();
        for index in tiles.into_iter().filter_map(Tile::index) {
            counts.0[index] += 1;
        }
        counts
    }

    /// Total number of counted tiles.
    #[must_use]
    pub fn total(&self) -> usize {
        self.0.iter().map(|&c| c as usize).sum()
    }

    /// Lowest index with a non-zero count.
    #[must_use]
    pub fn first_nonzero(&self) -> Option<usize> {
        self.0.iter().position(|&c| c > 0)
    }

    /// Remove `n` copies of a face. Returns false (unchanged) if short.
    pub fn take(&mut self, index: usize, n: u8) -> bool {
        match self.0.get_mut(index) {
            Some(count) if *count >= n => {
                *count -= n;
                true
            }
            _ => false,
        }
    }

    /// Count at an index, zero when out of range.
    #[must_use]
    pub fn get(&self, index: usize) -> u8 {
        self.0.get(index).copied().unwrap_or(0)
    }

    /// Iterate over (index, count) for faces that are present.
    pub fn present(&self) -> impl Iterator<Item = (usize, u8)> + '_ {
        self.0.iter().enumerate().filter(|&(_, &c)| c > 0).map(|(i, &c)| (i, c))
    }
}

impl Index<usize> for TileCounts {
    type Output = u8;

    fn index(&self, index: usize) -> &u8 {
        &self.0[index]
    }
}

impl IndexMut<usize> for TileCounts {
    fn index_mut(&mut self, index: usize) -> &mut u8 {
        &mut self.0[index]
    }
}
