//! Fixed overlay positions
//!
//! When a state with overlay settings is entered, up to `count` distinct
//! cells of the character grid are picked at random. They stay fixed for
//! the whole visit; the activity curve only decides how many of them, in
//! pick order, are lit on a given tick.

use rand::Rng;

/// Cells picked for one visit to a state, in activation order
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NoiseSlots {
    cells: Vec<(usize, usize)>,
}

impl NoiseSlots {
    /// Pick `count` distinct `(row, col)` cells of a `width` x `height` grid
    ///
    /// Picks every cell when `count` exceeds the grid.
    pub fn select<R>(width: usize, height: usize, count: usize, rng: &mut R) -> Self
    where
        R: Rng + ?Sized,
    {
        let total = width.saturating_mul(height);
        if total == 0 || count == 0 {
            return Self::default();
        }
        let cells = rand::seq::index::sample(rng, total, count.min(total))
            .into_iter()
            .map(|i| (i / width, i % width))
            .collect();
        Self { cells }
    }

    /// Slots from explicit cells, in activation order
    #[must_use]
    pub fn from_cells(cells: Vec<(usize, usize)>) -> Self {
        Self { cells }
    }

    /// The first `activity` cells (all of them if fewer exist)
    #[must_use]
    pub fn active(&self, activity: usize) -> &[(usize, usize)] {
        &self.cells[..activity.min(self.cells.len())]
    }

    /// Every picked cell
    #[must_use]
    pub fn cells(&self) -> &[(usize, usize)] {
        &self.cells
    }

    /// Number of picked cells
    #[must_use]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Whether nothing was picked
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}
