//! Rolling generation history and period-2 stagnation detection.
//!
//! Snapshots keep only the alive bit of each cell, packed 64 cells per word
//! in row-major order. Transition markers and dirty flags are ignored.

use std::collections::VecDeque;

use crate::error::Result;
use crate::grid::Grid;

/// Number of past generations retained.
pub const HISTORY_DEPTH: usize = 2;

/// Alive/dead pattern of a grid at one generation.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Snapshot {
    rows: usize,
    cols: usize,
    bits: Vec<u64>,
}

impl Snapshot {
    pub fn capture(grid: &Grid) -> Self {
        let (rows, cols) = grid.dimensions();
        let mut snapshot = Self {
            rows,
            cols,
            bits: vec![0; (rows * cols).div_ceil(64)],
        };
        snapshot.fill_from(grid);
        snapshot
    }

    /// Overwrite this snapshot with `grid`'s pattern, reusing the word buffer.
    fn fill_from(&mut self, grid: &Grid) {
        let (rows, cols) = grid.dimensions();
        self.rows = rows;
        self.cols = cols;
        self.bits.clear();
        self.bits.resize((rows * cols).div_ceil(64), 0);
        for (i, cell) in grid.cells().iter().enumerate() {
            if cell.is_alive() {
                self.bits[i >> 6] |= 1u64 << (i & 63);
            }
        }
    }

    #[inline]
    pub fn dimensions(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    pub fn is_alive(&self, row: usize, col: usize) -> bool {
        if row >= self.rows || col >= self.cols {
            return false;
        }
        let i = row * self.cols + col;
        self.bits[i >> 6] & (1u64 << (i & 63)) != 0
    }

    pub fn population(&self) -> usize {
        self.bits.iter().map(|word| word.count_ones() as usize).sum()
    }

    /// Whether `grid` has exactly this alive/dead pattern.
    pub fn matches(&self, grid: &Grid) -> bool {
        if grid.dimensions() != self.dimensions() {
            return false;
        }
        grid.cells()
            .chunks(64)
            .zip(&self.bits)
            .all(|(chunk, &word)| {
                let packed = chunk
                    .iter()
                    .enumerate()
                    .fold(0u64, |acc, (bit, cell)| acc | ((cell.is_alive() as u64) << bit));
                packed == word
            })
    }
}

/// The last [`HISTORY_DEPTH`] generations, oldest first.
#[derive(Clone, Debug)]
pub struct History {
    rows: usize,
    cols: usize,
    snapshots: VecDeque<Snapshot>,
}

impl History {
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            snapshots: VecDeque::with_capacity(HISTORY_DEPTH),
        }
    }

    pub fn for_grid(grid: &Grid) -> Self {
        let (rows, cols) = grid.dimensions();
        Self::new(rows, cols)
    }

    #[inline]
    pub fn dimensions(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    /// Push `grid` as the newest generation, dropping the oldest once full.
    pub fn record(&mut self, grid: &Grid) -> Result<()> {
        grid.ensure_same_shape(self.dimensions())?;
        if self.snapshots.len() == HISTORY_DEPTH {
            if let Some(mut recycled) = self.snapshots.pop_front() {
                recycled.fill_from(grid);
                self.snapshots.push_back(recycled);
                return Ok(());
            }
        }
        self.snapshots.push_back(Snapshot::capture(grid));
        Ok(())
    }

    pub fn clear(&mut self) {
        self.snapshots.clear();
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    #[inline]
    pub fn is_full(&self) -> bool {
        self.snapshots.len() == HISTORY_DEPTH
    }

    /// Generation N-2 once the history is full.
    pub fn oldest(&self) -> Option<&Snapshot> {
        if self.is_full() {
            self.snapshots.front()
        } else {
            None
        }
    }

    /// Generation N-1.
    pub fn newest(&self) -> Option<&Snapshot> {
        self.snapshots.back()
    }
}

/// Whether `current` repeats the generation two steps back.
///
/// Catches still lifes and period-2 oscillators. Returns false until two
/// generations have been recorded.
pub fn is_stagnant(current: &Grid, history: &History) -> bool {
    history
        .oldest()
        .is_some_and(|snapshot| snapshot.matches(current))
}

#[cfg(test)]
mod tests {
    use super::{History, Snapshot, is_stagnant};
    use crate::error::LifeError;
    use crate::grid::{CellState, Grid, Life};

    #[test]
    fn snapshot_ignores_transition_markers() {
        let mut plain = Grid::new(3, 3).unwrap();
        plain.set(1, 1, CellState::ALIVE).unwrap();
        let mut marked = Grid::new(3, 3).unwrap();
        marked.set(1, 1, CellState::new(Life::Born, true)).unwrap();
        marked.set(0, 0, CellState::new(Life::Died, true)).unwrap();

        assert!(Snapshot::capture(&plain).matches(&marked));
        assert_eq!(Snapshot::capture(&marked), Snapshot::capture(&plain));
    }

    #[test]
    fn snapshot_spans_multiple_words() {
        let mut grid = Grid::new(9, 9).unwrap();
        grid.set(8, 8, CellState::ALIVE).unwrap();
        grid.set(7, 0, CellState::ALIVE).unwrap();
        let snapshot = Snapshot::capture(&grid);
        assert!(snapshot.is_alive(8, 8));
        assert!(snapshot.is_alive(7, 0));
        assert!(!snapshot.is_alive(0, 0));
        assert_eq!(snapshot.population(), 2);

        grid.set(8, 8, CellState::DEAD).unwrap();
        assert!(!snapshot.matches(&grid));
    }

    #[test]
    fn needs_two_generations_before_reporting() {
        let grid = Grid::new(4, 4).unwrap();
        let mut history = History::for_grid(&grid);
        assert!(!is_stagnant(&grid, &history));
        history.record(&grid).unwrap();
        assert!(!is_stagnant(&grid, &history));
        history.record(&grid).unwrap();
        assert!(is_stagnant(&grid, &history));
    }

    #[test]
    fn record_drops_oldest() {
        let empty = Grid::new(2, 2).unwrap();
        let full = Grid::from_rows(&["##", "##"]).unwrap();
        let mut history = History::for_grid(&empty);
        history.record(&full).unwrap();
        history.record(&empty).unwrap();
        history.record(&empty).unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history.oldest().map(Snapshot::population), Some(0));
    }

    #[test]
    fn record_rejects_other_shapes() {
        let mut history = History::new(2, 2);
        let grid = Grid::new(3, 2).unwrap();
        assert!(matches!(
            history.record(&grid),
            Err(LifeError::DimensionMismatch { .. })
        ));
    }

    #[test]
    fn clear_resets_detection() {
        let grid = Grid::new(2, 2).unwrap();
        let mut history = History::for_grid(&grid);
        history.record(&grid).unwrap();
        history.record(&grid).unwrap();
        history.clear();
        assert!(history.is_empty());
        assert!(!is_stagnant(&grid, &history));
    }
}
