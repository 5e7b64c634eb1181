//! Change-set extraction for a serpentine-wired pixel strip.
//!
//! The strip runs left to right along even rows and right to left along odd
//! rows, so a cell's linear address depends on the parity of its row.

use std::iter::FusedIterator;

use crate::grid::{CellState, Grid, Life};

/// Logical colour category of a cell; the display sink picks the actual colour.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum VisualState {
    Background,
    Birth,
    Death,
    Alive,
}

impl VisualState {
    pub const fn of(cell: CellState) -> Self {
        match cell.life {
            Life::Born => VisualState::Birth,
            Life::Alive => VisualState::Alive,
            Life::Died => VisualState::Death,
            Life::Dead => VisualState::Background,
        }
    }
}

/// Strip address of `(row, col)` on a serpentine layout `cols` wide.
#[inline]
pub const fn serpentine_address(row: usize, col: usize, cols: usize) -> usize {
    if row % 2 == 0 {
        row * cols + col
    } else {
        row * cols + (cols - 1 - col)
    }
}

/// Inverse of [`serpentine_address`].
#[inline]
pub const fn serpentine_position(address: usize, cols: usize) -> (usize, usize) {
    let row = address / cols;
    let offset = address % cols;
    if row % 2 == 0 {
        (row, offset)
    } else {
        (row, cols - 1 - offset)
    }
}

/// One pixel write in a change-set.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct PixelUpdate {
    pub address: usize,
    pub state: VisualState,
    pub row: usize,
    pub col: usize,
}

/// Dirty cells of a grid, visited once in row-major order.
///
/// Each yielded cell has its `changed` flag cleared. The grid stays mutably
/// borrowed until the change-set is dropped; cells not reached before the
/// drop keep their flag for the next pass.
pub struct ChangeSet<'a> {
    grid: &'a mut Grid,
    next: usize,
}

impl<'a> ChangeSet<'a> {
    fn new(grid: &'a mut Grid) -> Self {
        Self { grid, next: 0 }
    }

    /// Drain the rest of the change-set into an owned frame.
    pub fn into_frame(self) -> Vec<PixelUpdate> {
        self.collect()
    }
}

impl Iterator for ChangeSet<'_> {
    type Item = PixelUpdate;

    fn next(&mut self) -> Option<PixelUpdate> {
        let cols = self.grid.cols();
        let cells = self.grid.cells_mut();
        while self.next < cells.len() {
            let idx = self.next;
            self.next += 1;
            let cell = &mut cells[idx];
            if !cell.changed {
                continue;
            }
            cell.changed = false;
            let (row, col) = (idx / cols, idx % cols);
            return Some(PixelUpdate {
                address: serpentine_address(row, col, cols),
                state: VisualState::of(*cell),
                row,
                col,
            });
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, Some(self.grid.len() - self.next))
    }
}

impl FusedIterator for ChangeSet<'_> {}

/// Start a change-set pass over `grid`.
pub fn diff(grid: &mut Grid) -> ChangeSet<'_> {
    ChangeSet::new(grid)
}

#[cfg(test)]
mod tests {
    use super::{VisualState, diff, serpentine_address, serpentine_position};
    use crate::grid::{CellState, Grid, Life};

    #[test]
    fn serpentine_known_addresses() {
        assert_eq!(serpentine_address(0, 0, 16), 0);
        assert_eq!(serpentine_address(0, 15, 16), 15);
        assert_eq!(serpentine_address(1, 15, 16), 16);
        assert_eq!(serpentine_address(1, 0, 16), 31);
        assert_eq!(serpentine_address(2, 0, 16), 32);
    }

    #[test]
    fn serpentine_position_inverts_address() {
        for row in 0..5 {
            for col in 0..7 {
                let address = serpentine_address(row, col, 7);
                assert_eq!(serpentine_position(address, 7), (row, col));
            }
        }
    }

    #[test]
    fn visual_state_per_life() {
        assert_eq!(VisualState::of(CellState::new(Life::Born, true)), VisualState::Birth);
        assert_eq!(VisualState::of(CellState::new(Life::Alive, true)), VisualState::Alive);
        assert_eq!(VisualState::of(CellState::new(Life::Died, true)), VisualState::Death);
        assert_eq!(VisualState::of(CellState::new(Life::Dead, true)), VisualState::Background);
    }

    #[test]
    fn dropped_change_set_keeps_unvisited_cells_dirty() {
        let mut grid = Grid::new(2, 2).unwrap();
        grid.set_alive(0, 0, true).unwrap();
        grid.set_alive(1, 1, true).unwrap();
        {
            let mut changes = diff(&mut grid);
            assert!(changes.next().is_some());
        }
        assert!(!grid.get(0, 0).unwrap().changed());
        assert!(grid.get(1, 1).unwrap().changed());
    }

    #[test]
    fn exhausted_change_set_stays_exhausted() {
        let mut grid = Grid::new(1, 2).unwrap();
        grid.set_alive(0, 1, true).unwrap();
        let mut changes = diff(&mut grid);
        assert_eq!(changes.next().map(|update| update.address), Some(1));
        assert!(changes.next().is_none());
        assert!(changes.next().is_none());
    }
}
