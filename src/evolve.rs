//! Generation stepping over a bounded (non-wrapping) grid.
//!
//! Neighbor counts are always read from the pre-advance grid; the next
//! generation is written into a separate buffer and swapped in afterwards.

use crate::error::Result;
use crate::grid::{CellState, Grid, Life};
use crate::rules::RuleTable;

const RULES: RuleTable = RuleTable::new();

/// Per-generation counters reported by [`Evolver::advance`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct AdvanceStats {
    pub births: usize,
    pub deaths: usize,
    pub population: usize,
}

/// Owns the scratch grid used to build the next generation.
#[derive(Clone, Debug)]
pub struct Evolver {
    scratch: Grid,
}

impl Evolver {
    pub fn new(rows: usize, cols: usize) -> Result<Self> {
        Ok(Self {
            scratch: Grid::new(rows, cols)?,
        })
    }

    /// Build an evolver whose scratch matches `grid`.
    pub fn for_grid(grid: &Grid) -> Result<Self> {
        let (rows, cols) = grid.dimensions();
        Self::new(rows, cols)
    }

    /// Adopt an existing scratch buffer; it must match the live grid shape.
    pub fn with_scratch(grid: &Grid, scratch: Grid) -> Result<Self> {
        grid.ensure_same_shape(scratch.dimensions())?;
        Ok(Self { scratch })
    }

    #[inline]
    pub fn dimensions(&self) -> (usize, usize) {
        self.scratch.dimensions()
    }

    /// Advance `grid` by one generation in place.
    pub fn advance(&mut self, grid: &mut Grid) -> Result<AdvanceStats> {
        let stats = advance_into(grid, &mut self.scratch)?;
        std::mem::swap(grid, &mut self.scratch);
        Ok(stats)
    }
}

/// Compute the generation after `grid` as a new grid.
pub fn advance(grid: &Grid) -> Grid {
    let mut next = grid.clone();
    let (rows, cols) = grid.dimensions();
    step_cells(grid.cells(), next.cells_mut(), rows, cols);
    next
}

/// Write the generation after `src` into `dst`.
pub fn advance_into(src: &Grid, dst: &mut Grid) -> Result<AdvanceStats> {
    src.ensure_same_shape(dst.dimensions())?;
    let (rows, cols) = src.dimensions();
    Ok(step_cells(src.cells(), dst.cells_mut(), rows, cols))
}

/// Live neighbors of `(row, col)`; cells outside the grid are absent.
pub fn live_neighbors(grid: &Grid, row: usize, col: usize) -> Result<u8> {
    grid.get(row, col)?;
    let (rows, cols) = grid.dimensions();
    Ok(count_neighbors(grid.cells(), rows, cols, row, col))
}

fn step_cells(src: &[CellState], dst: &mut [CellState], rows: usize, cols: usize) -> AdvanceStats {
    debug_assert_eq!(src.len(), rows * cols);
    debug_assert_eq!(dst.len(), rows * cols);

    let mut stats = AdvanceStats::default();
    for row in 0..rows {
        for col in 0..cols {
            let idx = row * cols + col;
            let cell = src[idx];
            let neighbors = count_neighbors(src, rows, cols, row, col);
            let next = next_state(cell, RULES.lookup(cell.is_alive(), neighbors));
            match next.life {
                Life::Born => stats.births += 1,
                Life::Died => stats.deaths += 1,
                _ => {}
            }
            if next.is_alive() {
                stats.population += 1;
            }
            dst[idx] = next;
        }
    }
    stats
}

#[inline(always)]
fn count_neighbors(cells: &[CellState], rows: usize, cols: usize, row: usize, col: usize) -> u8 {
    let row_lo = row.saturating_sub(1);
    let row_hi = (row + 1).min(rows - 1);
    let col_lo = col.saturating_sub(1);
    let col_hi = (col + 1).min(cols - 1);

    let mut count = 0u8;
    for nr in row_lo..=row_hi {
        let base = nr * cols;
        for nc in col_lo..=col_hi {
            if nr == row && nc == col {
                continue;
            }
            count += cells[base + nc].is_alive() as u8;
        }
    }
    count
}

/// Fold a rule decision into the cell's status.
///
/// A transition marks the cell dirty. A cell that keeps its state drops any
/// `Born`/`Died` marker from the previous generation; since that changes its
/// visual category it is marked dirty too. A pending dirty flag is never
/// cleared here.
#[inline]
fn next_state(cell: CellState, next_alive: bool) -> CellState {
    match (cell.is_alive(), next_alive) {
        (true, false) => CellState::new(Life::Died, true),
        (false, true) => CellState::new(Life::Born, true),
        _ => {
            let settled = cell.life.settled();
            CellState::new(settled, cell.changed || settled != cell.life)
        }
    }
}
