//! Fixed-size cell matrix with per-cell transition and dirty state.

use std::fmt;

use crate::error::{LifeError, Result};

/// Life state of a cell, including whether it transitioned this generation.
///
/// `Born` and `Died` are the "new" states: they live for exactly one
/// generation and can never be set at the same time.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Life {
    #[default]
    Dead,
    Died,
    Alive,
    Born,
}

impl Life {
    #[inline]
    pub const fn from_alive(alive: bool) -> Self {
        if alive { Life::Alive } else { Life::Dead }
    }

    #[inline]
    pub const fn is_alive(self) -> bool {
        matches!(self, Life::Alive | Life::Born)
    }

    /// The same life state with the transition marker dropped.
    #[inline]
    pub const fn settled(self) -> Self {
        match self {
            Life::Born => Life::Alive,
            Life::Died => Life::Dead,
            other => other,
        }
    }
}

/// Status of a single cell.
///
/// `changed` is the one-shot dirty marker consumed by the change-set
/// renderer; it is not part of the simulation state.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct CellState {
    pub life: Life,
    pub changed: bool,
}

impl CellState {
    pub const DEAD: Self = Self::new(Life::Dead, false);
    pub const ALIVE: Self = Self::new(Life::Alive, false);

    pub const fn new(life: Life, changed: bool) -> Self {
        Self { life, changed }
    }

    #[inline]
    pub const fn is_alive(self) -> bool {
        self.life.is_alive()
    }

    #[inline]
    pub const fn newly_born(self) -> bool {
        matches!(self.life, Life::Born)
    }

    #[inline]
    pub const fn newly_died(self) -> bool {
        matches!(self.life, Life::Died)
    }

    #[inline]
    pub const fn changed(self) -> bool {
        self.changed
    }
}

/// Number of cells in a `rows x cols` grid.
///
/// Fails for empty shapes and for shapes whose cell buffer could not be
/// addressed.
pub fn cell_count(rows: usize, cols: usize) -> Result<usize> {
    if rows == 0 || cols == 0 {
        return Err(LifeError::EmptyGrid);
    }
    rows.checked_mul(cols)
        .filter(|&len| {
            len.checked_mul(size_of::<CellState>())
                .is_some_and(|bytes| bytes <= isize::MAX as usize)
        })
        .ok_or(LifeError::GridTooLarge { rows, cols })
}

/// Rectangular `rows x cols` grid stored row-major.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Grid {
    rows: usize,
    cols: usize,
    cells: Vec<CellState>,
}

impl Grid {
    /// Create an all-dead grid with nothing marked for repaint.
    pub fn new(rows: usize, cols: usize) -> Result<Self> {
        let len = cell_count(rows, cols)?;
        Ok(Self {
            rows,
            cols,
            cells: vec![CellState::DEAD; len],
        })
    }

    /// Build a grid from ASCII rows using `#` for alive and `.` for dead.
    ///
    /// Every cell starts settled and unchanged.
    pub fn from_rows(rows: &[&str]) -> Result<Self> {
        let cols = rows.first().map_or(0, |row| row.len());
        let mut grid = Self::new(rows.len(), cols)?;
        for (row, line) in rows.iter().enumerate() {
            if line.len() != cols {
                return Err(LifeError::DimensionMismatch {
                    expected: (rows.len(), cols),
                    found: (rows.len(), line.len()),
                });
            }
            for (col, byte) in line.bytes().enumerate() {
                let alive = match byte {
                    b'#' => true,
                    b'.' => false,
                    other => {
                        return Err(LifeError::InvalidArgument(format!(
                            "unexpected pattern byte {:?} at ({row}, {col})",
                            other as char
                        )));
                    }
                };
                grid.cells[row * cols + col] = CellState::new(Life::from_alive(alive), false);
            }
        }
        Ok(grid)
    }

    #[inline]
    pub fn dimensions(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    #[inline]
    pub fn cols(&self) -> usize {
        self.cols
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    fn index(&self, row: usize, col: usize) -> Result<usize> {
        if row >= self.rows || col >= self.cols {
            return Err(LifeError::OutOfBounds {
                row,
                col,
                rows: self.rows,
                cols: self.cols,
            });
        }
        Ok(row * self.cols + col)
    }

    pub fn get(&self, row: usize, col: usize) -> Result<CellState> {
        let idx = self.index(row, col)?;
        Ok(self.cells[idx])
    }

    /// Overwrite a cell's whole status in one store.
    pub fn set(&mut self, row: usize, col: usize, state: CellState) -> Result<()> {
        let idx = self.index(row, col)?;
        self.cells[idx] = state;
        Ok(())
    }

    /// Set a cell's life state from outside the engine and mark it for repaint.
    pub fn set_alive(&mut self, row: usize, col: usize, alive: bool) -> Result<()> {
        self.set(row, col, CellState::new(Life::from_alive(alive), true))
    }

    pub fn is_alive(&self, row: usize, col: usize) -> Result<bool> {
        Ok(self.get(row, col)?.is_alive())
    }

    pub fn population(&self) -> usize {
        self.cells.iter().filter(|cell| cell.is_alive()).count()
    }

    /// Number of cells waiting to be emitted by the renderer.
    pub fn pending_changes(&self) -> usize {
        self.cells.iter().filter(|cell| cell.changed).count()
    }

    /// Cells in row-major order.
    #[inline]
    pub fn cells(&self) -> &[CellState] {
        &self.cells
    }

    #[inline]
    pub(crate) fn cells_mut(&mut self) -> &mut [CellState] {
        &mut self.cells
    }

    pub(crate) fn ensure_same_shape(&self, other: (usize, usize)) -> Result<()> {
        if self.dimensions() != other {
            return Err(LifeError::DimensionMismatch {
                expected: self.dimensions(),
                found: other,
            });
        }
        Ok(())
    }
}

impl fmt::Display for Grid {
    /// One line per row: `B` born, `X` alive, `D` died, `-` dead.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.cells.chunks(self.cols) {
            for cell in row {
                let glyph = match cell.life {
                    Life::Born => 'B',
                    Life::Alive => 'X',
                    Life::Died => 'D',
                    Life::Dead => '-',
                };
                write!(f, "{glyph}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
