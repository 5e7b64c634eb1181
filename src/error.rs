//! Error type shared by the grid, engine and host layers.

use thiserror::Error;

/// All kinds of errors in this crate.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum LifeError {
    /// A row or column outside the grid was addressed.
    #[error("cell ({row}, {col}) is outside the {rows}x{cols} grid")]
    OutOfBounds {
        row: usize,
        col: usize,
        rows: usize,
        cols: usize,
    },
    /// A history buffer, scratch grid or injected grid disagrees with the live grid shape.
    #[error("dimension mismatch: expected {}x{}, found {}x{}", expected.0, expected.1, found.0, found.1)]
    DimensionMismatch {
        expected: (usize, usize),
        found: (usize, usize),
    },
    /// Grids need at least one row and one column.
    #[error("grid dimensions must be positive")]
    EmptyGrid,
    /// The cell count of a `rows x cols` grid does not fit in memory.
    #[error("a {rows}x{cols} grid is too large")]
    GridTooLarge { rows: usize, cols: usize },
    /// Host configuration could not be parsed.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

pub type Result<T, E = LifeError> = std::result::Result<T, E>;
