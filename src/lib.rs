//! Bounded Conway's Game of Life (B3/S23) for a serpentine LED strip.
//!
//! Each tick either advances the grid or, when it repeats the generation two
//! steps back, reseeds it at random. Only cells whose colour changed are sent
//! to the display.

pub mod config;
pub mod driver;
pub mod error;
pub mod evolve;
pub mod grid;
pub mod history;
pub mod render;
pub mod rules;
pub mod seed;
pub mod simulation;
pub mod sink;

pub use config::LifeConfig;
pub use driver::{Driver, RunSummary, ShutdownHandle, TickReport};
pub use error::{LifeError, Result};
pub use evolve::{AdvanceStats, Evolver, advance};
pub use grid::{CellState, Grid, Life};
pub use history::{History, Snapshot, is_stagnant};
pub use render::{ChangeSet, PixelUpdate, VisualState, diff, serpentine_address};
pub use seed::{EntropySource, SeedOrigin, reseed};
pub use simulation::{SimulationState, TickOutcome};
pub use sink::{DisplaySink, MemorySink, Palette, Rgb};
