//! Owned simulation state and the per-tick state machine.

use crate::error::Result;
use crate::evolve::{AdvanceStats, Evolver};
use crate::grid::Grid;
use crate::history::{self, History};
use crate::render::{self, ChangeSet};
use crate::seed::{self, EntropySource};

/// What a tick did to the grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TickOutcome {
    Advanced(AdvanceStats),
    /// The grid repeated generation N-2 and was replaced with a random one.
    Reseeded { population: usize },
}

/// Grid plus the engine-private scratch and history buffers.
#[derive(Clone, Debug)]
pub struct SimulationState {
    grid: Grid,
    evolver: Evolver,
    history: History,
    generation: u64,
    ticks: u64,
    reseeds: u64,
}

impl SimulationState {
    /// An all-dead grid with empty history.
    pub fn new(rows: usize, cols: usize) -> Result<Self> {
        Self::from_grid(Grid::new(rows, cols)?)
    }

    pub fn from_grid(grid: Grid) -> Result<Self> {
        let evolver = Evolver::for_grid(&grid)?;
        let history = History::for_grid(&grid);
        Ok(Self::assemble(grid, evolver, history))
    }

    /// Assemble from caller-provided buffers, which must all share one shape.
    pub fn from_parts(grid: Grid, scratch: Grid, history: History) -> Result<Self> {
        let evolver = Evolver::with_scratch(&grid, scratch)?;
        grid.ensure_same_shape(history.dimensions())?;
        Ok(Self::assemble(grid, evolver, history))
    }

    fn assemble(grid: Grid, evolver: Evolver, history: History) -> Self {
        Self {
            grid,
            evolver,
            history,
            generation: 0,
            ticks: 0,
            reseeds: 0,
        }
    }

    #[inline]
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Direct grid access for hosts that edit cells between ticks.
    #[inline]
    pub fn grid_mut(&mut self) -> &mut Grid {
        &mut self.grid
    }

    #[inline]
    pub fn history(&self) -> &History {
        &self.history
    }

    #[inline]
    pub fn dimensions(&self) -> (usize, usize) {
        self.grid.dimensions()
    }

    /// Generations advanced since the last seed.
    #[inline]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    #[inline]
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    #[inline]
    pub fn reseeds(&self) -> u64 {
        self.reseeds
    }

    pub fn is_stagnant(&self) -> bool {
        history::is_stagnant(&self.grid, &self.history)
    }

    /// Replace the grid with a random one and forget the history.
    pub fn reseed<E: EntropySource + ?Sized>(&mut self, entropy: &mut E) -> usize {
        let population = seed::reseed(&mut self.grid, entropy);
        self.history.clear();
        self.generation = 0;
        self.reseeds += 1;
        tracing::info!(population, reseeds = self.reseeds, "grid reseeded");
        population
    }

    /// Run one tick: reseed if the grid repeats generation N-2, else record
    /// the current generation and advance.
    pub fn tick<E: EntropySource + ?Sized>(&mut self, entropy: &mut E) -> Result<TickOutcome> {
        self.ticks += 1;
        if self.is_stagnant() {
            tracing::debug!(generation = self.generation, "stagnation detected");
            let population = self.reseed(entropy);
            return Ok(TickOutcome::Reseeded { population });
        }

        self.history.record(&self.grid)?;
        let stats = self.evolver.advance(&mut self.grid)?;
        self.generation += 1;
        tracing::debug!(
            generation = self.generation,
            births = stats.births,
            deaths = stats.deaths,
            population = stats.population,
            "advanced"
        );
        Ok(TickOutcome::Advanced(stats))
    }

    /// Change-set for everything that needs repainting.
    ///
    /// The borrow keeps the state frozen until the change-set is dropped.
    pub fn diff(&mut self) -> ChangeSet<'_> {
        render::diff(&mut self.grid)
    }
}
