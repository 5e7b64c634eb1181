//! Random (re)seeding and entropy-source setup.

use std::time::{SystemTime, UNIX_EPOCH};

use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::grid::{CellState, Grid, Life};

/// Seed used when neither a clock nor OS entropy is available.
pub const FALLBACK_SEED: u64 = 0x5EED_1234_ABCD_EF01;

/// Source of random draws used by [`reseed`].
///
/// Every `rand` generator is one; tests typically pass a `StdRng` built from
/// a fixed seed.
pub trait EntropySource {
    fn next_u32(&mut self) -> u32;
}

impl<R: rand::RngCore + ?Sized> EntropySource for R {
    #[inline]
    fn next_u32(&mut self) -> u32 {
        rand::RngCore::next_u32(self)
    }
}

/// Wall-clock provider used once at startup to seed the generator.
pub trait TimeSource {
    /// Seconds since the Unix epoch, or `None` when no time is known.
    fn unix_time(&mut self) -> Option<u64>;
}

impl<F: FnMut() -> Option<u64>> TimeSource for F {
    fn unix_time(&mut self) -> Option<u64> {
        self()
    }
}

/// The host's system clock.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl TimeSource for SystemClock {
    fn unix_time(&mut self) -> Option<u64> {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .ok()
            .map(|elapsed| elapsed.as_secs())
            .filter(|&secs| secs != 0)
    }
}

/// Where the generator's seed came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SeedOrigin {
    Clock(u64),
    Os,
    Fixed(u64),
}

/// A generator seeded from a caller-chosen value.
pub fn fixed_entropy(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

/// Seed a generator from the clock, falling back to OS entropy and then to
/// [`FALLBACK_SEED`]. Never fails.
pub fn seed_entropy<T: TimeSource + ?Sized>(clock: &mut T) -> (StdRng, SeedOrigin) {
    if let Some(secs) = clock.unix_time() {
        tracing::debug!(secs, "seeding from clock");
        return (StdRng::seed_from_u64(secs), SeedOrigin::Clock(secs));
    }

    tracing::warn!("no wall-clock time available, falling back to OS entropy");
    match StdRng::try_from_os_rng() {
        Ok(rng) => (rng, SeedOrigin::Os),
        Err(error) => {
            tracing::warn!(
                %error,
                seed = FALLBACK_SEED,
                "OS entropy unavailable, using fixed seed"
            );
            (fixed_entropy(FALLBACK_SEED), SeedOrigin::Fixed(FALLBACK_SEED))
        }
    }
}

/// Fill every cell with a fresh coin flip.
///
/// Each cell takes the low bit of one draw, is marked dirty, and carries no
/// transition marker. Returns the new population.
pub fn reseed<E: EntropySource + ?Sized>(grid: &mut Grid, entropy: &mut E) -> usize {
    let mut population = 0;
    for cell in grid.cells_mut() {
        let alive = entropy.next_u32() & 1 == 1;
        population += alive as usize;
        *cell = CellState::new(Life::from_alive(alive), true);
    }
    population
}
