//! Fixed-interval tick loop tying the simulation to a display sink.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::{Duration, Instant};

use crate::config::LifeConfig;
use crate::error::Result;
use crate::seed::EntropySource;
use crate::simulation::{SimulationState, TickOutcome};
use crate::sink::{self, DisplaySink, Palette};

/// Longest uninterrupted sleep while waiting out a tick interval.
const SHUTDOWN_POLL: Duration = Duration::from_millis(50);

/// Cloneable stop flag, honoured between ticks.
#[derive(Clone, Debug, Default)]
pub struct ShutdownHandle(Arc<AtomicBool>);

impl ShutdownHandle {
    pub fn request(&self) {
        self.0.store(true, Ordering::Release);
    }

    pub fn is_requested(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }

    /// The underlying flag, for handlers that set it directly (e.g. signal handlers).
    pub fn flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.0)
    }

    /// Sleep for `interval`, returning early once shutdown is requested.
    ///
    /// Returns whether shutdown was requested.
    pub fn wait(&self, interval: Duration) -> bool {
        let deadline = Instant::now() + interval;
        loop {
            if self.is_requested() {
                return true;
            }
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                return false;
            }
            thread::sleep(remaining.min(SHUTDOWN_POLL));
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TickReport {
    pub outcome: TickOutcome,
    /// Pixels written to the sink for this tick.
    pub pixels: usize,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub ticks: u64,
    pub reseeds: u64,
    pub pixels: u64,
}

pub struct Driver<S, E> {
    state: SimulationState,
    sink: S,
    entropy: E,
    palette: Palette,
    config: LifeConfig,
    shutdown: ShutdownHandle,
}

impl<S: DisplaySink, E: EntropySource> Driver<S, E> {
    pub fn new(config: LifeConfig, sink: S, entropy: E) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            state: SimulationState::new(config.rows, config.cols)?,
            sink,
            entropy,
            palette: Palette::with_brightness(config.brightness),
            config,
            shutdown: ShutdownHandle::default(),
        })
    }

    pub fn shutdown_handle(&self) -> ShutdownHandle {
        self.shutdown.clone()
    }

    pub fn state(&self) -> &SimulationState {
        &self.state
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn into_sink(self) -> S {
        self.sink
    }

    /// Seed the grid and paint the whole first frame.
    pub fn start(&mut self) -> usize {
        self.state.reseed(&mut self.entropy);
        self.present()
    }

    /// One tick: advance or reseed, then push the change-set and flush.
    pub fn step(&mut self) -> Result<TickReport> {
        let outcome = self.state.tick(&mut self.entropy)?;
        let pixels = self.present();
        Ok(TickReport { outcome, pixels })
    }

    fn present(&mut self) -> usize {
        let changes = self.state.diff();
        sink::present(changes, &mut self.sink, &self.palette, self.config.pixel_delay)
    }

    /// Start, then tick every `tick_interval` until shut down or
    /// `max_ticks` is reached.
    pub fn run(&mut self) -> Result<RunSummary> {
        let mut summary = RunSummary {
            pixels: self.start() as u64,
            ..RunSummary::default()
        };
        tracing::info!(
            rows = self.config.rows,
            cols = self.config.cols,
            interval_ms = self.config.tick_interval.as_millis() as u64,
            "simulation started"
        );

        loop {
            if self.shutdown.is_requested() {
                tracing::info!(ticks = summary.ticks, "shutdown requested");
                break;
            }
            if self.config.max_ticks.is_some_and(|max| summary.ticks >= max) {
                break;
            }
            if self.shutdown.wait(self.config.tick_interval) {
                tracing::info!(ticks = summary.ticks, "shutdown requested");
                break;
            }

            let report = self.step()?;
            summary.ticks += 1;
            summary.pixels += report.pixels as u64;
            if matches!(report.outcome, TickOutcome::Reseeded { .. }) {
                summary.reseeds += 1;
            }
        }
        Ok(summary)
    }
}
