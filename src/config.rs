use std::time::Duration;

use crate::error::Result;
use crate::grid;

pub const DEFAULT_ROWS: usize = 16;
pub const DEFAULT_COLS: usize = 16;
pub const DEFAULT_TICK_INTERVAL: Duration = Duration::from_secs(1);
/// Pause after each pixel write; the strip drops writes sent faster.
pub const DEFAULT_PIXEL_DELAY: Duration = Duration::from_millis(5);
pub const DEFAULT_BRIGHTNESS: u8 = 1;

/// Configuration for a simulation run.
///
/// Use `LifeConfig::default()` for the 16x16 strip defaults, or adjust
/// individual knobs via the builder methods.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LifeConfig {
    pub rows: usize,
    pub cols: usize,
    /// Sleep between ticks.
    pub tick_interval: Duration,
    /// Sleep after each pixel write while presenting a change-set.
    pub pixel_delay: Duration,
    /// Palette scale handed to the display sink.
    pub brightness: u8,
    /// Fixed generator seed. `None` means seed from the clock at startup.
    pub seed: Option<u64>,
    /// Stop after this many ticks. `None` means run until shut down.
    pub max_ticks: Option<u64>,
}

impl Default for LifeConfig {
    fn default() -> Self {
        Self {
            rows: DEFAULT_ROWS,
            cols: DEFAULT_COLS,
            tick_interval: DEFAULT_TICK_INTERVAL,
            pixel_delay: DEFAULT_PIXEL_DELAY,
            brightness: DEFAULT_BRIGHTNESS,
            seed: None,
            max_ticks: None,
        }
    }
}

impl LifeConfig {
    pub fn dimensions(mut self, rows: usize, cols: usize) -> Self {
        self.rows = rows;
        self.cols = cols;
        self
    }

    pub fn tick_interval(mut self, interval: Duration) -> Self {
        self.tick_interval = interval;
        self
    }

    pub fn pixel_delay(mut self, delay: Duration) -> Self {
        self.pixel_delay = delay;
        self
    }

    pub fn brightness(mut self, brightness: u8) -> Self {
        self.brightness = brightness;
        self
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn max_ticks(mut self, ticks: u64) -> Self {
        self.max_ticks = Some(ticks);
        self
    }

    /// Reject shapes that cannot back a grid.
    pub fn validate(&self) -> Result<()> {
        grid::cell_count(self.rows, self.cols).map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::LifeConfig;
    use crate::error::LifeError;

    #[test]
    fn defaults_match_sixteen_square_strip() {
        let config = LifeConfig::default();
        assert_eq!((config.rows, config.cols), (16, 16));
        assert_eq!(config.tick_interval, Duration::from_secs(1));
        assert_eq!(config.pixel_delay, Duration::from_millis(5));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn builder_overrides_fields() {
        let config = LifeConfig::default()
            .dimensions(8, 32)
            .seed(9)
            .max_ticks(3)
            .pixel_delay(Duration::ZERO);
        assert_eq!((config.rows, config.cols), (8, 32));
        assert_eq!(config.seed, Some(9));
        assert_eq!(config.max_ticks, Some(3));
        assert!(config.pixel_delay.is_zero());
    }

    #[test]
    fn zero_dimensions_are_rejected() {
        let config = LifeConfig::default().dimensions(0, 16);
        assert_eq!(config.validate(), Err(LifeError::EmptyGrid));
    }

    #[test]
    fn overflowing_dimensions_are_rejected() {
        let huge = 1usize << (usize::BITS / 2 + 1);
        let config = LifeConfig::default().dimensions(huge, huge);
        assert_eq!(
            config.validate(),
            Err(LifeError::GridTooLarge { rows: huge, cols: huge })
        );
    }
}
