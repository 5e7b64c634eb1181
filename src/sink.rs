//! Display sink interface and the colour mapping used to drive it.

use std::thread;
use std::time::Duration;

use crate::render::{PixelUpdate, VisualState};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb::new(0, 0, 0);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

// Per-channel gain for the target LED matrix; blue LEDs read dimmer.
const RED_GAIN: u8 = 1;
const GREEN_GAIN: u8 = 1;
const BLUE_GAIN: u8 = 2;

/// Concrete colour for each logical category.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Palette {
    pub background: Rgb,
    pub birth: Rgb,
    pub death: Rgb,
    pub alive: Rgb,
}

impl Default for Palette {
    fn default() -> Self {
        Self::with_brightness(1)
    }
}

impl Palette {
    /// Green births, red deaths, purple survivors on black.
    pub const fn with_brightness(brightness: u8) -> Self {
        let red = brightness.saturating_mul(RED_GAIN);
        let green = brightness.saturating_mul(GREEN_GAIN);
        let blue = brightness.saturating_mul(BLUE_GAIN);
        Self {
            background: Rgb::BLACK,
            birth: Rgb::new(0, green, 0),
            death: Rgb::new(red, 0, 0),
            alive: Rgb::new(red, 0, blue.saturating_mul(2)),
        }
    }

    #[inline]
    pub const fn color(&self, state: VisualState) -> Rgb {
        match state {
            VisualState::Background => self.background,
            VisualState::Birth => self.birth,
            VisualState::Death => self.death,
            VisualState::Alive => self.alive,
        }
    }
}

/// An addressable pixel strip.
///
/// Writes are best effort: a sink that drops or fails a write logs it and
/// carries on, since the engine never reads pixels back.
pub trait DisplaySink {
    fn set_pixel(&mut self, address: usize, color: Rgb);

    /// Latch all pixels set since the previous flush.
    fn flush(&mut self);
}

impl<S: DisplaySink + ?Sized> DisplaySink for &mut S {
    fn set_pixel(&mut self, address: usize, color: Rgb) {
        (**self).set_pixel(address, color);
    }

    fn flush(&mut self) {
        (**self).flush();
    }
}

/// Write one tick's change-set to `sink`, pausing `pixel_delay` after each
/// pixel, then flush exactly once. Returns the number of pixels written.
pub fn present<I, S>(changes: I, sink: &mut S, palette: &Palette, pixel_delay: Duration) -> usize
where
    I: IntoIterator<Item = PixelUpdate>,
    S: DisplaySink + ?Sized,
{
    let mut written = 0;
    for update in changes {
        let color = palette.color(update.state);
        tracing::trace!(address = update.address, state = ?update.state, "set pixel");
        sink.set_pixel(update.address, color);
        written += 1;
        if !pixel_delay.is_zero() {
            thread::sleep(pixel_delay);
        }
    }
    sink.flush();
    written
}

/// In-memory strip that records what was latched.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MemorySink {
    staged: Vec<Rgb>,
    shown: Vec<Rgb>,
    writes_since_flush: usize,
    flushes: usize,
    dropped: usize,
}

impl MemorySink {
    pub fn new(len: usize) -> Self {
        Self {
            staged: vec![Rgb::BLACK; len],
            shown: vec![Rgb::BLACK; len],
            writes_since_flush: 0,
            flushes: 0,
            dropped: 0,
        }
    }

    /// Pixels as of the last flush, indexed by strip address.
    pub fn shown(&self) -> &[Rgb] {
        &self.shown
    }

    pub fn pixel(&self, address: usize) -> Option<Rgb> {
        self.shown.get(address).copied()
    }

    pub fn flushes(&self) -> usize {
        self.flushes
    }

    pub fn writes_since_flush(&self) -> usize {
        self.writes_since_flush
    }

    /// Writes addressed past the end of the strip.
    pub fn dropped(&self) -> usize {
        self.dropped
    }
}

impl DisplaySink for MemorySink {
    fn set_pixel(&mut self, address: usize, color: Rgb) {
        match self.staged.get_mut(address) {
            Some(pixel) => {
                *pixel = color;
                self.writes_since_flush += 1;
            }
            None => {
                tracing::warn!(address, len = self.staged.len(), "pixel write past end of strip");
                self.dropped += 1;
            }
        }
    }

    fn flush(&mut self) {
        self.shown.copy_from_slice(&self.staged);
        self.writes_since_flush = 0;
        self.flushes += 1;
    }
}
