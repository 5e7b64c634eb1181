#[cfg(feature = "mimalloc-global")]
#[global_allocator]
static GLOBAL_ALLOCATOR: mimalloc::MiMalloc = mimalloc::MiMalloc;

use std::io::{self, Write};
use std::process::ExitCode;
use std::time::Duration;

use strip_life::grid::cell_count;
use strip_life::render::serpentine_position;
use strip_life::seed::{self, SeedOrigin, SystemClock};
use strip_life::{DisplaySink, Driver, LifeConfig, LifeError, Rgb, ShutdownHandle};
use tracing_subscriber::EnvFilter;

const USAGE: &str = "usage: strip-life [--rows N] [--cols N] [--interval-ms N] \
[--pixel-delay-ms N] [--brightness N] [--seed N] [--ticks N]";

/// What the command line asked for.
#[derive(Debug, PartialEq, Eq)]
enum Command {
    Run(LifeConfig),
    Help,
}

/// Parse `args`, program name first.
fn parse_args(args: &[String]) -> Result<Command, LifeError> {
    let mut config = LifeConfig::default();
    let next_arg = |i: usize, flag: &str| -> Result<&str, LifeError> {
        args.get(i)
            .map(String::as_str)
            .ok_or_else(|| LifeError::InvalidArgument(format!("{flag} requires a value")))
    };
    let number = |i: usize, flag: &str| -> Result<u64, LifeError> {
        next_arg(i, flag)?.parse().map_err(|_| {
            LifeError::InvalidArgument(format!("{flag} requires a non-negative integer"))
        })
    };
    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--rows" => {
                i += 1;
                config.rows = number(i, "--rows")? as usize;
            }
            "--cols" => {
                i += 1;
                config.cols = number(i, "--cols")? as usize;
            }
            "--interval-ms" => {
                i += 1;
                config = config.tick_interval(Duration::from_millis(number(i, "--interval-ms")?));
            }
            "--pixel-delay-ms" => {
                i += 1;
                config = config.pixel_delay(Duration::from_millis(number(i, "--pixel-delay-ms")?));
            }
            "--brightness" => {
                i += 1;
                let value = number(i, "--brightness")?;
                config = config.brightness(value.min(u8::MAX as u64) as u8);
            }
            "--seed" => {
                i += 1;
                config = config.seed(number(i, "--seed")?);
            }
            "--ticks" => {
                i += 1;
                config = config.max_ticks(number(i, "--ticks")?);
            }
            "--help" | "-h" => return Ok(Command::Help),
            other => {
                return Err(LifeError::InvalidArgument(format!(
                    "unknown argument: {other}\n{USAGE}"
                )));
            }
        }
        i += 1;
    }
    config.validate()?;
    Ok(Command::Run(config))
}

/// Draws the strip as a `rows x cols` block of coloured cells on stdout.
struct TerminalSink {
    rows: usize,
    cols: usize,
    pixels: Vec<Rgb>,
    out: io::Stdout,
}

impl TerminalSink {
    fn new(rows: usize, cols: usize) -> Result<Self, LifeError> {
        Ok(Self {
            rows,
            cols,
            pixels: vec![Rgb::BLACK; cell_count(rows, cols)?],
            out: io::stdout(),
        })
    }

    fn draw(&mut self) -> io::Result<()> {
        let mut frame = String::with_capacity(self.rows * self.cols * 24);
        frame.push_str("\x1b[H");
        for row in 0..self.rows {
            for col in 0..self.cols {
                let address = strip_life::serpentine_address(row, col, self.cols);
                let Rgb { r, g, b } = visible(self.pixels[address]);
                frame.push_str(&format!("\x1b[48;2;{r};{g};{b}m  "));
            }
            frame.push_str("\x1b[0m\n");
        }
        let mut out = self.out.lock();
        out.write_all(frame.as_bytes())?;
        out.flush()
    }
}

impl Drop for TerminalSink {
    fn drop(&mut self) {
        let mut out = self.out.lock();
        if let Err(error) = out.write_all(b"\x1b[0m\n").and_then(|()| out.flush()) {
            tracing::warn!(%error, "terminal reset failed");
        }
    }
}

/// Stretch dim strip colours so the brightest channel is fully lit.
fn visible(color: Rgb) -> Rgb {
    let peak = color.r.max(color.g).max(color.b) as u16;
    if peak == 0 {
        return color;
    }
    let scale = |channel: u8| (channel as u16 * 255 / peak) as u8;
    Rgb::new(scale(color.r), scale(color.g), scale(color.b))
}

impl DisplaySink for TerminalSink {
    fn set_pixel(&mut self, address: usize, color: Rgb) {
        match self.pixels.get_mut(address) {
            Some(pixel) => *pixel = color,
            None => {
                let (row, col) = serpentine_position(address, self.cols);
                tracing::warn!(address, row, col, "pixel write past end of strip");
            }
        }
    }

    fn flush(&mut self) {
        if let Err(error) = self.draw() {
            tracing::warn!(%error, "terminal write failed");
        }
    }
}

/// Route SIGINT and SIGTERM to `shutdown`; a second signal exits at once.
#[cfg(unix)]
fn install_signal_handlers(shutdown: &ShutdownHandle) {
    use signal_hook::consts::signal::{SIGINT, SIGTERM};
    use signal_hook::flag;

    for signal in [SIGINT, SIGTERM] {
        let registered = flag::register_conditional_shutdown(signal, 1, shutdown.flag())
            .and_then(|_| flag::register(signal, shutdown.flag()));
        if let Err(error) = registered {
            tracing::warn!(%error, signal, "could not install signal handler");
        }
    }
}

#[cfg(not(unix))]
fn install_signal_handlers(_shutdown: &ShutdownHandle) {}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();

    let args: Vec<String> = std::env::args().collect();
    let config = match parse_args(&args) {
        Ok(Command::Run(config)) => config,
        Ok(Command::Help) => {
            println!("{USAGE}");
            return ExitCode::SUCCESS;
        }
        Err(error) => {
            eprintln!("{error}");
            return ExitCode::FAILURE;
        }
    };

    let (entropy, origin) = match config.seed {
        Some(value) => (seed::fixed_entropy(value), SeedOrigin::Fixed(value)),
        None => seed::seed_entropy(&mut SystemClock),
    };
    tracing::info!(?origin, "entropy source ready");

    let mut driver = match TerminalSink::new(config.rows, config.cols)
        .and_then(|sink| Driver::new(config, sink, entropy))
    {
        Ok(driver) => driver,
        Err(error) => {
            eprintln!("{error}");
            return ExitCode::FAILURE;
        }
    };
    install_signal_handlers(&driver.shutdown_handle());
    print!("\x1b[2J");

    match driver.run() {
        Ok(summary) => {
            tracing::info!(
                ticks = summary.ticks,
                reseeds = summary.reseeds,
                pixels = summary.pixels,
                "simulation finished"
            );
            ExitCode::SUCCESS
        }
        Err(error) => {
            tracing::error!(%error, "simulation stopped");
            ExitCode::FAILURE
        }
    }
}
