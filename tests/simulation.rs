use std::time::Duration;

use strip_life::seed::fixed_entropy;
use strip_life::{
    Driver, LifeConfig, MemorySink, Palette, SimulationState, TickOutcome, VisualState,
};

fn quick_config(rows: usize, cols: usize) -> LifeConfig {
    LifeConfig::default()
        .dimensions(rows, cols)
        .tick_interval(Duration::ZERO)
        .pixel_delay(Duration::ZERO)
}

fn run_seeded(seed: u64, ticks: u64) -> (Vec<strip_life::Rgb>, u64) {
    let config = quick_config(16, 16).max_ticks(ticks);
    let mut driver = Driver::new(config, MemorySink::new(256), fixed_entropy(seed)).unwrap();
    let summary = driver.run().unwrap();
    (driver.into_sink().shown().to_vec(), summary.reseeds)
}

#[test]
fn seeded_runs_are_reproducible() {
    assert_eq!(run_seeded(0xA1, 40), run_seeded(0xA1, 40));
}

#[test]
fn driver_frame_matches_final_grid() {
    let config = quick_config(8, 8).max_ticks(30).brightness(2);
    let mut driver = Driver::new(config, MemorySink::new(64), fixed_entropy(77)).unwrap();
    driver.run().unwrap();

    let palette = Palette::with_brightness(2);
    let grid = driver.state().grid().clone();
    for row in 0..8 {
        for col in 0..8 {
            let expected = palette.color(VisualState::of(grid.get(row, col).unwrap()));
            let address = strip_life::serpentine_address(row, col, 8);
            assert_eq!(driver.sink().pixel(address), Some(expected));
        }
    }
}

#[test]
fn small_grid_eventually_reseeds() {
    // A 3x3 world runs out of room quickly and settles or dies out.
    let mut state = SimulationState::new(3, 3).unwrap();
    let mut rng = fixed_entropy(5);
    state.reseed(&mut rng);
    let reseeded = (0..64).any(|_| {
        matches!(
            state.tick(&mut rng).unwrap(),
            TickOutcome::Reseeded { .. }
        )
    });
    assert!(reseeded);
    assert!(state.reseeds() >= 2);
}

#[test]
fn zero_sized_config_is_rejected() {
    let config = quick_config(0, 16);
    assert!(Driver::new(config, MemorySink::new(0), fixed_entropy(1)).is_err());
}
