use std::time::Duration;

use strip_life::render::serpentine_position;
use strip_life::seed::fixed_entropy;
use strip_life::sink::present;
use strip_life::{
    CellState, Grid, MemorySink, Palette, PixelUpdate, SimulationState, VisualState, diff, reseed,
    serpentine_address,
};

fn grid_with(rows: usize, cols: usize, cells: &[(usize, usize)]) -> Grid {
    let mut grid = Grid::new(rows, cols).unwrap();
    for &(row, col) in cells {
        grid.set(row, col, CellState::ALIVE).unwrap();
    }
    grid
}

fn assert_sink_mirrors_grid(sink: &MemorySink, grid: &Grid, palette: &Palette) {
    let (rows, cols) = grid.dimensions();
    for row in 0..rows {
        for col in 0..cols {
            let expected = palette.color(VisualState::of(grid.get(row, col).unwrap()));
            let address = serpentine_address(row, col, cols);
            assert_eq!(
                sink.pixel(address),
                Some(expected),
                "pixel {address} for ({row},{col})"
            );
        }
    }
}

#[test]
fn serpentine_addresses_for_sixteen_wide_strip() {
    assert_eq!(serpentine_address(0, 0, 16), 0);
    assert_eq!(serpentine_address(0, 15, 16), 15);
    assert_eq!(serpentine_address(1, 15, 16), 16);
    assert_eq!(serpentine_address(1, 0, 16), 31);
    assert_eq!(serpentine_position(31, 16), (1, 0));
}

#[test]
fn reseeded_grid_emits_every_cell_once_in_row_major_order() {
    let mut grid = Grid::new(4, 4).unwrap();
    reseed(&mut grid, &mut fixed_entropy(21));

    let updates: Vec<PixelUpdate> = diff(&mut grid).collect();
    assert_eq!(updates.len(), 16);
    let positions: Vec<(usize, usize)> = updates.iter().map(|u| (u.row, u.col)).collect();
    let expected: Vec<(usize, usize)> = (0..4).flat_map(|r| (0..4).map(move |c| (r, c))).collect();
    assert_eq!(positions, expected);
    for update in &updates {
        assert_eq!(update.address, serpentine_address(update.row, update.col, 4));
        assert!(matches!(update.state, VisualState::Alive | VisualState::Background));
    }

    assert_eq!(grid.pending_changes(), 0);
    assert_eq!(diff(&mut grid).count(), 0);
}

#[test]
fn blinker_step_emits_only_transitions() {
    let mut state = SimulationState::from_grid(grid_with(5, 5, &[(2, 1), (2, 2), (2, 3)])).unwrap();
    state.tick(&mut fixed_entropy(0)).unwrap();

    let updates = state.diff().into_frame();
    assert_eq!(
        updates,
        vec![
            PixelUpdate {
                address: 7,
                state: VisualState::Birth,
                row: 1,
                col: 2,
            },
            PixelUpdate {
                address: 11,
                state: VisualState::Death,
                row: 2,
                col: 1,
            },
            PixelUpdate {
                address: 13,
                state: VisualState::Death,
                row: 2,
                col: 3,
            },
            PixelUpdate {
                address: 17,
                state: VisualState::Birth,
                row: 3,
                col: 2,
            },
        ]
    );
}

#[test]
fn settled_birth_is_repainted_as_alive() {
    let mut state = SimulationState::from_grid(grid_with(4, 4, &[(0, 0), (0, 1), (1, 0)])).unwrap();
    let mut rng = fixed_entropy(0);

    state.tick(&mut rng).unwrap();
    let first = state.diff().into_frame();
    assert_eq!(
        first,
        vec![PixelUpdate {
            address: 6,
            state: VisualState::Birth,
            row: 1,
            col: 1,
        }]
    );

    state.tick(&mut rng).unwrap();
    let second = state.diff().into_frame();
    assert_eq!(
        second,
        vec![PixelUpdate {
            address: 6,
            state: VisualState::Alive,
            row: 1,
            col: 1,
        }]
    );
}

#[test]
fn sink_tracks_grid_across_ticks() {
    let palette = Palette::with_brightness(3);
    let mut sink = MemorySink::new(36);
    let mut state = SimulationState::new(6, 6).unwrap();
    let mut rng = fixed_entropy(0xFEED);

    state.reseed(&mut rng);
    present(state.diff(), &mut sink, &palette, Duration::ZERO);
    assert_sink_mirrors_grid(&sink, state.grid(), &palette);

    for tick in 0..25 {
        state.tick(&mut rng).unwrap();
        present(state.diff(), &mut sink, &palette, Duration::ZERO);
        assert_sink_mirrors_grid(&sink, state.grid(), &palette);
        assert_eq!(sink.flushes(), tick + 2);
    }
}
