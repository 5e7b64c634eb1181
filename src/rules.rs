//! Rule table for B3/S23.

/// Largest neighbor count a cell can see in a bounded Moore neighborhood.
pub const MAX_NEIGHBORS: usize = 8;

/// Next-state lookup indexed by current state and live neighbor count.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RuleTable {
    table: [bool; 2 * (MAX_NEIGHBORS + 1)],
}

impl Default for RuleTable {
    fn default() -> Self {
        Self::new()
    }
}

impl RuleTable {
    pub const fn new() -> Self {
        let mut table = [false; 2 * (MAX_NEIGHBORS + 1)];
        let mut neighbors = 0;
        while neighbors <= MAX_NEIGHBORS {
            table[slot(false, neighbors)] = output_for(false, neighbors);
            table[slot(true, neighbors)] = output_for(true, neighbors);
            neighbors += 1;
        }
        Self { table }
    }

    /// Whether a cell is alive next generation.
    #[inline(always)]
    pub fn lookup(&self, alive: bool, neighbors: u8) -> bool {
        self.table[slot(alive, neighbors as usize)]
    }
}

#[inline(always)]
const fn slot(alive: bool, neighbors: usize) -> usize {
    (alive as usize) * (MAX_NEIGHBORS + 1) + neighbors
}

const fn output_for(alive: bool, neighbors: usize) -> bool {
    if alive {
        neighbors == 2 || neighbors == 3
    } else {
        neighbors == 3
    }
}
