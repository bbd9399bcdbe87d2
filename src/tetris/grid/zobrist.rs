use std::sync::OnceLock;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::Grid;
use crate::tetris::consts::{MAX_GRID_HEIGHT, MAX_GRID_WIDTH};

const NUM_CELL_KEYS: usize = MAX_GRID_WIDTH * MAX_GRID_HEIGHT;

static CELL_KEYS: OnceLock<Box<[u64; NUM_CELL_KEYS]>> = OnceLock::new();

/// The Zobrist key of one cell. The table is filled once per process from
/// the OS entropy source; every grid shares it, so copies hash identically.
pub(super) fn cell_key(x: usize, y: usize) -> u64 {
    let table = CELL_KEYS.get_or_init(|| {
        let mut rng = StdRng::from_os_rng();
        let mut table = Box::new([0u64; NUM_CELL_KEYS]);
        for entry in table.iter_mut() {
            *entry = rng.random();
        }
        table
    });
    table[x * MAX_GRID_HEIGHT + y]
}

/// XOR of the cell keys of every set bit in a row mask.
pub(super) fn row_key(y: usize, mask: u64) -> u64 {
    let mut key = 0;
    let mut rest = mask;
    while rest != 0 {
        let x = rest.trailing_zeros() as usize;
        key ^= cell_key(x, y);
        rest &= rest - 1;
    }
    key
}

impl Grid {
    /// The incrementally-maintained Zobrist hash of the occupied cells.
    pub fn hash(&self) -> u64 {
        self.hash
    }

    /// A cheap 64-bit fold of the bottom rows, used by the search tabu
    /// table. Coarser than the cell hash but two orders of magnitude
    /// cheaper to recompute per node.
    pub fn signature(&self) -> u64 {
        let mut sig = 0u64;
        for y in 0..self.height.min(20) {
            sig ^= self.rows[y].rotate_left((7 * y as u32) % 64);
        }
        sig
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tetris::prelude::*;

    #[test]
    fn cell_keys_are_stable_within_a_process() {
        assert_eq!(cell_key(3, 7), cell_key(3, 7));
        assert_ne!(cell_key(0, 0), cell_key(0, 1));
    }

    #[test]
    fn hash_is_order_independent_and_self_inverse() {
        let mut grid = Grid::new(GRID_WIDTH, GRID_HEIGHT).unwrap();
        grid.set_cell(1, 2, true);
        grid.set_cell(4, 0, true);
        let forward = grid.hash();

        let mut other = Grid::new(GRID_WIDTH, GRID_HEIGHT).unwrap();
        other.set_cell(4, 0, true);
        other.set_cell(1, 2, true);
        assert_eq!(other.hash(), forward);

        other.set_cell(4, 0, false);
        other.set_cell(1, 2, false);
        assert_eq!(other.hash(), 0);
    }

    #[test]
    fn signatures_distinguish_rows_holding_the_same_mask() {
        let mut low = Grid::new(GRID_WIDTH, GRID_HEIGHT).unwrap();
        low.set_cell(2, 0, true);
        let mut high = Grid::new(GRID_WIDTH, GRID_HEIGHT).unwrap();
        high.set_cell(2, 1, true);
        assert_ne!(low.signature(), high.signature());
    }
}
