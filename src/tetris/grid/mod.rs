pub(crate) mod clear;
pub(crate) mod mutate;
pub(crate) mod snapshot;
pub(crate) mod zobrist;

use crate::tetris::prelude::*;

pub use snapshot::Snapshot;

/// Outcome of spawning a block at the top of the playfield.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SpawnOutcome {
    Spawned,
    GameOver,
}

/// The playfield: one u64 bitmask per row, plus the auxiliary indices that
/// keep placement search cheap. Every mutation maintains the indices and the
/// Zobrist hash incrementally; `clear_lines` is the only operation that
/// rewrites row storage wholesale.
#[derive(Clone, Debug, PartialEq)]
pub struct Grid {
    width: usize,
    height: usize,

    /// Bit x of rows[y] is set iff cell (x, y) is occupied.
    rows: Vec<u64>,

    /// rows[y] == full_mask iff row y is completely filled.
    full_mask: u64,

    /// Index of the topmost occupied cell per column; -1 for an empty column.
    relief: Vec<i32>,

    /// Number of empty cells per column that sit under an occupied cell.
    gaps: Vec<i32>,

    /// Sorted occupied y per column; the last entry always equals the relief.
    stacks: Vec<Vec<i32>>,

    /// Unordered list of currently full rows.
    full_rows: Vec<usize>,

    /// Zobrist hash over occupied cells, kept in sync on every mutation.
    hash: u64,

    n_total_cleared: u64,
    n_last_cleared: u32,
}

impl Grid {
    /// A new empty playfield. Fails on dimensions the row words or the
    /// Zobrist key table cannot represent.
    pub fn new(width: usize, height: usize) -> Option<Grid> {
        if width == 0 || width > MAX_GRID_WIDTH || height == 0 || height > MAX_GRID_HEIGHT {
            return None;
        }
        let full_mask = match width {
            64 => u64::MAX,
            w => (1u64 << w) - 1,
        };
        Some(Grid {
            width,
            height,
            rows: vec![0; height],
            full_mask,
            relief: vec![-1; width],
            gaps: vec![0; width],
            stacks: vec![Vec::with_capacity(height); width],
            full_rows: Vec::with_capacity(MAX_BLOCK_LEN),
            hash: 0,
            n_total_cleared: 0,
            n_last_cleared: 0,
        })
    }

    /// Overwrites this grid with another of the same dimensions; a no-op on
    /// mismatched dimensions. Reuses the existing buffers.
    pub fn copy_from(&mut self, src: &Grid) -> bool {
        if self.width != src.width || self.height != src.height {
            return false;
        }
        self.rows.copy_from_slice(&src.rows);
        self.relief.copy_from_slice(&src.relief);
        self.gaps.copy_from_slice(&src.gaps);
        for (dst, src) in self.stacks.iter_mut().zip(src.stacks.iter()) {
            dst.clear();
            dst.extend_from_slice(src);
        }
        self.full_rows.clear();
        self.full_rows.extend_from_slice(&src.full_rows);
        self.hash = src.hash;
        self.n_total_cleared = src.n_total_cleared;
        self.n_last_cleared = src.n_last_cleared;
        true
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// The row bitmask at a given height; 0 when out of range.
    pub fn row(&self, y: usize) -> u64 {
        self.rows.get(y).copied().unwrap_or(0)
    }

    pub fn occupied(&self, x: usize, y: usize) -> bool {
        x < self.width && self.row(y) >> x & 1 == 1
    }

    pub fn relief(&self, x: usize) -> i32 {
        self.relief[x]
    }

    pub fn gaps(&self, x: usize) -> i32 {
        self.gaps[x]
    }

    pub fn stack(&self, x: usize) -> &[i32] {
        &self.stacks[x]
    }

    pub fn total_gaps(&self) -> i32 {
        self.gaps.iter().sum()
    }

    pub fn max_relief(&self) -> i32 {
        self.relief.iter().copied().max().unwrap_or(-1)
    }

    pub fn full_row_count(&self) -> usize {
        self.full_rows.len()
    }

    pub fn total_cleared(&self) -> u64 {
        self.n_total_cleared
    }

    pub fn last_cleared(&self) -> u32 {
        self.n_last_cleared
    }

    /// Whether any of the block's cells leaves the playfield or lands on an
    /// occupied cell. The bounding box rejects most misses before the
    /// cell-wise test runs.
    pub fn collides(&self, block: &Block<'_>) -> bool {
        if block.extreme(Direction::Left) < 0
            || block.extreme(Direction::Bot) < 0
            || block.extreme(Direction::Right) >= self.width as i32
            || block.extreme(Direction::Top) >= self.height as i32
        {
            return true;
        }
        block
            .cells()
            .iter()
            .any(|c| self.rows[c.y as usize] >> c.x & 1 == 1)
    }

    /// Centers the block horizontally and elevates it so that no rotation
    /// pokes above the ceiling. Reports game over, without touching the
    /// grid, when even the spawn cell overlaps the stack.
    pub fn spawn(&self, block: &mut Block<'_>) -> SpawnOutcome {
        block.offset = Coord::new(
            (self.width as i32 - block.rot_wh().x) / 2,
            self.height as i32 - block.shape.max_dim_len,
        );
        if self.collides(block) {
            SpawnOutcome::GameOver
        } else {
            SpawnOutcome::Spawned
        }
    }

    /// How far the block can fall. The BOT crust gives the answer in one
    /// pass while the block floats above the relief; once the crust min goes
    /// negative the block is interleaved with the stack, and we descend cell
    /// by cell instead.
    pub fn drop_amount(&self, block: &Block<'_>) -> i32 {
        if self.collides(block) {
            return 0;
        }

        let mut amount = i32::MAX;
        for cell in block.crust_cells(Direction::Bot) {
            amount = amount.min(cell.y - (self.relief[cell.x as usize] + 1));
        }

        if amount < 0 {
            amount = 0;
            loop {
                let mut probe = *block;
                probe.shift(Direction::Bot, amount + 1);
                if self.collides(&probe) {
                    break;
                }
                amount += 1;
            }
        }
        amount
    }

    /// Drops the block as far as it goes; returns the distance fallen.
    pub fn drop(&self, block: &mut Block<'_>) -> i32 {
        let amount = self.drop_amount(block);
        block.shift(Direction::Bot, amount);
        amount
    }

    /// Shifts the block if the result stays legal; undoes it otherwise.
    pub fn shift(&self, block: &mut Block<'_>, dir: Direction, amount: i32) -> bool {
        block.shift(dir, amount);
        if self.collides(block) {
            block.shift(dir, -amount);
            return false;
        }
        true
    }

    /// Rotates the block if the result stays legal; undoes it otherwise.
    /// No wall kicks.
    pub fn rotate(&self, block: &mut Block<'_>, amount: i32) -> bool {
        block.rotate(amount);
        if self.collides(block) {
            block.rotate(-amount);
            return false;
        }
        true
    }

    /// Recomputes every auxiliary index from the row masks and asserts it
    /// matches the incrementally-maintained state. Debugging and test aid.
    pub fn assert_consistent(&self) {
        for x in 0..self.width {
            let occupied: Vec<i32> = (0..self.height as i32)
                .filter(|&y| self.occupied(x, y as usize))
                .collect();
            let relief = occupied.last().copied().unwrap_or(-1);
            assert_eq!(self.relief[x], relief, "relief[{x}]");
            assert_eq!(
                self.gaps[x],
                relief + 1 - occupied.len() as i32,
                "gaps[{x}]"
            );
            assert_eq!(self.stacks[x], occupied, "stacks[{x}]");
        }

        for y in 0..self.height {
            assert_eq!(
                self.rows[y] == self.full_mask,
                self.full_rows.contains(&y),
                "full_rows at {y}"
            );
        }

        let mut hash = 0u64;
        for y in 0..self.height {
            hash ^= zobrist::row_key(y, self.rows[y]);
        }
        assert_eq!(self.hash, hash, "zobrist hash");
    }
}
