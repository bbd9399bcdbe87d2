use crate::tetris::prelude::*;

/// Enough state to undo one hypothetical placement, including a line clear.
///
/// The cheap variant records nothing but the block itself: as long as no row
/// fills, `remove` is an exact inverse of `add`. Only when a clear is coming
/// does the snapshot pay for a full backup of the playfield.
#[derive(Clone, Debug)]
pub enum Snapshot<'a> {
    Shallow {
        block: Block<'a>,
    },
    Deep {
        rows: Vec<u64>,
        relief: Vec<i32>,
        gaps: Vec<i32>,
        stacks: Vec<Vec<i32>>,
        full_rows: Vec<usize>,
        hash: u64,
        n_total_cleared: u64,
        n_last_cleared: u32,
    },
}

impl Grid {
    /// Places the block and clears any completed rows, returning the
    /// snapshot that undoes the whole thing along with the clear count.
    pub fn apply<'a>(&mut self, block: &Block<'a>) -> (Snapshot<'a>, u32) {
        let snapshot = if !self.full_rows.is_empty() || self.would_fill_row(block) {
            Snapshot::Deep {
                rows: self.rows.clone(),
                relief: self.relief.clone(),
                gaps: self.gaps.clone(),
                stacks: self.stacks.clone(),
                full_rows: self.full_rows.clone(),
                hash: self.hash,
                n_total_cleared: self.n_total_cleared,
                n_last_cleared: self.n_last_cleared,
            }
        } else {
            Snapshot::Shallow { block: *block }
        };

        self.add(block);
        let cleared = self.clear_lines();
        (snapshot, cleared)
    }

    /// Restores the grid to the state captured by `apply`.
    pub fn rollback(&mut self, snapshot: Snapshot<'_>) {
        match snapshot {
            Snapshot::Shallow { block } => self.remove(&block),
            Snapshot::Deep {
                rows,
                relief,
                gaps,
                stacks,
                full_rows,
                hash,
                n_total_cleared,
                n_last_cleared,
            } => {
                self.rows = rows;
                self.relief = relief;
                self.gaps = gaps;
                self.stacks = stacks;
                self.full_rows = full_rows;
                self.hash = hash;
                self.n_total_cleared = n_total_cleared;
                self.n_last_cleared = n_last_cleared;
            }
        }
    }

    /// Whether adding the block would complete at least one row.
    fn would_fill_row(&self, block: &Block<'_>) -> bool {
        let mut row_bits: [(i32, u64); MAX_BLOCK_LEN] = [(-1, 0); MAX_BLOCK_LEN];
        let mut n = 0;
        for cell in block.cells() {
            match row_bits[..n].iter_mut().find(|(y, _)| *y == cell.y) {
                Some((_, bits)) => *bits |= 1 << cell.x,
                None => {
                    row_bits[n] = (cell.y, 1 << cell.x);
                    n += 1;
                }
            }
        }
        row_bits[..n]
            .iter()
            .any(|&(y, bits)| self.rows[y as usize] | bits == self.full_mask)
    }
}
