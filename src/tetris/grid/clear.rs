use super::zobrist;
use crate::tetris::prelude::*;

impl Grid {
    /// Removes every full row, compacting the survivors downward in place.
    /// The hash is re-folded only over the affected span; the per-column
    /// indices are rebuilt wholesale afterwards. Returns the number of rows
    /// cleared.
    pub fn clear_lines(&mut self) -> u32 {
        if self.full_rows.is_empty() {
            return 0;
        }
        self.full_rows.sort_unstable();
        let removed = self.full_rows.len() as u32;
        let lowest = self.full_rows[0];

        // fold the old contents of the affected span out of the hash
        for y in lowest..self.height {
            self.hash ^= zobrist::row_key(y, self.rows[y]);
        }

        // survivors slide down over the full rows; the vacated top empties
        let mut dst = lowest;
        for src in lowest..self.height {
            if self.rows[src] == self.full_mask {
                continue;
            }
            self.rows[dst] = self.rows[src];
            dst += 1;
        }
        for y in dst..self.height {
            self.rows[y] = 0;
        }

        // fold the new contents back in
        for y in lowest..self.height {
            self.hash ^= zobrist::row_key(y, self.rows[y]);
        }

        self.full_rows.clear();
        self.rebuild_columns();
        self.n_total_cleared += removed as u64;
        self.n_last_cleared = removed;
        removed
    }

    /// Recomputes relief, gaps, and stacks from the row masks.
    fn rebuild_columns(&mut self) {
        for x in 0..self.width {
            self.stacks[x].clear();
            for y in 0..self.height {
                if self.rows[y] >> x & 1 == 1 {
                    self.stacks[x].push(y as i32);
                }
            }
            let relief = self.stacks[x].last().copied().unwrap_or(-1);
            self.relief[x] = relief;
            self.gaps[x] = relief + 1 - self.stacks[x].len() as i32;
        }
    }

    /// Finds a Tetris-ready well: a column at least 4 below both neighbours
    /// (the walls count as infinitely tall) with the four cells above its
    /// stack open.
    pub fn tetris_ready_col(&self) -> Option<usize> {
        let wall = i32::MAX / 2;
        for x in 0..self.width {
            let h = self.relief[x] + 1;
            let left = match x {
                0 => wall,
                _ => self.relief[x - 1] + 1,
            };
            let right = match x {
                _ if x == self.width - 1 => wall,
                _ => self.relief[x + 1] + 1,
            };
            if left - h >= 4
                && right - h >= 4
                && h + 4 <= self.height as i32
                && (h..h + 4).all(|y| !self.occupied(x, y as usize))
            {
                return Some(x);
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use crate::tetris::prelude::*;

    fn fill_row(grid: &mut Grid, y: usize) {
        for x in 0..grid.width() {
            grid.set_cell(x, y, true);
        }
    }

    #[test]
    fn clearing_an_empty_grid_is_a_no_op() {
        let mut grid = Grid::new(GRID_WIDTH, GRID_HEIGHT).unwrap();
        assert_eq!(grid.clear_lines(), 0);
        assert_eq!(grid.total_cleared(), 0);
    }

    #[test]
    fn four_full_bottom_rows_collapse_to_nothing() {
        let mut grid = Grid::new(GRID_WIDTH, GRID_HEIGHT).unwrap();
        for y in 0..4 {
            fill_row(&mut grid, y);
        }
        assert_eq!(grid.full_row_count(), 4);

        assert_eq!(grid.clear_lines(), 4);
        grid.assert_consistent();
        assert_eq!(grid.full_row_count(), 0);
        assert_eq!(grid.total_cleared(), 4);
        assert_eq!(grid.last_cleared(), 4);
        assert_eq!(grid.hash(), 0);
        assert!((0..GRID_HEIGHT).all(|y| grid.row(y) == 0));
    }

    #[test]
    fn non_contiguous_clear_compacts_survivors() {
        let mut grid = Grid::new(GRID_WIDTH, GRID_HEIGHT).unwrap();
        for y in [1, 3, 5] {
            fill_row(&mut grid, y);
        }
        for y in [0, 2, 4] {
            grid.set_cell(0, y, true);
        }

        assert_eq!(grid.clear_lines(), 3);
        grid.assert_consistent();
        for y in 0..3 {
            assert_eq!(grid.row(y), 1, "survivor at {y}");
        }
        assert!((3..GRID_HEIGHT).all(|y| grid.row(y) == 0));
        assert_eq!(grid.relief(0), 2);
    }

    #[test]
    fn clear_preserves_rows_above_the_span() {
        let mut grid = Grid::new(GRID_WIDTH, GRID_HEIGHT).unwrap();
        fill_row(&mut grid, 0);
        grid.set_cell(2, 1, true);
        grid.set_cell(3, 2, true);

        assert_eq!(grid.clear_lines(), 1);
        grid.assert_consistent();
        assert!(grid.occupied(2, 0));
        assert!(grid.occupied(3, 1));
        assert_eq!(grid.total_cleared(), 1);
    }

    #[test]
    fn well_detection_wants_depth_four_and_headroom() {
        let mut grid = Grid::new(GRID_WIDTH, GRID_HEIGHT).unwrap();
        // level ground at height 4 everywhere except column 13
        for x in 0..GRID_WIDTH - 1 {
            for y in 0..4 {
                grid.set_cell(x, y, true);
            }
        }
        assert_eq!(grid.tetris_ready_col(), Some(GRID_WIDTH - 1));

        // a plug one cell up the well breaks it
        grid.set_cell(GRID_WIDTH - 1, 0, true);
        assert_eq!(grid.tetris_ready_col(), None);
    }

    #[test]
    fn shallow_wells_do_not_count() {
        let mut grid = Grid::new(GRID_WIDTH, GRID_HEIGHT).unwrap();
        for x in 0..GRID_WIDTH - 1 {
            for y in 0..3 {
                grid.set_cell(x, y, true);
            }
        }
        assert_eq!(grid.tetris_ready_col(), None);
    }
}
