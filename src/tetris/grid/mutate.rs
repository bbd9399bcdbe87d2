use super::zobrist;
use crate::tetris::prelude::*;

impl Grid {
    /// Writes the block's four cells into the playfield, keeping every
    /// auxiliary index and the hash in step. The cells must be in bounds and
    /// empty; `collides` is the caller's gate.
    pub fn add(&mut self, block: &Block<'_>) {
        debug_assert!(!self.collides(block));
        for cell in block.cells() {
            self.fill(cell.x as usize, cell.y as usize);
        }
    }

    /// Erases the block's four cells, in reverse order; the exact inverse of
    /// `add` on every observable field.
    pub fn remove(&mut self, block: &Block<'_>) {
        for cell in block.cells().iter().rev() {
            self.erase(cell.x as usize, cell.y as usize);
        }
    }

    /// Sets or clears a single cell, maintaining the indices. A no-op when
    /// the cell is out of range or already in the requested state.
    pub fn set_cell(&mut self, x: usize, y: usize, on: bool) -> bool {
        if x >= self.width || y >= self.height || self.occupied(x, y) == on {
            return false;
        }
        if on {
            self.fill(x, y);
        } else {
            self.erase(x, y);
        }
        true
    }

    fn fill(&mut self, x: usize, y: usize) {
        self.rows[y] |= 1 << x;
        self.hash ^= zobrist::cell_key(x, y);
        if self.rows[y] == self.full_mask {
            self.full_rows.push(y);
        }

        let y = y as i32;
        let relief = self.relief[x];
        if y > relief {
            // new top of the column; everything between is now a gap
            self.gaps[x] += y - relief - 1;
            self.relief[x] = y;
            self.stacks[x].push(y);
        } else {
            // buried under an overhang; one former gap is now filled
            let at = self.stacks[x].partition_point(|&v| v < y);
            self.stacks[x].insert(at, y);
            self.gaps[x] -= 1;
        }
    }

    fn erase(&mut self, x: usize, y: usize) {
        if self.rows[y] == self.full_mask {
            if let Some(at) = self.full_rows.iter().position(|&fy| fy == y) {
                self.full_rows.swap_remove(at);
            }
        }
        self.rows[y] &= !(1 << x);
        self.hash ^= zobrist::cell_key(x, y);

        let y = y as i32;
        if y == self.relief[x] {
            self.stacks[x].pop();
            let relief = self.stacks[x].last().copied().unwrap_or(-1);
            self.gaps[x] -= y - relief - 1;
            self.relief[x] = relief;
        } else {
            let at = self.stacks[x].partition_point(|&v| v < y);
            self.stacks[x].remove(at);
            self.gaps[x] += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::tetris::prelude::*;

    #[test]
    fn add_then_remove_restores_everything() {
        let table = ShapeTable::new();
        let mut grid = Grid::new(GRID_WIDTH, GRID_HEIGHT).unwrap();
        for x in 0..6 {
            grid.set_cell(x, 0, true);
        }
        let reference = grid.clone();

        let mut block = Block::new(table.by_kind(ShapeKind::S));
        grid.spawn(&mut block);
        grid.drop(&mut block);
        grid.add(&block);
        grid.assert_consistent();
        assert_ne!(grid, reference);

        grid.remove(&block);
        grid.assert_consistent();
        assert_eq!(grid, reference);
    }

    #[test]
    fn add_tracks_gaps_under_overhangs() {
        let table = ShapeTable::new();
        let mut grid = Grid::new(GRID_WIDTH, GRID_HEIGHT).unwrap();

        // a vertical I standing on the floor of column 0
        let post = Block::at(table.by_kind(ShapeKind::I), 1, Coord::new(0, 0));
        grid.add(&post);
        assert_eq!(grid.relief(0), 3);
        assert_eq!(grid.gaps(0), 0);

        // an S whose lower-left cell lands at height 5, hanging a roof over
        // the post with one empty cell in between
        let roof = Block::at(table.by_kind(ShapeKind::S), 0, Coord::new(0, 5));
        grid.add(&roof);
        grid.assert_consistent();
        assert_eq!(grid.relief(0), 5);
        assert_eq!(grid.gaps(0), 1);
        assert_eq!(grid.relief(1), 6);
        assert_eq!(grid.gaps(1), 5);

        // filling the hole under the roof shrinks the gap count in place
        grid.set_cell(0, 4, true);
        grid.assert_consistent();
        assert_eq!(grid.gaps(0), 0);
    }

    #[test]
    fn full_rows_track_membership_through_add_and_remove() {
        let table = ShapeTable::new();
        let mut grid = Grid::new(GRID_WIDTH, GRID_HEIGHT).unwrap();
        for x in 0..GRID_WIDTH - 4 {
            grid.set_cell(x, 0, true);
        }
        assert_eq!(grid.full_row_count(), 0);

        let closer = Block::at(table.by_kind(ShapeKind::I), 0, Coord::new(10, 0));
        grid.add(&closer);
        assert_eq!(grid.full_row_count(), 1);
        grid.assert_consistent();

        grid.remove(&closer);
        assert_eq!(grid.full_row_count(), 0);
        grid.assert_consistent();
    }

    #[test]
    fn set_cell_rejects_out_of_range_and_redundant_writes() {
        let mut grid = Grid::new(GRID_WIDTH, GRID_HEIGHT).unwrap();
        assert!(!grid.set_cell(GRID_WIDTH, 0, true));
        assert!(!grid.set_cell(0, GRID_HEIGHT, true));
        assert!(grid.set_cell(3, 3, true));
        assert!(!grid.set_cell(3, 3, true));
        assert!(grid.set_cell(3, 3, false));
        assert!(!grid.set_cell(3, 3, false));
        grid.assert_consistent();
        assert_eq!(grid.hash(), 0);
    }
}
