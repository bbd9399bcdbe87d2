use super::evaluator::LINE_CLEAR_BONUS;
use super::Agent;
use crate::tetris::prelude::*;

/// A placement decision: target rotation and target column for the piece in
/// play. The driver walks the block there and hard-drops.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Move {
    pub rot: usize,
    pub col: i32,
}

/// Direct-mapped table of position signatures already expanded during the
/// current search generation. A slot only counts while its age matches, so
/// resetting is a counter bump instead of a wipe; the table is cleared for
/// real when the 8-bit age wraps.
pub(super) struct TabuTable {
    slots: Vec<TabuSlot>,
    age: u8,
}

#[derive(Clone, Copy, Default)]
struct TabuSlot {
    sig: u64,
    age: u8,
}

impl TabuTable {
    pub(super) fn new() -> TabuTable {
        TabuTable {
            slots: vec![TabuSlot::default(); TABU_SIZE],
            age: 0,
        }
    }

    /// Starts a new search generation.
    fn next_age(&mut self) {
        self.age = self.age.wrapping_add(1);
        if self.age == 0 {
            self.slots.fill(TabuSlot::default());
            self.age = 1;
        }
    }

    /// True when the signature was already seen this generation; marks it
    /// seen otherwise. Collisions evict, as in any direct-mapped cache.
    fn seen_or_mark(&mut self, sig: u64) -> bool {
        let slot = &mut self.slots[sig as usize & (TABU_SIZE - 1)];
        if slot.age == self.age && slot.sig == sig {
            return true;
        }
        *slot = TabuSlot {
            sig,
            age: self.age,
        };
        false
    }

    pub(super) fn clear(&mut self) {
        self.slots.fill(TabuSlot::default());
        self.age = 0;
    }
}

impl Agent {
    /// Evaluates every (rotation, column) placement of the block and returns
    /// the best, or None when nothing fits. The grid is mutated in place per
    /// candidate and restored before returning; clears are tried on a
    /// scratch copy so the undo stays a plain `remove`.
    pub fn find_best(
        &mut self,
        grid: &mut Grid,
        block: &Block<'_>,
        stream: &mut ShapeStream<'_>,
    ) -> Option<Move> {
        self.ensure_scratch(grid);
        self.tabu.next_age();

        let shape = block.shape;
        let spawn_y = grid.height() as i32 - shape.max_dim_len;
        // with this much headroom over the stack, no spawn-height placement
        // can collide, and the per-candidate check is skipped
        let elevated_safe = spawn_y > grid.max_relief();

        let mut scratch = std::mem::take(&mut self.scratch);
        let (clear_target, deeper) = scratch.split_first_mut().unwrap();

        let mut best: Option<(f64, Move)> = None;
        for rot in 0..shape.n_rot {
            let wh = shape.rot_wh(rot);
            for col in 0..=(grid.width() as i32 - wh.x) {
                let mut probe = Block::at(shape, rot, Coord::new(col, spawn_y));
                if !elevated_safe && grid.collides(&probe) {
                    continue;
                }
                grid.drop(&mut probe);
                grid.add(&probe);

                let cleared = grid.full_row_count() as u32;
                let target: &Grid = if cleared > 0 {
                    clear_target.copy_from(grid);
                    clear_target.clear_lines();
                    clear_target
                } else {
                    grid
                };
                let base = match deeper.first_mut() {
                    Some(ply_scratch) if SEARCH_DEPTH > 1 => {
                        self.next_ply(target, ply_scratch, stream, 1)
                    }
                    _ => self.evaluate(target),
                };
                let score = base + cleared as f64 * LINE_CLEAR_BONUS;

                grid.remove(&probe);

                if best.is_none_or(|(top, _)| score > top) {
                    best = Some((score, Move { rot, col }));
                }
            }
        }

        self.scratch = scratch;
        best.map(|(_, mv)| mv)
    }

    /// Scores a position one ply deeper: the best placement of the next
    /// previewed piece, each candidate tried on the scratch playfield. Falls
    /// back to a direct evaluation when the position was already expanded
    /// this generation, when the preview runs out, or when nothing fits.
    fn next_ply(
        &mut self,
        grid: &Grid,
        scratch: &mut Grid,
        stream: &mut ShapeStream<'_>,
        index: usize,
    ) -> f64 {
        if self.tabu.seen_or_mark(grid.signature()) {
            return self.evaluate(grid);
        }
        let Some(shape) = stream.peek(index) else {
            return self.evaluate(grid);
        };

        let spawn_y = grid.height() as i32 - shape.max_dim_len;
        let elevated_safe = spawn_y > grid.max_relief();

        let mut best = f64::NEG_INFINITY;
        for rot in 0..shape.n_rot {
            let wh = shape.rot_wh(rot);
            for col in 0..=(grid.width() as i32 - wh.x) {
                let mut probe = Block::at(shape, rot, Coord::new(col, spawn_y));
                if !elevated_safe && grid.collides(&probe) {
                    continue;
                }
                scratch.copy_from(grid);
                scratch.drop(&mut probe);
                scratch.add(&probe);
                let cleared = scratch.clear_lines();
                let score = self.evaluate(scratch) + cleared as f64 * LINE_CLEAR_BONUS;
                best = best.max(score);
            }
        }

        if best.is_finite() {
            best
        } else {
            self.evaluate(grid)
        }
    }
}
