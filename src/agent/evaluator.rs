use super::Agent;
use crate::tetris::prelude::*;

pub const HOLE_PENALTY: f64 = 1.5;
pub const BUMP_PENALTY: f64 = 0.20;
pub const WELL_PENALTY: f64 = 0.35;
pub const LINE_CLEAR_BONUS: f64 = 0.75;

/// Weights over the six skyline features. Positive favours the feature.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Weights {
    pub relief_max: f64,
    pub relief_avg: f64,
    pub relief_var: f64,
    pub gaps: f64,
    pub obs: f64,
    pub discont: f64,
}

impl Default for Weights {
    fn default() -> Self {
        Weights {
            relief_max: 0.23,
            relief_avg: -3.62,
            relief_var: -0.21,
            gaps: -0.89,
            obs: -0.96,
            discont: -0.27,
        }
    }
}

/// The skyline features, all computable in one O(W) pass over the
/// per-column indices.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Features {
    pub relief_max: f64,
    pub relief_avg: f64,
    pub relief_var: f64,
    pub gaps: f64,
    pub obs: f64,
    pub discont: f64,
}

impl Features {
    pub fn extract(grid: &Grid) -> Features {
        let w = grid.width();

        let mut relief_max = -1i32;
        let mut height_sum = 0i32;
        let mut gaps = 0i32;
        let mut obs = 0i32;
        // seeded at -1; the first differing pair brings it to zero
        let mut discont = -1i32;

        for x in 0..w {
            let relief = grid.relief(x);
            relief_max = relief_max.max(relief);
            height_sum += relief + 1;
            gaps += grid.gaps(x);
            obs += relief - grid.gaps(x);
            if x + 1 < w && relief != grid.relief(x + 1) {
                discont += 1;
            }
        }

        let relief_avg = height_sum as f64 / w as f64;
        let relief_var = (0..w)
            .map(|x| (relief_avg - grid.relief(x) as f64).powi(2))
            .sum();

        Features {
            relief_max: relief_max as f64,
            relief_avg,
            relief_var,
            gaps: gaps as f64,
            obs: obs as f64,
            discont: discont as f64,
        }
    }

    fn dot(&self, weights: &Weights) -> f64 {
        self.relief_max * weights.relief_max
            + self.relief_avg * weights.relief_avg
            + self.relief_var * weights.relief_var
            + self.gaps * weights.gaps
            + self.obs * weights.obs
            + self.discont * weights.discont
    }
}

/// Scores a playfield: weighted features minus the hole, bumpiness, and
/// well-depth penalties. Higher is better.
pub fn score_position(grid: &Grid, weights: &Weights) -> f64 {
    let w = grid.width();
    let h = grid.height() as i32;

    let mut holes = 0i32;
    let mut bumpiness = 0i32;
    let mut well_depth = 0i32;
    for x in 0..w {
        let height = grid.relief(x) + 1;
        holes += grid.gaps(x);
        let left = match x {
            0 => h,
            _ => grid.relief(x - 1) + 1,
        };
        let right = match x {
            _ if x == w - 1 => h,
            _ => grid.relief(x + 1) + 1,
        };
        if x + 1 < w {
            bumpiness += (height - right).abs();
        }
        if height < left && height < right {
            well_depth += left.min(right) - height;
        }
    }

    Features::extract(grid).dot(weights)
        - HOLE_PENALTY * holes as f64
        - BUMP_PENALTY * bumpiness as f64
        - WELL_PENALTY * well_depth as f64
}

/// Column-profile key for the evaluation cache: FNV-1a over the column
/// heights, mixed with the hole count. Positions with equal skylines and
/// hole totals intentionally share a key.
pub(super) fn profile_key(grid: &Grid) -> u64 {
    const FNV_OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
    const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

    let mut key = FNV_OFFSET;
    for x in 0..grid.width() {
        key = (key ^ (grid.relief(x) + 1) as u64).wrapping_mul(FNV_PRIME);
    }
    (key ^ grid.total_gaps() as u64).wrapping_mul(FNV_PRIME)
}

/// Direct-mapped score cache over profile keys; the last writer wins on a
/// slot collision. Purely an approximation layer.
pub(super) struct EvalCache {
    slots: Vec<Slot>,
    hits: u64,
    lookups: u64,
}

#[derive(Clone, Copy, Default)]
struct Slot {
    key: u64,
    score: f64,
    live: bool,
}

impl EvalCache {
    pub(super) fn new() -> EvalCache {
        EvalCache {
            slots: vec![Slot::default(); HASH_SIZE],
            hits: 0,
            lookups: 0,
        }
    }

    pub(super) fn lookup(&mut self, key: u64) -> Option<f64> {
        self.lookups += 1;
        let slot = &self.slots[key as usize & (HASH_SIZE - 1)];
        if slot.live && slot.key == key {
            self.hits += 1;
            Some(slot.score)
        } else {
            None
        }
    }

    pub(super) fn insert(&mut self, key: u64, score: f64) {
        self.slots[key as usize & (HASH_SIZE - 1)] = Slot {
            key,
            score,
            live: true,
        };
    }

    pub(super) fn stats(&self) -> (u64, u64) {
        (self.hits, self.lookups)
    }

    pub(super) fn clear(&mut self) {
        self.slots.fill(Slot::default());
        self.hits = 0;
        self.lookups = 0;
    }
}

impl Agent {
    /// Cached evaluation of a playfield under this agent's weights.
    pub(super) fn evaluate(&mut self, grid: &Grid) -> f64 {
        let key = profile_key(grid);
        if let Some(score) = self.eval_cache.lookup(key) {
            return score;
        }
        let score = score_position(grid, &self.weights);
        self.eval_cache.insert(key, score);
        score
    }
}
