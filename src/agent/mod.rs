mod evaluator;
mod search;

pub use evaluator::{score_position, Features, Weights, LINE_CLEAR_BONUS};
pub use search::Move;

use crate::tetris::prelude::*;
use evaluator::EvalCache;
use search::TabuTable;

/// The placement agent. Owns the evaluation cache, the tabu table, and the
/// scratch playfields the search reuses across invocations; constructing a
/// fresh agent yields fully independent state, so tests cannot leak results
/// into one another.
pub struct Agent {
    weights: Weights,
    eval_cache: EvalCache,
    tabu: TabuTable,
    scratch: Vec<Grid>,
}

impl Agent {
    pub fn new(weights: Weights) -> Agent {
        Agent {
            weights,
            eval_cache: EvalCache::new(),
            tabu: TabuTable::new(),
            scratch: Vec::new(),
        }
    }

    pub fn weights(&self) -> &Weights {
        &self.weights
    }

    /// (hits, lookups) of the evaluation cache.
    pub fn cache_stats(&self) -> (u64, u64) {
        self.eval_cache.stats()
    }

    /// Drops all cached search state; the next decision starts cold.
    pub fn clear_caches(&mut self) {
        self.eval_cache.clear();
        self.tabu.clear();
    }

    /// One scratch playfield per ply, allocated on first use and kept
    /// across searches while the dimensions hold still.
    pub(crate) fn ensure_scratch(&mut self, grid: &Grid) {
        let stale = self.scratch.len() != SEARCH_DEPTH
            || self
                .scratch
                .first()
                .is_some_and(|s| s.width() != grid.width() || s.height() != grid.height());
        if stale {
            self.scratch = vec![grid.clone(); SEARCH_DEPTH];
        }
    }
}

impl Default for Agent {
    fn default() -> Self {
        Agent::new(Weights::default())
    }
}
