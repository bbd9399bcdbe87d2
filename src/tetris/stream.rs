use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::tetris::prelude::*;

/// The 7-bag randomizer: a shuffled permutation of the seven shape indices,
/// reshuffled only once exhausted. Any window of seven consecutive draws
/// therefore contains every shape exactly once.
#[derive(Clone, Debug)]
pub struct SevenBag {
    order: [usize; NUM_TETRIS_SHAPES],
    pos: usize,
    rng: StdRng,
}

impl SevenBag {
    /// A new bag; unseeded bags draw their state from the OS.
    pub fn new(seed: Option<u64>) -> SevenBag {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        SevenBag {
            order: std::array::from_fn(|i| i),
            pos: NUM_TETRIS_SHAPES,
            rng,
        }
    }

    /// Draws the next shape index from the bag.
    pub fn draw(&mut self) -> usize {
        if self.pos == NUM_TETRIS_SHAPES {
            self.shuffle();
        }
        let index = self.order[self.pos];
        self.pos += 1;
        index
    }

    /// Discards the rest of the current bag so the next draw reshuffles.
    pub fn reset(&mut self) {
        self.pos = NUM_TETRIS_SHAPES;
    }

    /// Fisher-Yates over the seven indices. `random_range` rejects rather
    /// than folding the modulus, so every permutation is equally likely.
    fn shuffle(&mut self) {
        for i in (1..NUM_TETRIS_SHAPES).rev() {
            let j = self.rng.random_range(0..=i);
            self.order.swap(i, j);
        }
        self.pos = 0;
    }
}

/// A lazy ring of upcoming shapes over the 7-bag. Slots materialize on first
/// peek, so peeking never advances the stream.
#[derive(Clone, Debug)]
pub struct ShapeStream<'a> {
    table: &'a ShapeTable,
    slots: [Option<&'a Shape>; SS_MAX_LEN],
    iter: usize,
    bag: SevenBag,
}

impl<'a> ShapeStream<'a> {
    pub fn new(table: &'a ShapeTable, seed: Option<u64>) -> ShapeStream<'a> {
        ShapeStream {
            table,
            slots: [None; SS_MAX_LEN],
            iter: 0,
            bag: SevenBag::new(seed),
        }
    }

    /// Looks ahead i pieces without consuming anything; None past the ring.
    pub fn peek(&mut self, i: usize) -> Option<&'a Shape> {
        if i >= SS_MAX_LEN {
            return None;
        }
        let slot = (self.iter + i) % SS_MAX_LEN;
        if self.slots[slot].is_none() {
            self.slots[slot] = Some(self.table.get(self.bag.draw()));
        }
        self.slots[slot]
    }

    /// Consumes and returns the next shape.
    pub fn pop(&mut self) -> &'a Shape {
        let slot = self.iter % SS_MAX_LEN;
        let shape = match self.slots[slot].take() {
            Some(shape) => shape,
            None => self.table.get(self.bag.draw()),
        };
        self.iter += 1;
        shape
    }

    /// Direct bag access, for tests that want a reshuffle boundary.
    pub fn bag_mut(&mut self) -> &mut SevenBag {
        &mut self.bag
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tetris::prelude::*;
    use itertools::Itertools;

    #[test]
    fn every_bag_is_a_permutation() {
        let table = ShapeTable::new();
        let mut stream = ShapeStream::new(&table, Some(11));
        for _ in 0..5 {
            let window: Vec<ShapeKind> = (0..NUM_TETRIS_SHAPES).map(|_| stream.pop().kind).collect();
            assert_eq!(window.iter().unique().count(), NUM_TETRIS_SHAPES);
        }
    }

    #[test]
    fn twenty_one_pops_are_three_of_each() {
        let table = ShapeTable::new();
        let mut stream = ShapeStream::new(&table, Some(7));
        stream.bag_mut().reset();
        let counts = (0..21).map(|_| stream.pop().kind).counts();
        assert_eq!(counts.len(), NUM_TETRIS_SHAPES);
        assert!(counts.values().all(|&n| n == 3));
    }

    #[test]
    fn peek_is_idempotent_and_does_not_advance() {
        let table = ShapeTable::new();
        let mut stream = ShapeStream::new(&table, Some(3));
        let first = stream.peek(0).map(|s| s.kind);
        let second = stream.peek(1).map(|s| s.kind);
        assert_eq!(stream.peek(0).map(|s| s.kind), first);
        assert_eq!(stream.peek(1).map(|s| s.kind), second);
        assert_eq!(stream.peek(SS_MAX_LEN), None);

        // popping shifts the lookahead window by one
        assert_eq!(Some(stream.pop().kind), first);
        assert_eq!(stream.peek(0).map(|s| s.kind), second);
    }

    #[test]
    fn seeded_streams_replay() {
        let table = ShapeTable::new();
        let mut lhs = ShapeStream::new(&table, Some(99));
        let mut rhs = ShapeStream::new(&table, Some(99));
        for _ in 0..50 {
            assert_eq!(lhs.pop().kind, rhs.pop().kind);
        }
    }
}
