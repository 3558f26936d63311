//! RNG module - 7-bag random piece generation
//!
//! Implements the "7-bag" randomization policy: each bag holds one of each
//! piece (I, O, T, S, Z, J, L) in shuffled order, and a new bag is only
//! shuffled once the current one is exhausted.
//!
//! Shuffling uses a seedable ChaCha stream so a seed pins down the whole
//! infinite sequence.

use arrayvec::ArrayVec;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::types::{PieceKind, MAX_PREVIEW, PIECE_KINDS};

/// 7-bag piece generator
#[derive(Debug, Clone)]
pub struct PieceQueue {
    /// Current bag of pieces
    bag: [PieceKind; 7],
    /// Index into current bag
    bag_index: usize,
    /// RNG for shuffling
    rng: ChaCha8Rng,
}

impl PieceQueue {
    /// Create a new piece queue with the given seed
    pub fn new(seed: u64) -> Self {
        Self::with_rng(ChaCha8Rng::seed_from_u64(seed))
    }

    /// Unseeded queue for non-reproducible play.
    pub fn from_entropy() -> Self {
        Self::with_rng(ChaCha8Rng::from_entropy())
    }

    fn with_rng(rng: ChaCha8Rng) -> Self {
        let mut queue = Self {
            bag: PIECE_KINDS,
            bag_index: 0,
            rng,
        };
        queue.refill_bag();
        queue
    }

    fn shuffled_bag(rng: &mut ChaCha8Rng) -> [PieceKind; 7] {
        let mut bag = PIECE_KINDS;
        bag.shuffle(rng);
        bag
    }

    /// Generate a new shuffled bag
    fn refill_bag(&mut self) {
        self.bag = Self::shuffled_bag(&mut self.rng);
        self.bag_index = 0;
    }

    /// Draw the next piece from the queue
    pub fn draw(&mut self) -> PieceKind {
        if self.bag_index >= self.bag.len() {
            self.refill_bag();
        }

        let piece = self.bag[self.bag_index];
        self.bag_index += 1;
        piece
    }

    /// Peek at the next piece without removing it
    pub fn peek(&self) -> PieceKind {
        self.peek_n(1)[0]
    }

    /// Peek at the next `n` pieces (clamped to `1..=MAX_PREVIEW`).
    ///
    /// Crossing into the next bag shuffles a clone of the RNG, so the preview
    /// matches what `draw()` will return and the queue itself is not touched.
    pub fn peek_n(&self, n: usize) -> ArrayVec<PieceKind, MAX_PREVIEW> {
        let n = n.clamp(1, MAX_PREVIEW);
        let mut out = ArrayVec::new();
        out.extend(self.bag[self.bag_index.min(self.bag.len())..].iter().copied().take(n));

        if out.len() < n {
            let mut preview_rng = self.rng.clone();
            let next_bag = Self::shuffled_bag(&mut preview_rng);
            let missing = n - out.len();
            out.extend(next_bag.iter().copied().take(missing));
        }

        out
    }

    /// Pieces left in the current bag.
    pub fn remaining_in_bag(&self) -> &[PieceKind] {
        &self.bag[self.bag_index.min(self.bag.len())..]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_seed_same_sequence() {
        let mut a = PieceQueue::new(12345);
        let mut b = PieceQueue::new(12345);

        for _ in 0..100 {
            assert_eq!(a.draw(), b.draw());
        }
    }

    #[test]
    fn test_different_seeds_diverge() {
        let mut a = PieceQueue::new(1);
        let mut b = PieceQueue::new(2);

        let seq_a: Vec<_> = (0..21).map(|_| a.draw()).collect();
        let seq_b: Vec<_> = (0..21).map(|_| b.draw()).collect();
        assert_ne!(seq_a, seq_b);
    }

    #[test]
    fn test_piece_queue_draws_all_seven() {
        let mut queue = PieceQueue::new(1);

        for _ in 0..5 {
            let mut drawn: Vec<_> = (0..7).map(|_| queue.draw()).collect();
            drawn.sort_by_key(|k| k.code());
            assert_eq!(drawn, PIECE_KINDS.to_vec());
        }
    }

    #[test]
    fn test_piece_queue_peek() {
        let mut queue = PieceQueue::new(1);

        let peeked = queue.peek();
        let drawn = queue.draw();

        assert_eq!(peeked, drawn);
    }

    #[test]
    fn test_peek_across_bag_boundary_matches_draws() {
        let mut queue = PieceQueue::new(99);
        for _ in 0..5 {
            queue.draw();
        }
        assert_eq!(queue.remaining_in_bag().len(), 2);

        let preview = queue.peek_n(MAX_PREVIEW);
        let drawn: Vec<_> = (0..MAX_PREVIEW).map(|_| queue.draw()).collect();
        assert_eq!(preview.as_slice(), drawn.as_slice());
    }

    #[test]
    fn test_peek_does_not_mutate() {
        let queue = PieceQueue::new(7);
        let before = queue.peek_n(7);
        let _ = queue.peek_n(3);
        assert_eq!(queue.peek_n(7), before);
    }

    #[test]
    fn test_peek_n_clamps() {
        let queue = PieceQueue::new(3);
        assert_eq!(queue.peek_n(0).len(), 1);
        assert_eq!(queue.peek_n(100).len(), MAX_PREVIEW);
    }
}
