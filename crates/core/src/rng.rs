//! RNG module - 7-bag piece sequencing
//!
//! Implements the "7-bag" randomization used in modern falling-block games.
//! Each bag is a uniformly shuffled permutation of all seven kinds; a fresh bag
//! is appended whenever fewer than seven kinds remain pending.
//!
//! The random source is injected as any [`rand::RngCore`], so tests and
//! replays of a given seed are reproducible.

use std::collections::VecDeque;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{RngCore, SeedableRng};

use crate::types::{PieceKind, BAG_SIZE};

/// Shuffle one full bag with the given random source.
pub fn shuffled_bag<R: RngCore + ?Sized>(rng: &mut R) -> [PieceKind; BAG_SIZE] {
    let mut bag = PieceKind::ALL;
    bag.shuffle(rng);
    bag
}

/// 7-bag piece queue with one held "on deck" kind for the preview
#[derive(Debug, Clone)]
pub struct PieceQueue<R = StdRng> {
    /// Kinds after the on-deck one, in draw order
    pending: VecDeque<PieceKind>,
    /// Next kind to become active (shown in the preview)
    on_deck: PieceKind,
    rng: R,
}

impl PieceQueue<StdRng> {
    /// Create a queue whose bag order is fully determined by `seed`.
    pub fn from_seed(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }
}

impl<R: RngCore> PieceQueue<R> {
    /// Create a new queue with one freshly shuffled bag.
    pub fn new(rng: R) -> Self {
        let mut queue = Self {
            pending: VecDeque::with_capacity(BAG_SIZE * 2),
            on_deck: PieceKind::I,
            rng,
        };
        queue.reset();
        queue
    }

    /// Discard everything pending and start over from a fresh bag.
    ///
    /// The random source carries on, so a reset does not replay the previous
    /// sequence.
    pub fn reset(&mut self) {
        self.pending.clear();
        self.refill_bag();
        self.on_deck = self.pop();
    }

    /// Append one shuffled bag to the pending kinds.
    fn refill_bag(&mut self) {
        let bag = shuffled_bag(&mut self.rng);
        self.pending.extend(bag);
    }

    fn pop(&mut self) -> PieceKind {
        loop {
            if let Some(kind) = self.pending.pop_front() {
                return kind;
            }
            self.refill_bag();
        }
    }

    /// Take the on-deck kind and pull the next one up behind it.
    ///
    /// Tops the queue up with a new bag first when fewer than seven kinds are
    /// pending.
    pub fn advance(&mut self) -> PieceKind {
        if self.pending.len() < BAG_SIZE {
            self.refill_bag();
        }
        let next = self.pop();
        std::mem::replace(&mut self.on_deck, next)
    }

    /// The kind the next [`advance`](Self::advance) will return.
    pub fn peek(&self) -> PieceKind {
        self.on_deck
    }

    /// Kinds queued behind the on-deck one.
    pub fn pending(&self) -> impl Iterator<Item = PieceKind> + '_ {
        self.pending.iter().copied()
    }

    /// Number of kinds queued behind the on-deck one.
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_is_permutation(window: &[PieceKind]) {
        assert_eq!(window.len(), BAG_SIZE);
        for kind in PieceKind::ALL {
            assert_eq!(
                window.iter().filter(|&&k| k == kind).count(),
                1,
                "{:?} missing or repeated in {:?}",
                kind,
                window
            );
        }
    }

    #[test]
    fn test_shuffled_bag_is_permutation() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..50 {
            assert_is_permutation(&shuffled_bag(&mut rng));
        }
    }

    #[test]
    fn test_same_seed_same_sequence() {
        let mut a = PieceQueue::from_seed(12345);
        let mut b = PieceQueue::from_seed(12345);
        for _ in 0..100 {
            assert_eq!(a.advance(), b.advance());
        }
    }

    #[test]
    fn test_consecutive_bags_are_each_complete() {
        let mut queue = PieceQueue::from_seed(99);
        let drawn: Vec<PieceKind> = (0..BAG_SIZE * 10).map(|_| queue.advance()).collect();
        for bag in drawn.chunks(BAG_SIZE) {
            assert_is_permutation(bag);
        }
    }

    #[test]
    fn test_peek_matches_advance() {
        let mut queue = PieceQueue::from_seed(1);
        for _ in 0..30 {
            let peeked = queue.peek();
            assert_eq!(queue.advance(), peeked);
        }
    }

    #[test]
    fn test_never_drops_below_a_bag_after_advance() {
        let mut queue = PieceQueue::from_seed(3);
        assert_eq!(queue.len(), BAG_SIZE - 1);
        for _ in 0..40 {
            queue.advance();
            assert!(queue.len() >= BAG_SIZE - 1);
            assert!(queue.len() < BAG_SIZE * 2);
        }
    }

    #[test]
    fn test_reset_starts_a_fresh_bag() {
        let mut queue = PieceQueue::from_seed(5);
        for _ in 0..3 {
            queue.advance();
        }
        queue.reset();
        let mut window = vec![queue.peek()];
        window.extend(queue.pending());
        assert_is_permutation(&window);
    }
}
