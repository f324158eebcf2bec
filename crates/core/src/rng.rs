//! RNG module - 7-bag random piece generation
//!
//! Implements the "7-bag" randomization algorithm: each bag contains one of each
//! piece, shuffled with Fisher-Yates, and is drawn until empty before the next bag
//! is generated.
//!
//! A small LCG drives the shuffle so every run is reproducible from its seed.

use crate::types::{PieceKind, QUEUE_PREVIEW};

/// Simple LCG (Linear Congruential Generator) RNG
/// Uses constants from Numerical Recipes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimpleRng {
    state: u32,
}

impl SimpleRng {
    /// Create a new RNG with the given seed
    pub fn new(seed: u32) -> Self {
        // Avoid 0 seed which would produce all zeros
        let state = if seed == 0 { 1 } else { seed };
        Self { state }
    }

    /// Generate next random u32
    pub fn next_u32(&mut self) -> u32 {
        // LCG formula: (a * state + c) mod m
        self.state = self.state.wrapping_mul(1664525).wrapping_add(1013904223);
        self.state
    }

    /// Generate random value in range [0, max)
    pub fn next_range(&mut self, max: u32) -> u32 {
        if max == 0 {
            return 0;
        }
        // High bits of an LCG are far better distributed than the low ones.
        (self.next_u32() >> 8) % max
    }

    /// Shuffle a slice using Fisher-Yates
    pub fn shuffle<T>(&mut self, slice: &mut [T]) {
        for i in (1..slice.len()).rev() {
            let j = self.next_range((i + 1) as u32) as usize;
            slice.swap(i, j);
        }
    }

    /// Current internal state, usable as the seed of a follow-up run
    pub fn state(&self) -> u32 {
        self.state
    }
}

/// 7-bag piece generator
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Randomizer {
    bag: [PieceKind; 7],
    /// Pieces left in the current bag; drawn from the end
    remaining: usize,
    rng: SimpleRng,
}

impl Randomizer {
    pub fn new(seed: u32) -> Self {
        Self {
            bag: PieceKind::ALL,
            remaining: 0,
            rng: SimpleRng::new(seed),
        }
    }

    /// Pop the next piece, refilling and reshuffling when the bag is empty
    pub fn next(&mut self) -> PieceKind {
        if self.remaining == 0 {
            self.bag = PieceKind::ALL;
            self.rng.shuffle(&mut self.bag);
            self.remaining = self.bag.len();
        }
        self.remaining -= 1;
        self.bag[self.remaining]
    }

    /// Pieces left before the next refill
    pub fn remaining_in_bag(&self) -> usize {
        self.remaining
    }

    pub fn rng_state(&self) -> u32 {
        self.rng.state()
    }
}

/// Upcoming pieces with a fixed-depth preview
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PieceQueue {
    preview: [PieceKind; QUEUE_PREVIEW],
    randomizer: Randomizer,
}

impl PieceQueue {
    /// Create a new piece queue with the given seed
    pub fn new(seed: u32) -> Self {
        let mut randomizer = Randomizer::new(seed);
        let mut preview = [PieceKind::I; QUEUE_PREVIEW];
        for slot in &mut preview {
            *slot = randomizer.next();
        }
        Self {
            preview,
            randomizer,
        }
    }

    /// Peek at the next piece without removing it
    pub fn peek(&self) -> PieceKind {
        self.preview[0]
    }

    /// The full preview, next piece first
    pub fn preview(&self) -> &[PieceKind; QUEUE_PREVIEW] {
        &self.preview
    }

    /// Draw the next piece; the preview stays full
    pub fn draw(&mut self) -> PieceKind {
        let piece = self.preview[0];
        self.preview.rotate_left(1);
        self.preview[QUEUE_PREVIEW - 1] = self.randomizer.next();
        piece
    }

    /// Get the current RNG state (for restarting with a fresh but reproducible sequence)
    pub fn seed(&self) -> u32 {
        self.randomizer.rng_state()
    }
}

impl Default for PieceQueue {
    fn default() -> Self {
        Self::new(1)
    }
}
