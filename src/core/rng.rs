//! Deterministic random source for puzzle generation.
//!
//! ## Key Features
//!
//! - **Deterministic**: Same seed produces identical puzzles
//! - **Entropy-seeded on demand**: Sessions without a configured seed
//!   draw one from the OS, and still report it for replay
//!
//! ```
//! use timed_rounds::core::PuzzleRng;
//!
//! let mut a = PuzzleRng::new(42);
//! let mut b = PuzzleRng::new(42);
//! assert_eq!(a.gen_range_inclusive(0..=180), b.gen_range_inclusive(0..=180));
//! ```

use std::ops::RangeInclusive;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Seeded RNG used by every puzzle generator.
///
/// Uses ChaCha8 for speed while keeping a reproducible stream per seed.
#[derive(Clone, Debug)]
pub struct PuzzleRng {
    inner: ChaCha8Rng,
    seed: u64,
}

impl PuzzleRng {
    /// Create a new RNG with the given seed.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            inner: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }

    /// Create an RNG with a seed drawn from the thread-local entropy source.
    #[must_use]
    pub fn from_entropy() -> Self {
        Self::new(rand::random())
    }

    /// Seed this stream was created from.
    #[must_use]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Uniform integer in an inclusive range.
    ///
    /// The range must be non-empty; configuration validation guarantees
    /// this for every range the generators use.
    pub fn gen_range_inclusive(&mut self, range: RangeInclusive<i32>) -> i32 {
        self.inner.gen_range(range)
    }

    /// Uniform index in `0..len`. Returns 0 for an empty range.
    pub fn gen_index(&mut self, len: usize) -> usize {
        if len == 0 {
            return 0;
        }
        self.inner.gen_range(0..len)
    }

    /// Random boolean with given probability of true.
    pub fn gen_bool(&mut self, probability: f64) -> bool {
        self.inner.gen_bool(probability)
    }

    /// Shuffle a slice in place.
    pub fn shuffle<T>(&mut self, slice: &mut [T]) {
        use rand::seq::SliceRandom;
        slice.shuffle(&mut self.inner);
    }

    /// Choose a random element from a slice.
    #[must_use]
    pub fn choose<'a, T>(&mut self, slice: &'a [T]) -> Option<&'a T> {
        use rand::seq::SliceRandom;
        slice.choose(&mut self.inner)
    }
}
