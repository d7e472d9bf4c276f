//! Deterministic workload generators for slotrow benchmarks.
//!
//! - [`random_values`]: seeded integers for append / sort workloads
//! - [`random_positions`]: insertion indices valid for a growing row
//! - [`WordFactory`]: seeded lower-case words for `String` workloads

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// `n` values in `0..max`, deterministic for a given seed.
pub fn random_values(seed: u64, n: usize, max: u64) -> Vec<u64> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    (0..n).map(|_| rng.random_range(0..max)).collect()
}

/// `count` insertion positions for a row that starts at `start_len`
/// values and grows by one per insertion: position `i` lies in
/// `0..=start_len + i`.
pub fn random_positions(seed: u64, count: usize, start_len: usize) -> Vec<usize> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    (0..count)
        .map(|i| rng.random_range(0..=start_len + i))
        .collect()
}

/// Produces lower-case ASCII words of length `1..=max_len`.
pub struct WordFactory {
    rng: ChaCha8Rng,
    max_len: usize,
}

impl WordFactory {
    /// Create a factory. `max_len` is raised to at least 1.
    pub fn new(seed: u64, max_len: usize) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            max_len: max_len.max(1),
        }
    }

    /// The next word.
    pub fn word(&mut self) -> String {
        let len = self.rng.random_range(1..=self.max_len);
        (0..len)
            .map(|_| char::from(b'a' + self.rng.random_range(0..26u8)))
            .collect()
    }

    /// The next `n` words.
    pub fn words(&mut self, n: usize) -> Vec<String> {
        (0..n).map(|_| self.word()).collect()
    }
}
