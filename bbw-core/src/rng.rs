//! Seeded random source
//!
//! Every random draw in a simulation goes through one `SeededRng`. Two
//! instances built from the same seed produce identical streams for every
//! call type, which is what makes a game reproducible from its seed.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Deterministic random number source
#[derive(Clone, Debug)]
pub struct SeededRng {
    seed: u64,
    inner: ChaCha8Rng,
}

impl SeededRng {
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            inner: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Seed the stream was last (re)initialized with
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Restart the stream from a new seed
    pub fn reset(&mut self, seed: u64) {
        self.seed = seed;
        self.inner = ChaCha8Rng::seed_from_u64(seed);
    }

    /// Uniform float in [0, 1)
    pub fn next_float(&mut self) -> f64 {
        self.inner.gen::<f64>()
    }

    /// Uniform integer in [min, max], both bounds inclusive.
    ///
    /// Reversed bounds are swapped, so the call is total.
    pub fn next_int(&mut self, min: i64, max: i64) -> i64 {
        let (lo, hi) = if min <= max { (min, max) } else { (max, min) };
        if lo == hi {
            return lo;
        }
        self.inner.gen_range(lo..=hi)
    }

    /// Uniform integer in [min, max). Returns `min` for an empty range.
    pub fn next_int_exclusive(&mut self, min: i64, max: i64) -> i64 {
        if max <= min {
            return min;
        }
        self.inner.gen_range(min..max)
    }

    /// Uniform index in [0, len). `len` must be non-zero.
    pub fn next_index(&mut self, len: usize) -> usize {
        self.next_int_exclusive(0, len as i64) as usize
    }

    /// Uniformly chosen element, `None` for an empty slice
    pub fn pick<'a, T>(&mut self, items: &'a [T]) -> Option<&'a T> {
        if items.is_empty() {
            return None;
        }
        let idx = self.next_index(items.len());
        items.get(idx)
    }

    /// Fisher-Yates shuffled copy; the input is left untouched
    pub fn shuffle<T: Clone>(&mut self, items: &[T]) -> Vec<T> {
        let mut out = items.to_vec();
        for i in (1..out.len()).rev() {
            let j = self.next_index(i + 1);
            out.swap(i, j);
        }
        out
    }

    /// Bernoulli draw with probability `p`.
    ///
    /// `p <= 0` is always false and `p >= 1` always true. A draw is
    /// consumed in every case so the stream position does not depend on `p`.
    pub fn chance(&mut self, p: f64) -> bool {
        let roll = self.next_float();
        if p <= 0.0 || p.is_nan() {
            false
        } else if p >= 1.0 {
            true
        } else {
            roll < p
        }
    }
}
