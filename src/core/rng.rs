//! Deterministic random number generation.
//!
//! Every source of randomness in a game (role assignment, deck shuffles,
//! random agents, replay sampling) derives from one `u64` seed, so a game can
//! be replayed exactly.
//!
//! ```
//! use secret_hitler_rl::core::GameRng;
//!
//! let table = GameRng::new(42);
//!
//! // Independent streams for independent concerns
//! let mut roles = table.for_context("roles");
//! let mut deck = table.for_context("deck");
//! assert_ne!(roles.gen_range_usize(0..1000), deck.gen_range_usize(0..1000));
//! ```

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::hash::{Hash, Hasher};

/// Deterministic RNG backed by ChaCha8.
#[derive(Clone, Debug)]
pub struct GameRng {
    inner: ChaCha8Rng,
    seed: u64,
    fork_counter: u64,
}

impl GameRng {
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            inner: ChaCha8Rng::seed_from_u64(seed),
            seed,
            fork_counter: 0,
        }
    }

    /// The seed this stream was created from.
    #[must_use]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Fork an independent branch.
    ///
    /// Each fork produces a different but deterministic sequence. Used to
    /// hand every random agent at a table its own stream.
    #[must_use]
    pub fn fork(&mut self) -> Self {
        self.fork_counter += 1;
        let fork_seed = self.seed.wrapping_add(self.fork_counter.wrapping_mul(0x9E3779B97F4A7C15));
        Self::new(fork_seed)
    }

    /// Create an independent stream for a named context.
    ///
    /// The same context always yields the same stream for the same seed.
    #[must_use]
    pub fn for_context(&self, context: &str) -> Self {
        use std::collections::hash_map::DefaultHasher;

        let mut hasher = DefaultHasher::new();
        self.seed.hash(&mut hasher);
        context.hash(&mut hasher);
        Self::new(hasher.finish())
    }

    pub fn gen_range_usize(&mut self, range: std::ops::Range<usize>) -> usize {
        self.inner.gen_range(range)
    }

    pub fn gen_bool(&mut self, probability: f64) -> bool {
        self.inner.gen_bool(probability)
    }

    pub fn shuffle<T>(&mut self, slice: &mut [T]) {
        use rand::seq::SliceRandom;
        slice.shuffle(&mut self.inner);
    }

    #[must_use]
    pub fn choose<'a, T>(&mut self, slice: &'a [T]) -> Option<&'a T> {
        use rand::seq::SliceRandom;
        slice.choose(&mut self.inner)
    }

    /// Sample an index with probability proportional to `weights`.
    ///
    /// Negative and non-finite weights count as zero. Returns `None` if
    /// nothing has positive weight.
    pub fn choose_weighted(&mut self, weights: &[f32]) -> Option<usize> {
        let clean = |w: f32| if w.is_finite() && w > 0.0 { w } else { 0.0 };
        let total: f32 = weights.iter().map(|&w| clean(w)).sum();
        if total <= 0.0 {
            return None;
        }

        let mut threshold = self.inner.gen::<f32>() * total;
        let mut last_positive = None;

        for (i, &weight) in weights.iter().enumerate() {
            let weight = clean(weight);
            if weight > 0.0 {
                last_positive = Some(i);
            }
            threshold -= weight;
            if weight > 0.0 && threshold <= 0.0 {
                return Some(i);
            }
        }

        // Rounding can leave a sliver of threshold
        last_positive
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_determinism() {
        let mut rng1 = GameRng::new(42);
        let mut rng2 = GameRng::new(42);

        for _ in 0..100 {
            assert_eq!(rng1.gen_range_usize(0..1000), rng2.gen_range_usize(0..1000));
        }
    }

    #[test]
    fn test_fork_is_deterministic_and_distinct() {
        let mut rng1 = GameRng::new(42);
        let mut rng2 = GameRng::new(42);

        let mut a = rng1.fork();
        let mut b = rng2.fork();
        let mut c = rng1.fork();

        assert_eq!(a.seed(), b.seed());
        assert_ne!(a.seed(), c.seed());

        let seq_a: Vec<_> = (0..10).map(|_| a.gen_range_usize(0..1000)).collect();
        let seq_b: Vec<_> = (0..10).map(|_| b.gen_range_usize(0..1000)).collect();
        let seq_c: Vec<_> = (0..10).map(|_| c.gen_range_usize(0..1000)).collect();
        assert_eq!(seq_a, seq_b);
        assert_ne!(seq_a, seq_c);
    }

    #[test]
    fn test_context_streams() {
        let rng = GameRng::new(7);
        let mut roles1 = rng.for_context("roles");
        let mut roles2 = rng.for_context("roles");
        let mut deck = rng.for_context("deck");

        let r1: Vec<_> = (0..10).map(|_| roles1.gen_range_usize(0..1000)).collect();
        let r2: Vec<_> = (0..10).map(|_| roles2.gen_range_usize(0..1000)).collect();
        let d: Vec<_> = (0..10).map(|_| deck.gen_range_usize(0..1000)).collect();

        assert_eq!(r1, r2);
        assert_ne!(r1, d);
    }

    #[test]
    fn test_shuffle_keeps_elements() {
        let mut rng = GameRng::new(42);
        let mut data: Vec<u32> = (1..=17).collect();
        rng.shuffle(&mut data);

        assert_ne!(data, (1..=17).collect::<Vec<_>>());
        data.sort_unstable();
        assert_eq!(data, (1..=17).collect::<Vec<_>>());
    }

    #[test]
    fn test_choose() {
        let mut rng = GameRng::new(42);
        let items = [3, 5, 8];
        assert!(items.contains(rng.choose(&items).unwrap()));

        let empty: [i32; 0] = [];
        assert!(rng.choose(&empty).is_none());
    }

    #[test]
    fn test_choose_weighted() {
        let mut rng = GameRng::new(42);

        for _ in 0..20 {
            assert_eq!(rng.choose_weighted(&[0.0, 5.0, 0.0]), Some(1));
        }

        assert_eq!(rng.choose_weighted(&[]), None);
        assert_eq!(rng.choose_weighted(&[0.0, 0.0]), None);
        assert_eq!(rng.choose_weighted(&[f32::NAN, -1.0]), None);
        assert_eq!(rng.choose_weighted(&[f32::NAN, 2.0]), Some(1));
    }
}
