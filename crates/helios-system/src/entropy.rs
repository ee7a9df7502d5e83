//! Uniform random draws behind a small trait, so layout generation can run against a
//! seeded RNG in production and a scripted oracle in tests.

use helios_config::{FloatRange, IntRange};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::error::LayoutError;

/// Source of uniform random draws.
pub trait Entropy {
    /// Uniform float in `[min, max]`.
    fn uniform(&mut self, min: f64, max: f64) -> f64;

    /// Uniform integer in `[min, max]`, both ends inclusive. Callers guarantee `min <= max`.
    fn randint(&mut self, min: i64, max: i64) -> i64;

    /// Uniform index in `[0, len)`. Callers guarantee `len > 0`.
    fn index(&mut self, len: usize) -> usize;

    fn int_in(&mut self, range: IntRange) -> i64 {
        self.randint(range.min, range.max)
    }

    fn float_in(&mut self, range: FloatRange) -> f64 {
        self.uniform(range.min, range.max)
    }

    /// Random element of `items`, or `None` if it is empty.
    fn choice<'a, T>(&mut self, items: &'a [T]) -> Option<&'a T>
    where
        Self: Sized,
    {
        if items.is_empty() {
            None
        } else {
            Some(&items[self.index(items.len())])
        }
    }
}

/// Draw from `[min, max]` until the value is nonzero.
pub fn draw_nonzero(
    entropy: &mut impl Entropy,
    name: &'static str,
    min: i64,
    max: i64,
) -> Result<i64, LayoutError> {
    if min > max {
        return Err(LayoutError::InvertedRange { name, min, max });
    }
    if min == 0 && max == 0 {
        return Err(LayoutError::OnlyZero { name });
    }
    loop {
        let value = entropy.randint(min, max);
        if value != 0 {
            return Ok(value);
        }
    }
}

/// Draw from `items` until the value differs from `previous`.
pub fn choose_distinct<T: PartialEq + Copy + std::fmt::Debug>(
    entropy: &mut impl Entropy,
    items: &[T],
    previous: T,
) -> Result<T, LayoutError> {
    if !items.iter().any(|item| *item != previous) {
        return Err(LayoutError::NoDistinctColor(format!("{previous:?}")));
    }
    loop {
        let candidate = items[entropy.index(items.len())];
        if candidate != previous {
            return Ok(candidate);
        }
    }
}

/// ChaCha-backed entropy. Deterministic for a given seed.
pub struct SeededEntropy {
    seed: u64,
    rng: ChaCha8Rng,
}

impl SeededEntropy {
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Seed from the thread-local OS-seeded generator.
    pub fn from_os() -> Self {
        Self::new(rand::random())
    }

    /// Seed this entropy was created with; logged so a run can be reproduced.
    pub fn seed(&self) -> u64 {
        self.seed
    }
}

impl Entropy for SeededEntropy {
    fn uniform(&mut self, min: f64, max: f64) -> f64 {
        min + (max - min) * self.rng.random::<f64>()
    }

    fn randint(&mut self, min: i64, max: i64) -> i64 {
        self.rng.random_range(min..=max)
    }

    fn index(&mut self, len: usize) -> usize {
        self.rng.random_range(0..len)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Replays a fixed sequence of integer draws, cycling when exhausted.
    struct Scripted {
        values: Vec<i64>,
        cursor: usize,
    }

    impl Entropy for Scripted {
        fn uniform(&mut self, min: f64, _max: f64) -> f64 {
            min
        }

        fn randint(&mut self, _min: i64, _max: i64) -> i64 {
            let value = self.values[self.cursor % self.values.len()];
            self.cursor += 1;
            value
        }

        fn index(&mut self, len: usize) -> usize {
            self.randint(0, 0) as usize % len
        }
    }

    #[test]
    fn test_same_seed_same_sequence() {
        let mut a = SeededEntropy::new(99);
        let mut b = SeededEntropy::new(99);
        for _ in 0..100 {
            assert_eq!(a.randint(-15, 15), b.randint(-15, 15));
            assert_eq!(a.uniform(0.02, 0.1), b.uniform(0.02, 0.1));
        }
    }

    #[test]
    fn test_draws_stay_in_range() {
        let mut entropy = SeededEntropy::new(7);
        for _ in 0..1000 {
            let i = entropy.randint(5, 15);
            assert!((5..=15).contains(&i));
            let f = entropy.uniform(-0.4, -0.1);
            assert!((-0.4..=-0.1).contains(&f));
        }
    }

    #[test]
    fn test_randint_is_inclusive() {
        let mut entropy = SeededEntropy::new(3);
        let hits = (0..2000).filter(|_| entropy.randint(1, 3) == 3).count();
        assert!(hits > 0, "upper bound never drawn");
    }

    #[test]
    fn test_draw_nonzero_skips_zero() {
        let mut entropy = Scripted {
            values: vec![0, 0, 4],
            cursor: 0,
        };
        assert_eq!(draw_nonzero(&mut entropy, "speed", -15, 15).unwrap(), 4);
        assert_eq!(entropy.cursor, 3);
    }

    #[test]
    fn test_draw_nonzero_rejects_zero_only_range() {
        let mut entropy = SeededEntropy::new(1);
        assert!(matches!(
            draw_nonzero(&mut entropy, "speed", 0, 0),
            Err(LayoutError::OnlyZero { .. })
        ));
    }

    #[test]
    fn test_choose_distinct_redraws() {
        let mut entropy = Scripted {
            values: vec![0, 0, 1],
            cursor: 0,
        };
        let picked = choose_distinct(&mut entropy, &[10, 20], 10).unwrap();
        assert_eq!(picked, 20);
    }

    #[test]
    fn test_choose_distinct_impossible() {
        let mut entropy = SeededEntropy::new(1);
        assert!(choose_distinct(&mut entropy, &[10, 10], 10).is_err());
    }

    #[test]
    fn test_choice_empty() {
        let mut entropy = SeededEntropy::new(1);
        let empty: [u8; 0] = [];
        assert!(entropy.choice(&empty).is_none());
    }
}
