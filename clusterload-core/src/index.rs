//! Sources of random indices for identifier selection

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Picks the index of the next identifier.
///
/// Implementations are only ever called with `len > 0`.
pub trait IndexSource: Send {
    fn next_index(&mut self, len: usize) -> usize;
}

/// Uniform selection with replacement
#[derive(Debug, Clone)]
pub struct RandomIndex {
    rng: StdRng,
}

impl RandomIndex {
    /// Seed from the operating system
    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_os_rng(),
        }
    }

    /// Reproducible selection sequence
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for RandomIndex {
    fn default() -> Self {
        Self::from_entropy()
    }
}

impl IndexSource for RandomIndex {
    fn next_index(&mut self, len: usize) -> usize {
        self.rng.random_range(0..len)
    }
}

impl<T: IndexSource + ?Sized> IndexSource for Box<T> {
    fn next_index(&mut self, len: usize) -> usize {
        (**self).next_index(len)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_indices_stay_in_range() {
        let mut source = RandomIndex::seeded(7);
        for len in 1..50 {
            for _ in 0..20 {
                assert!(source.next_index(len) < len);
            }
        }
    }

    #[test]
    fn test_same_seed_same_sequence() {
        let mut a = RandomIndex::seeded(1234);
        let mut b = RandomIndex::seeded(1234);
        let seq_a: Vec<usize> = (0..100).map(|_| a.next_index(12)).collect();
        let seq_b: Vec<usize> = (0..100).map(|_| b.next_index(12)).collect();
        assert_eq!(seq_a, seq_b);
    }

    #[test]
    fn test_single_element_always_zero() {
        let mut source = RandomIndex::from_entropy();
        for _ in 0..10 {
            assert_eq!(source.next_index(1), 0);
        }
    }
}
