//! Base/stress pool construction, rolling and counting.

use rand::Rng;

use crate::error::{DiceError, DiceResult};

/// Largest pool (base or stress) a single roll may ask for.
pub const MAX_POOL_SIZE: u32 = 30;

/// The face that scores a success.
pub const SUCCESS_FACE: u8 = 6;

/// The stress-die face that scores a trauma.
pub const TRAUMA_FACE: u8 = 1;

/// Roll a single six-sided die.
pub fn roll_d6<R: Rng + ?Sized>(rng: &mut R) -> u8 {
    rng.random_range(1..=6)
}

/// Number of sixes across both pools.
pub fn count_successes(base: &[u8], stress: &[u8]) -> u32 {
    base.iter()
        .chain(stress.iter())
        .filter(|&&face| face == SUCCESS_FACE)
        .count() as u32
}

/// Number of ones in the stress pool. Base dice never cause trauma.
pub fn count_traumas(stress: &[u8]) -> u32 {
    stress.iter().filter(|&&face| face == TRAUMA_FACE).count() as u32
}

/// A validated pair of dice counts to roll together.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DicePool {
    base: u32,
    stress: u32,
}

impl DicePool {
    /// Build a pool, rejecting empty or oversized requests.
    pub fn new(base: u32, stress: u32) -> DiceResult<Self> {
        for count in [base, stress] {
            if count > MAX_POOL_SIZE {
                return Err(DiceError::PoolTooLarge {
                    count,
                    max: MAX_POOL_SIZE,
                });
            }
        }
        if base == 0 && stress == 0 {
            return Err(DiceError::EmptyPool);
        }
        Ok(Self { base, stress })
    }

    /// Roll both pools.
    pub fn roll<R: Rng + ?Sized>(&self, rng: &mut R) -> PoolResult {
        let base = (0..self.base).map(|_| roll_d6(rng)).collect();
        let stress = (0..self.stress).map(|_| roll_d6(rng)).collect();
        PoolResult { base, stress }
    }
}

/// Faces showing after rolling a [`DicePool`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PoolResult {
    /// Base die faces.
    pub base: Vec<u8>,
    /// Stress die faces.
    pub stress: Vec<u8>,
}

impl PoolResult {
    /// Number of sixes across both pools.
    pub fn successes(&self) -> u32 {
        count_successes(&self.base, &self.stress)
    }

    /// Number of ones in the stress pool.
    pub fn traumas(&self) -> u32 {
        count_traumas(&self.stress)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn counts_sixes_across_both_pools() {
        assert_eq!(count_successes(&[6, 3, 6], &[6, 1]), 3);
        assert_eq!(count_successes(&[], &[]), 0);
    }

    #[test]
    fn traumas_only_from_stress() {
        assert_eq!(count_traumas(&[1, 1, 6]), 2);
        let result = PoolResult {
            base: vec![1, 1, 1],
            stress: vec![2, 6],
        };
        assert_eq!(result.traumas(), 0);
        assert_eq!(result.successes(), 1);
    }

    #[test]
    fn rejects_empty_pool() {
        assert_eq!(DicePool::new(0, 0), Err(DiceError::EmptyPool));
        assert!(DicePool::new(0, 1).is_ok());
    }

    #[test]
    fn rejects_oversized_pool() {
        assert_eq!(
            DicePool::new(MAX_POOL_SIZE + 1, 0),
            Err(DiceError::PoolTooLarge {
                count: MAX_POOL_SIZE + 1,
                max: MAX_POOL_SIZE
            })
        );
        assert!(DicePool::new(2, MAX_POOL_SIZE + 5).is_err());
    }

    #[test]
    fn roll_produces_requested_sizes() {
        let mut rng = StdRng::seed_from_u64(42);
        let result = DicePool::new(5, 3).unwrap().roll(&mut rng);
        assert_eq!(result.base.len(), 5);
        assert_eq!(result.stress.len(), 3);
    }

    #[test]
    fn roll_deterministic_with_seed() {
        let pool = DicePool::new(4, 2).unwrap();
        let mut rng1 = StdRng::seed_from_u64(99);
        let mut rng2 = StdRng::seed_from_u64(99);
        assert_eq!(pool.roll(&mut rng1), pool.roll(&mut rng2));
    }

    proptest! {
        #[test]
        fn faces_stay_in_range(seed in any::<u64>(), base in 0u32..=MAX_POOL_SIZE, stress in 1u32..=MAX_POOL_SIZE) {
            let mut rng = StdRng::seed_from_u64(seed);
            let result = DicePool::new(base, stress).unwrap().roll(&mut rng);
            prop_assert!(result.base.iter().chain(result.stress.iter()).all(|f| (1..=6).contains(f)));
        }

        #[test]
        fn counting_rule_holds(base in proptest::collection::vec(1u8..=6, 0..20), stress in proptest::collection::vec(1u8..=6, 0..20)) {
            let sixes = base.iter().filter(|&&f| f == 6).count() + stress.iter().filter(|&&f| f == 6).count();
            let ones = stress.iter().filter(|&&f| f == 1).count();
            prop_assert_eq!(count_successes(&base, &stress) as usize, sixes);
            prop_assert_eq!(count_traumas(&stress) as usize, ones);
        }
    }
}
