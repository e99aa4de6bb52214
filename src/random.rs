//! Randomness collaborator backing `RAND`, `UUID` and `STRUUID`.

use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use uuid::Uuid;

/// Source of random numbers and version-4 UUIDs.
///
/// Shared by every compiled evaluator of a [`crate::FilterEvaluator`], so
/// implementations must tolerate concurrent calls.
pub trait RandomSource: Send + Sync {
    /// Returns a uniformly distributed number in `[0, 1)`.
    fn next_f64(&self) -> f64;

    /// Returns a fresh version-4 UUID.
    fn uuid_v4(&self) -> Uuid;
}

/// Thread-safe generator guarding a single [`StdRng`].
pub struct SharedRng {
    rng: Mutex<StdRng>,
}

impl SharedRng {
    /// Creates a generator seeded from OS entropy.
    #[must_use]
    pub fn from_entropy() -> Self {
        Self {
            rng: Mutex::new(StdRng::from_entropy()),
        }
    }

    /// Creates a deterministic generator for reproducible output.
    #[must_use]
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }
}

impl Default for SharedRng {
    fn default() -> Self {
        Self::from_entropy()
    }
}

impl RandomSource for SharedRng {
    fn next_f64(&self) -> f64 {
        self.rng.lock().gen::<f64>()
    }

    fn uuid_v4(&self) -> Uuid {
        let mut bytes = [0u8; 16];
        self.rng.lock().fill(&mut bytes);
        uuid::Builder::from_random_bytes(bytes).into_uuid()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seeded_is_reproducible() {
        let a = SharedRng::seeded(7);
        let b = SharedRng::seeded(7);
        assert_eq!(a.next_f64().to_bits(), b.next_f64().to_bits());
        assert_eq!(a.uuid_v4(), b.uuid_v4());
    }

    #[test]
    fn test_uuid_is_version_4() {
        let rng = SharedRng::from_entropy();
        assert_eq!(rng.uuid_v4().get_version_num(), 4);
    }

    #[test]
    fn test_next_f64_in_unit_interval() {
        let rng = SharedRng::seeded(1);
        for _ in 0..100 {
            let n = rng.next_f64();
            assert!((0.0..1.0).contains(&n));
        }
    }
}
