//! Uniform random source used for particle spawning

use rand::Rng;

/// Source of uniformly distributed values
///
/// Implemented for every [`rand::Rng`], so a seeded
/// [`StdRng`](rand::rngs::StdRng) gives reproducible simulations and
/// [`rand::rng()`] gives a fresh one per run.
pub trait UniformSource {
    /// Returns a value in `[0, 1)`
    fn unit(&mut self) -> f64;

    /// Returns a value between `lo` and `hi`
    ///
    /// Computed as `lo + (hi - lo) * u`, so an empty range yields `lo` and a
    /// reversed range samples `(hi, lo]` instead of panicking.
    fn uniform(&mut self, lo: f64, hi: f64) -> f64 {
        lo + (hi - lo) * self.unit()
    }
}

impl<R: Rng + ?Sized> UniformSource for R {
    fn unit(&mut self) -> f64 {
        self.random::<f64>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_uniform_within_range() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..1000 {
            let v = rng.uniform(10.0, 20.0);
            assert!((10.0..20.0).contains(&v), "{v} outside [10, 20)");
        }
    }

    #[test]
    fn test_uniform_empty_range() {
        let mut rng = StdRng::seed_from_u64(7);
        assert_eq!(rng.uniform(3.0, 3.0), 3.0);
    }

    #[test]
    fn test_uniform_reversed_range() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..100 {
            let v = rng.uniform(5.0, -5.0);
            assert!(v > -5.0 && v <= 5.0);
        }
    }

    #[test]
    fn test_seeded_reproducible() {
        let mut a = StdRng::seed_from_u64(42);
        let mut b = StdRng::seed_from_u64(42);
        for _ in 0..10 {
            assert_eq!(a.unit(), b.unit());
        }
    }
}
