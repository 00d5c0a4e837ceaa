use rand::distributions::{Distribution, WeightedIndex};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Source of randomness for multiplier selection.
///
/// Implementations return an index into the candidate list.
pub trait MultiplierPicker {
    /// Pick an index with probability proportional to `weights`.
    /// Returns `None` if the weights cannot form a distribution.
    fn pick_weighted(&mut self, weights: &[f64]) -> Option<usize>;

    /// Pick an index uniformly from `0..len`. `len` is never zero.
    fn pick_uniform(&mut self, len: usize) -> usize;
}

/// Picker backed by a `rand` generator.
pub struct RngPicker<R> {
    rng: R,
}

impl<R: Rng> RngPicker<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl RngPicker<StdRng> {
    pub fn from_entropy() -> Self {
        Self::new(StdRng::from_entropy())
    }

    pub fn seeded(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }

    /// Seeded when a seed is given, otherwise from entropy.
    pub fn from_seed_option(seed: Option<u64>) -> Self {
        match seed {
            Some(seed) => Self::seeded(seed),
            None => Self::from_entropy(),
        }
    }
}

impl<R: Rng> MultiplierPicker for RngPicker<R> {
    fn pick_weighted(&mut self, weights: &[f64]) -> Option<usize> {
        let distribution = WeightedIndex::new(weights).ok()?;
        Some(distribution.sample(&mut self.rng))
    }

    fn pick_uniform(&mut self, len: usize) -> usize {
        self.rng.gen_range(0..len)
    }
}
