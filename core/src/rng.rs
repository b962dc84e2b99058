//! Seeded randomness for synthetic streams.
//!
//! RULE: Synthetic data never touches a platform RNG.
//! A StreamRng is derived from one master seed and a stream index, so a
//! replay with the same seed produces the same transactions.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg64Mcg;

pub struct StreamRng {
    inner: Pcg64Mcg,
}

impl StreamRng {
    pub fn new(master_seed: u64, stream: u64) -> Self {
        let derived_seed = master_seed ^ stream.wrapping_mul(0x9e37_79b9_7f4a_7c15);
        Self { inner: Pcg64Mcg::seed_from_u64(derived_seed) }
    }

    /// Uniform index in `[0, n)`. `n` must be non-zero.
    pub fn below(&mut self, n: usize) -> usize {
        self.inner.gen_range(0..n)
    }

    /// Uniform float in `[low, high)`.
    pub fn uniform(&mut self, low: f64, high: f64) -> f64 {
        self.inner.gen_range(low..high)
    }

    /// True with probability `p`. Out-of-range `p` saturates.
    pub fn chance(&mut self, p: f64) -> bool {
        self.inner.gen::<f64>() < p
    }

    /// Pareto(x_min, alpha) by inverse transform; heavy right tail like real spend.
    pub fn pareto(&mut self, x_min: f64, alpha: f64) -> f64 {
        // 1 - U lies in (0, 1], so the power never sees zero.
        let u = 1.0 - self.inner.gen::<f64>();
        x_min * u.powf(-1.0 / alpha)
    }

    pub fn pick<'a, T>(&mut self, items: &'a [T]) -> &'a T {
        &items[self.below(items.len())]
    }
}
