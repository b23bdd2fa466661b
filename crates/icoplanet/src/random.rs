use rand::rngs::StdRng;
use rand::{Rng, RngCore, SeedableRng};

/// Seeded source of uniform draws in `[0, 1)`.
///
/// Generation only needs a reproducible sequence per seed; any `rand` generator qualifies.
pub trait RandomSource {
    fn draw(&mut self) -> f64;

    /// Uniform index in `0..len`. `len` must be non-zero.
    fn pick(&mut self, len: usize) -> usize {
        debug_assert!(len > 0);
        ((self.draw() * len as f64) as usize).min(len - 1)
    }
}

impl<R: RngCore> RandomSource for R {
    fn draw(&mut self) -> f64 {
        self.random::<f64>()
    }
}

/// Generator for one level. Mixing the depth in keeps each level independent of
/// how many draws the levels before it consumed.
pub fn level_rng(seed: u64, depth: usize) -> StdRng {
    let mixed = splitmix64(seed ^ (depth as u64).wrapping_mul(0x9E3779B97F4A7C15));
    StdRng::seed_from_u64(mixed)
}

/// Short user-facing seed, easy to type back in.
pub fn generate_seed() -> u32 {
    rand::rng().random_range(0..100_000_000)
}

/// Widen a short seed into the generator seed actually used.
pub fn expand_seed(code: u32) -> u64 {
    splitmix64(code as u64)
}

pub fn splitmix64(mut x: u64) -> u64 {
    x = x.wrapping_add(0x9E3779B97F4A7C15);
    let mut z = x;
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58476D1CE4E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D049BB133111EB);
    z ^ (z >> 31)
}
