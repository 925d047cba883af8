//! Seedable random sources.
//!
//! Every random draw in the crate goes through an explicitly passed
//! `rand::Rng`, so a run is reproducible from its seed alone.

use ndarray::Array2;
use ndarray_rand::rand_distr::StandardNormal;
use ndarray_rand::RandomExt;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Create a deterministic RNG from a seed.
pub fn seeded(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

/// Matrix of independent standard-normal samples.
pub fn standard_normal<R: Rng + ?Sized>(rows: usize, cols: usize, rng: &mut R) -> Array2<f64> {
    Array2::random_using((rows, cols), StandardNormal, rng)
}
