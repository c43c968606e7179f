// src/utils/random.rs

//! Randomness for shuffling and distance draws.
//!
//! Generation steps take any `rand` generator through [`RandomSource`].
//! Shuffles go through `SliceRandom`, draws through `Rng::gen_range`. Tests
//! pass a seeded `ChaCha8Rng`, or `rand::rngs::mock::StepRng` when every
//! draw should hit the lower bound.

use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Object-safe handle on a `rand` generator.
pub trait RandomSource: RngCore {}

impl<R: RngCore + ?Sized> RandomSource for R {}

/// Generator for a planning run: seeded when `seed` is given, otherwise
/// from entropy.
pub fn planner_rng(seed: Option<u64>) -> ChaCha8Rng {
    match seed {
        Some(seed) => ChaCha8Rng::seed_from_u64(seed),
        None => ChaCha8Rng::from_entropy(),
    }
}
