//! Utility functions and helpers.

pub mod log;
pub mod random;

pub use random::{RandomSource, planner_rng};

/// `ceil(numerator / denominator)` for counts; `denominator` must be non-zero.
pub fn ceil_div(numerator: usize, denominator: usize) -> usize {
    numerator.div_ceil(denominator)
}
