// src/pipeline/sampler.rs

//! Random stake distances within ruleset and lane limits.

use rand::Rng;

use crate::error::GenerationError;
use crate::models::{Ruleset, ShootingLane, StakeDistances, StakeRange, TargetType};
use crate::utils::RandomSource;

/// Whole-metre bounds of a stake on a lane, `None` if no integer fits.
pub fn integer_bounds(range: &StakeRange, lane_max_distance: f64) -> Option<(u32, u32)> {
    let low = range.min.ceil().max(0.0);
    let high = range.capped_max(lane_max_distance).floor();
    if high < low {
        return None;
    }
    Some((low as u32, high as u32))
}

/// Draw one distance per stake of `target_type` for `lane`.
///
/// Every call draws independently; callers that want the same distances in
/// every round keep the first result.
pub fn sample_stakes(
    ruleset: Ruleset,
    target_type: TargetType,
    lane: &ShootingLane,
    rng: &mut dyn RandomSource,
) -> Result<StakeDistances, GenerationError> {
    let ranges = ruleset
        .stakes(target_type)
        .ok_or(GenerationError::UnsupportedTargetType { target_type })?;

    let mut stakes = StakeDistances::new();
    for range in ranges {
        let (low, high) = integer_bounds(range, lane.max_distance).ok_or_else(|| {
            GenerationError::InfeasibleStakeRange {
                lane: lane.name.clone(),
                stake: range.stake,
                target_type,
                min: range.min,
                max: range.capped_max(lane.max_distance),
            }
        })?;
        stakes.insert(range.stake, rng.gen_range(low..=high));
    }
    Ok(stakes)
}
