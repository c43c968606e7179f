// src/pipeline/lanes.rs

//! Step 1: collect the lanes a tournament may use.

use crate::error::GenerationError;
use crate::utils::RandomSource;

use super::pipeline::{GenerationContext, GenerationStep};

/// Drops training-only lanes (unless requested) and lanes too short for any
/// target type of the ruleset.
pub struct CollectQualifiedLanes;

impl GenerationStep for CollectQualifiedLanes {
    fn name(&self) -> &'static str {
        "Collect qualified lanes"
    }

    fn run(
        &self,
        context: &mut GenerationContext<'_>,
        _rng: &mut dyn RandomSource,
    ) -> Result<(), GenerationError> {
        let ground = context.ground;
        if ground.lanes.is_empty() {
            return Err(GenerationError::NoLanesAtShootingRange);
        }

        let minimum = context.ruleset.minimum_distance();
        let lanes: Vec<_> = ground
            .lanes_for_tournament(context.options.include_training_only)
            .into_iter()
            .filter(|lane| lane.max_distance >= minimum)
            .collect();

        if lanes.is_empty() {
            return Err(GenerationError::NoQualifiedLanesAtShootingRange);
        }

        log::debug!(
            "{} of {} lanes qualify (minimum distance {} m)",
            lanes.len(),
            ground.lanes.len(),
            minimum
        );
        context.qualified_lane_count = lanes.len();
        context.available_lanes = lanes;
        Ok(())
    }
}
