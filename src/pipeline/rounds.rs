// src/pipeline/rounds.rs

//! Step 2: how many rounds the qualified lanes need.

use crate::error::GenerationError;
use crate::utils::{RandomSource, ceil_div};

use super::pipeline::{GenerationContext, GenerationStep};

/// `rounds = ceil(target_count / qualified lanes)`.
pub struct CalculateRounds;

impl GenerationStep for CalculateRounds {
    fn name(&self) -> &'static str {
        "Calculate required rounds"
    }

    fn run(
        &self,
        context: &mut GenerationContext<'_>,
        _rng: &mut dyn RandomSource,
    ) -> Result<(), GenerationError> {
        if context.ruleset.target_types().is_empty() {
            return Err(GenerationError::NoTargetTypes);
        }
        if context.target_count == 0 {
            return Err(GenerationError::NoTargetsRequested);
        }
        if context.available_lanes.is_empty() {
            return Err(GenerationError::NoQualifiedLanesAtShootingRange);
        }

        let rounds = ceil_div(context.target_count as usize, context.available_lanes.len());
        context.rounds = rounds as u32;

        log::debug!(
            "{} targets on {} lanes need {} round(s)",
            context.target_count,
            context.available_lanes.len(),
            context.rounds
        );
        Ok(())
    }
}
