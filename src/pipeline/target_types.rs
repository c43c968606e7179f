// src/pipeline/target_types.rs

//! Step 3: decide which lanes host which target type.

use rand::seq::SliceRandom;

use crate::error::GenerationError;
use crate::utils::{RandomSource, ceil_div};

use super::pipeline::{GenerationContext, GenerationStep};

/// Greedy placement of target types onto lanes.
///
/// Types needing the least distance go first so long lanes stay available for
/// the demanding ones. Lanes are taken from a shuffled pool and never handed
/// back; a type that cannot be satisfied fails the run without backtracking.
pub struct PlaceTargetTypes;

impl GenerationStep for PlaceTargetTypes {
    fn name(&self) -> &'static str {
        "Place target types on lanes"
    }

    fn run(
        &self,
        context: &mut GenerationContext<'_>,
        rng: &mut dyn RandomSource,
    ) -> Result<(), GenerationError> {
        let ruleset = context.ruleset;

        let mut types = Vec::new();
        for target_type in ruleset.target_types() {
            let required = ruleset
                .required_distance(target_type)
                .ok_or(GenerationError::UnsupportedTargetType { target_type })?;
            types.push((target_type, required));
        }
        if types.is_empty() {
            return Err(GenerationError::NoTargetTypes);
        }
        types.sort_by(|a, b| a.1.total_cmp(&b.1));

        let per_type = ceil_div(
            context.target_count as usize,
            types.len() * context.rounds.max(1) as usize,
        );

        let mut pool = std::mem::take(&mut context.available_lanes);
        for (target_type, required) in types {
            pool.shuffle(rng);

            let mut chosen = Vec::with_capacity(per_type);
            let mut remaining = Vec::with_capacity(pool.len());
            for lane in pool {
                if chosen.len() < per_type && lane.max_distance >= required {
                    chosen.push(lane);
                } else {
                    remaining.push(lane);
                }
            }
            pool = remaining;

            if chosen.len() < per_type {
                return Err(GenerationError::NotEnoughLanes {
                    target_type,
                    required: per_type,
                    found: chosen.len(),
                });
            }

            log::debug!(
                "{}: lanes {:?}",
                target_type,
                chosen.iter().map(|l| l.id).collect::<Vec<_>>()
            );
            context.lanes_by_type.push((target_type, chosen));
        }

        context.available_lanes = pool;
        Ok(())
    }
}
