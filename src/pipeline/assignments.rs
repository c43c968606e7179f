// src/pipeline/assignments.rs

//! Step 5: spread placements over rounds and fix stake distances.

use std::collections::VecDeque;

use rand::seq::SliceRandom;

use crate::error::GenerationError;
use crate::models::{Assignment, StakeDistances, TargetType};
use crate::utils::RandomSource;

use super::pipeline::{GenerationContext, GenerationStep, Placement};
use super::sampler::sample_stakes;

/// Emits exactly `target_count` assignments, round after round.
pub struct GenerateAssignments;

impl GenerationStep for GenerateAssignments {
    fn name(&self) -> &'static str {
        "Generate assignments"
    }

    fn run(
        &self,
        context: &mut GenerationContext<'_>,
        rng: &mut dyn RandomSource,
    ) -> Result<(), GenerationError> {
        let ruleset = context.ruleset;
        let placements = &context.placements;
        let target_count = context.target_count as usize;

        let per_round = context.options.randomize_stakes_between_rounds;
        // Drawn when a placement is first emitted, then reused every round
        let mut fixed_stakes: Vec<Option<StakeDistances>> = vec![None; placements.len()];

        let mut assignments = Vec::with_capacity(target_count);
        let mut order: Vec<usize> = (0..placements.len()).collect();

        for round in 1..=context.rounds {
            let remaining = target_count - assignments.len();
            if remaining == 0 {
                break;
            }

            order.shuffle(rng);
            if remaining < order.len() {
                order = interleave_by_type(&order, placements);
            }

            for &index in order.iter().take(remaining) {
                let placement = &placements[index];
                let stakes = match fixed_stakes[index].clone() {
                    Some(fixed) => fixed,
                    None => {
                        let drawn =
                            sample_stakes(ruleset, placement.target_type, placement.lane, rng)?;
                        if !per_round {
                            fixed_stakes[index] = Some(drawn.clone());
                        }
                        drawn
                    }
                };
                assignments.push(Assignment::new(
                    round,
                    placement.lane.id,
                    placement.target.id,
                    stakes,
                ));
            }
        }

        log::debug!(
            "Emitted {} assignments over {} round(s)",
            assignments.len(),
            context.rounds
        );
        context.assignments = assignments;
        Ok(())
    }
}

/// Reorder so target types alternate, keeping the shuffled order within a
/// type. Cutting a round short then drops placements evenly across types.
fn interleave_by_type(order: &[usize], placements: &[Placement<'_>]) -> Vec<usize> {
    let mut groups: Vec<(TargetType, VecDeque<usize>)> = Vec::new();
    for &index in order {
        let target_type = placements[index].target_type;
        match groups.iter_mut().find(|(t, _)| *t == target_type) {
            Some((_, queue)) => queue.push_back(index),
            None => groups.push((target_type, VecDeque::from([index]))),
        }
    }

    let mut interleaved = Vec::with_capacity(order.len());
    while interleaved.len() < order.len() {
        for (_, queue) in groups.iter_mut() {
            if let Some(index) = queue.pop_front() {
                interleaved.push(index);
            }
        }
    }
    interleaved
}
