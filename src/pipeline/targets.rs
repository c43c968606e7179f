// src/pipeline/targets.rs

//! Step 4: stand a concrete target on every chosen lane.

use rand::seq::SliceRandom;

use crate::error::GenerationError;
use crate::utils::RandomSource;

use super::pipeline::{GenerationContext, GenerationStep, Placement};

/// Pairs each lane of a type group with a distinct target of that type.
pub struct PlaceTargets;

impl GenerationStep for PlaceTargets {
    fn name(&self) -> &'static str {
        "Place targets on lanes"
    }

    fn run(
        &self,
        context: &mut GenerationContext<'_>,
        rng: &mut dyn RandomSource,
    ) -> Result<(), GenerationError> {
        let ground = context.ground;
        let include_training_only = context.options.include_training_only;

        let mut placements = Vec::new();
        for (target_type, lanes) in &context.lanes_by_type {
            let mut targets = ground.targets_of_type(*target_type, include_training_only);
            if targets.len() < lanes.len() {
                return Err(GenerationError::NotEnoughTargets {
                    target_type: *target_type,
                    required: lanes.len(),
                    found: targets.len(),
                });
            }

            targets.shuffle(rng);
            placements.extend(lanes.iter().zip(targets).map(|(lane, target)| Placement {
                lane: *lane,
                target,
                target_type: *target_type,
            }));
        }

        context.placements = placements;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;
    use crate::models::{ArcheryGround, GenerationOptions, NewLane, NewTarget, Ruleset, TargetType};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn ground(lanes: usize, targets: &[(TargetType, bool)]) -> ArcheryGround {
        let mut ground = ArcheryGround::new(1, "Vereinsgelände");
        for i in 0..lanes {
            ground
                .add_lane(NewLane {
                    name: format!("Bahn {}", i + 1),
                    max_distance: 40.0,
                    training_only: false,
                    notes: String::new(),
                })
                .unwrap();
        }
        for (i, (target_type, training_only)) in targets.iter().enumerate() {
            ground
                .add_target(NewTarget {
                    name: format!("Ziel {}", i + 1),
                    target_type: Some(*target_type),
                    zone_size_mm: None,
                    image: None,
                    training_only: *training_only,
                })
                .unwrap();
        }
        ground
    }

    #[test]
    fn test_distinct_targets_per_group() {
        let ground = ground(
            3,
            &[
                (TargetType::AnimalGroup2, false),
                (TargetType::AnimalGroup2, false),
                (TargetType::AnimalGroup2, false),
            ],
        );
        let mut context =
            GenerationContext::new(&ground, Ruleset::Dsb3d, 3, GenerationOptions::default());
        context.lanes_by_type = vec![(TargetType::AnimalGroup2, ground.lanes.iter().collect())];

        PlaceTargets.run(&mut context, &mut ChaCha8Rng::seed_from_u64(9)).unwrap();

        let target_ids: HashSet<u64> = context.placements.iter().map(|p| p.target.id).collect();
        assert_eq!(context.placements.len(), 3);
        assert_eq!(target_ids.len(), 3);
    }

    #[test]
    fn test_training_only_targets_do_not_count() {
        let ground = ground(
            2,
            &[
                (TargetType::AnimalGroup1, false),
                (TargetType::AnimalGroup1, true),
            ],
        );
        let mut context =
            GenerationContext::new(&ground, Ruleset::Dsb3d, 2, GenerationOptions::default());
        context.lanes_by_type = vec![(TargetType::AnimalGroup1, ground.lanes.iter().collect())];

        let err = PlaceTargets
            .run(&mut context, &mut ChaCha8Rng::seed_from_u64(1))
            .unwrap_err();
        assert_eq!(
            err,
            GenerationError::NotEnoughTargets {
                target_type: TargetType::AnimalGroup1,
                required: 2,
                found: 1,
            }
        );

        context.options.include_training_only = true;
        PlaceTargets.run(&mut context, &mut ChaCha8Rng::seed_from_u64(1)).unwrap();
        assert_eq!(context.placements.len(), 2);
    }
}
