// src/pipeline/pipeline.rs

//! Ordered generation pipeline and its shared working context.

use crate::error::GenerationError;
use crate::models::{
    ArcheryGround, Assignment, GenerationOptions, Ruleset, ShootingLane, Target, TargetType,
};
use crate::utils::RandomSource;
use crate::utils::log;

use super::assignments::GenerateAssignments;
use super::lanes::CollectQualifiedLanes;
use super::rounds::CalculateRounds;
use super::target_types::PlaceTargetTypes;
use super::targets::PlaceTargets;

/// A concrete target standing on a chosen lane.
#[derive(Debug, Clone, Copy)]
pub struct Placement<'a> {
    pub lane: &'a ShootingLane,
    pub target: &'a Target,
    pub target_type: TargetType,
}

/// Working result threaded through every step.
///
/// Each step reads the fields filled by its predecessors and writes its own.
#[derive(Debug)]
pub struct GenerationContext<'a> {
    pub ground: &'a ArcheryGround,
    pub ruleset: Ruleset,
    pub target_count: u32,
    pub options: GenerationOptions,

    /// Lane pool: qualified lanes after step 1, leftovers after step 3
    pub available_lanes: Vec<&'a ShootingLane>,
    /// Number of qualified lanes found by step 1
    pub qualified_lane_count: usize,
    pub rounds: u32,
    /// Lanes picked per target type by step 3, in placement order
    pub lanes_by_type: Vec<(TargetType, Vec<&'a ShootingLane>)>,
    /// Lane/target pairs fixed by step 4
    pub placements: Vec<Placement<'a>>,
    pub assignments: Vec<Assignment>,
}

impl<'a> GenerationContext<'a> {
    pub fn new(
        ground: &'a ArcheryGround,
        ruleset: Ruleset,
        target_count: u32,
        options: GenerationOptions,
    ) -> Self {
        Self {
            ground,
            ruleset,
            target_count,
            options,
            available_lanes: Vec::new(),
            qualified_lane_count: 0,
            rounds: 0,
            lanes_by_type: Vec::new(),
            placements: Vec::new(),
            assignments: Vec::new(),
        }
    }
}

/// One stage of the pipeline.
pub trait GenerationStep: Send + Sync {
    /// Short description used in progress output.
    fn name(&self) -> &'static str;

    /// Steps that return `false` are skipped for that ruleset.
    fn supports(&self, _ruleset: Ruleset) -> bool {
        true
    }

    fn run(
        &self,
        context: &mut GenerationContext<'_>,
        rng: &mut dyn RandomSource,
    ) -> Result<(), GenerationError>;
}

/// Successful generation run.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationOutcome {
    pub rounds: u32,
    pub qualified_lanes: usize,
    pub assignments: Vec<Assignment>,
}

/// Runs the generation steps in their fixed order.
pub struct GenerationPipeline {
    steps: Vec<Box<dyn GenerationStep>>,
    show_progress: bool,
}

impl GenerationPipeline {
    /// The five standard steps, in order.
    pub fn standard() -> Self {
        Self::with_steps(vec![
            Box::new(CollectQualifiedLanes),
            Box::new(CalculateRounds),
            Box::new(PlaceTargetTypes),
            Box::new(PlaceTargets),
            Box::new(GenerateAssignments),
        ])
    }

    pub fn with_steps(steps: Vec<Box<dyn GenerationStep>>) -> Self {
        Self {
            steps,
            show_progress: true,
        }
    }

    /// Turn the per-step progress lines on or off. Failures are logged
    /// either way.
    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    pub fn shows_progress(&self) -> bool {
        self.show_progress
    }

    pub fn step_names(&self) -> Vec<&'static str> {
        self.steps.iter().map(|s| s.name()).collect()
    }

    /// Generate the assignment set for a tournament.
    ///
    /// Any failing step aborts the run; nothing partial is returned.
    pub fn generate(
        &self,
        ground: &ArcheryGround,
        ruleset: Ruleset,
        target_count: u32,
        options: GenerationOptions,
        rng: &mut dyn RandomSource,
    ) -> Result<GenerationOutcome, GenerationError> {
        let mut context = GenerationContext::new(ground, ruleset, target_count, options);
        let total = self.steps.len();

        for (index, step) in self.steps.iter().enumerate() {
            let supported = step.supports(ruleset);
            if self.show_progress {
                if supported {
                    log::step(index + 1, total, step.name());
                } else {
                    log::skipped(index + 1, total, step.name());
                }
            }
            if !supported {
                continue;
            }

            if let Err(e) = step.run(&mut context, rng) {
                ::log::warn!("Generation for ground {} aborted: {}", ground.id, e);
                return Err(e);
            }
        }

        Ok(GenerationOutcome {
            rounds: context.rounds,
            qualified_lanes: context.qualified_lane_count,
            assignments: context.assignments,
        })
    }
}

impl Default for GenerationPipeline {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::{HashMap, HashSet};

    use super::*;
    use crate::models::{LaneId, NewLane, NewTarget, TargetId};
    use rand::SeedableRng;
    use rand::rngs::mock::StepRng;
    use rand_chacha::ChaCha8Rng;

    fn ground_with(lanes: &[(f64, bool)], targets: &[TargetType]) -> ArcheryGround {
        let mut ground = ArcheryGround::new(1, "Waldparcours");
        for (i, (max_distance, training_only)) in lanes.iter().enumerate() {
            ground
                .add_lane(NewLane {
                    name: format!("Bahn {}", i + 1),
                    max_distance: *max_distance,
                    training_only: *training_only,
                    notes: String::new(),
                })
                .unwrap();
        }
        for (i, target_type) in targets.iter().enumerate() {
            ground
                .add_target(NewTarget {
                    name: format!("Ziel {}", i + 1),
                    target_type: Some(*target_type),
                    zone_size_mm: None,
                    image: None,
                    training_only: false,
                })
                .unwrap();
        }
        ground
    }

    #[test]
    fn test_standard_step_order() {
        let pipeline = GenerationPipeline::standard();
        assert_eq!(
            pipeline.step_names(),
            vec![
                "Collect qualified lanes",
                "Calculate required rounds",
                "Place target types on lanes",
                "Place targets on lanes",
                "Generate assignments",
            ]
        );
    }

    #[test]
    fn test_one_target_per_type_fits_in_one_round() {
        let ground = ground_with(
            &[(50.0, false), (45.0, false), (35.0, false), (25.0, false)],
            &TargetType::ALL,
        );

        let outcome = GenerationPipeline::standard()
            .generate(
                &ground,
                Ruleset::Dsb3d,
                4,
                GenerationOptions::default(),
                &mut ChaCha8Rng::seed_from_u64(11),
            )
            .unwrap();

        assert_eq!(outcome.rounds, 1);
        assert_eq!(outcome.assignments.len(), 4);
        for assignment in &outcome.assignments {
            let lane = ground.lane(assignment.lane_id).unwrap();
            let target = ground.target(assignment.target_id).unwrap();
            for range in Ruleset::Dsb3d.stakes(target.target_type).unwrap() {
                let distance = assignment.stakes[&range.stake];
                assert!(range.allows(distance, Some(lane.max_distance)));
            }
        }
    }

    #[test]
    fn test_training_only_lanes_are_not_qualified() {
        let ground = ground_with(&[(40.0, true), (40.0, true)], &TargetType::ALL);

        let result = GenerationPipeline::standard().generate(
            &ground,
            Ruleset::Dsb3d,
            4,
            GenerationOptions::default(),
            &mut StepRng::new(0, 0),
        );
        assert_eq!(
            result.unwrap_err(),
            GenerationError::NoQualifiedLanesAtShootingRange
        );
    }

    #[test]
    fn test_target_count_is_exact_across_rounds() {
        let ground = ground_with(
            &[(50.0, false); 6],
            &[
                TargetType::AnimalGroup1,
                TargetType::AnimalGroup1,
                TargetType::AnimalGroup2,
                TargetType::AnimalGroup2,
                TargetType::AnimalGroup3,
                TargetType::AnimalGroup4,
            ],
        );

        // 7 targets on 6 lanes: 2 rounds, one lane per type, last round cut short
        let outcome = GenerationPipeline::standard()
            .generate(
                &ground,
                Ruleset::Wa3d,
                7,
                GenerationOptions::default(),
                &mut ChaCha8Rng::seed_from_u64(3),
            )
            .unwrap();

        assert_eq!(outcome.rounds, 2);
        assert_eq!(outcome.assignments.len(), 7);
        assert_eq!(outcome.assignments.iter().filter(|a| a.round == 2).count(), 3);
        assert!(outcome.assignments.iter().all(|a| a.round <= 2));
    }

    #[test]
    fn test_lanes_keep_their_target_and_stakes_across_rounds() {
        let ground = ground_with(&[(50.0, false); 5], &TargetType::ALL);

        let outcome = GenerationPipeline::standard()
            .generate(
                &ground,
                Ruleset::Dsb3d,
                8,
                GenerationOptions::default(),
                &mut ChaCha8Rng::seed_from_u64(5),
            )
            .unwrap();

        let mut by_lane: HashMap<LaneId, (TargetId, _)> = HashMap::new();
        let mut per_round: HashSet<(u32, LaneId)> = HashSet::new();
        for assignment in &outcome.assignments {
            assert!(per_round.insert((assignment.round, assignment.lane_id)));
            let entry = by_lane
                .entry(assignment.lane_id)
                .or_insert((assignment.target_id, assignment.stakes.clone()));
            assert_eq!(entry.0, assignment.target_id);
            assert_eq!(entry.1, assignment.stakes);
        }
    }

    #[test]
    fn test_unsupported_step_is_skipped() {
        struct NeverRuns;

        impl GenerationStep for NeverRuns {
            fn name(&self) -> &'static str {
                "Never runs"
            }

            fn supports(&self, _ruleset: Ruleset) -> bool {
                false
            }

            fn run(
                &self,
                _context: &mut GenerationContext<'_>,
                _rng: &mut dyn RandomSource,
            ) -> Result<(), GenerationError> {
                Err(GenerationError::NoTargetTypes)
            }
        }

        let ground = ground_with(&[(50.0, false)], &[]);
        let pipeline = GenerationPipeline::with_steps(vec![
            Box::new(CollectQualifiedLanes),
            Box::new(NeverRuns),
        ]);

        let outcome = pipeline
            .generate(
                &ground,
                Ruleset::Dsb3d,
                1,
                GenerationOptions::default(),
                &mut StepRng::new(0, 0),
            )
            .unwrap();
        assert_eq!(outcome.qualified_lanes, 1);
        assert!(outcome.assignments.is_empty());
    }

    #[test]
    fn test_quiet_pipeline_generates_the_same_set() {
        let ground = ground_with(&[(50.0, false); 4], &TargetType::ALL);
        let quiet = GenerationPipeline::standard().with_progress(false);
        assert!(!quiet.shows_progress());
        assert!(GenerationPipeline::standard().shows_progress());

        let run = |pipeline: &GenerationPipeline| {
            pipeline
                .generate(
                    &ground,
                    Ruleset::Dsb3d,
                    4,
                    GenerationOptions::default(),
                    &mut ChaCha8Rng::seed_from_u64(13),
                )
                .unwrap()
        };
        assert_eq!(run(&quiet), run(&GenerationPipeline::standard()));
    }

    #[test]
    fn test_lane_too_short_for_a_longer_stake() {
        // 18 m reaches the shortest stake of every WA_3D type, but not the red
        // stake of groups 1 and 2.
        let ground = ground_with(&[(18.0, false); 4], &TargetType::ALL);

        let err = GenerationPipeline::standard()
            .generate(
                &ground,
                Ruleset::Wa3d,
                4,
                GenerationOptions::default(),
                &mut ChaCha8Rng::seed_from_u64(2),
            )
            .unwrap_err();
        assert!(matches!(
            err,
            GenerationError::InfeasibleStakeRange {
                stake: crate::models::Stake::Red,
                ..
            }
        ));
    }
}
