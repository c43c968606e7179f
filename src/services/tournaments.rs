//! Tournament planning service.
//!
//! Resolves ids through storage, runs the generation pipeline or the
//! validation rules, and persists accepted assignment sets.

use std::sync::Arc;

use chrono::NaiveDate;

use crate::error::{AppError, Result};
use crate::models::{
    ArcheryGround, Assignment, Config, DraftAssignment, GenerationOptions, GroundId, Ruleset,
    Tournament, TournamentId,
};
use crate::pipeline::{GenerationOutcome, GenerationPipeline};
use crate::storage::TournamentStorage;
use crate::utils::{RandomSource, log};
use crate::validation::{ValidationContext, ValidationEngine, ValidationResult};

/// Parameters of a new tournament.
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    pub ground_id: GroundId,
    pub name: String,
    pub event_date: NaiveDate,
    pub ruleset: Ruleset,
    pub target_count: u32,
    pub options: GenerationOptions,
}

impl GenerationRequest {
    fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(AppError::validation("Tournament name is empty"));
        }
        if self.target_count == 0 {
            return Err(AppError::validation("Number of targets must be > 0"));
        }
        Ok(())
    }
}

/// Result of submitting a manually edited assignment list.
#[derive(Debug, Clone)]
pub enum DraftOutcome {
    /// All rules passed; the draft is the tournament's assignment set now
    Saved(Tournament),
    /// Nothing was saved
    Rejected(ValidationResult),
}

/// Service for generating, editing and checking tournaments.
pub struct TournamentPlanner {
    config: Arc<Config>,
    pipeline: GenerationPipeline,
    engine: ValidationEngine,
}

impl TournamentPlanner {
    /// Create a planner with the standard steps and rules.
    ///
    /// Step lines follow `logging.show_progress`.
    pub fn new(config: Arc<Config>) -> Self {
        let pipeline =
            GenerationPipeline::standard().with_progress(config.logging.show_progress);
        Self {
            config,
            pipeline,
            engine: ValidationEngine::standard(),
        }
    }

    /// Generate and store a new tournament.
    pub async fn generate(
        &self,
        storage: &dyn TournamentStorage,
        request: GenerationRequest,
        rng: &mut dyn RandomSource,
    ) -> Result<TournamentId> {
        request.validate()?;
        let ground = storage.load_ground(request.ground_id).await?;

        let outcome = self.run_pipeline(
            &ground,
            request.ruleset,
            request.target_count,
            request.options,
            rng,
        )?;

        let mut tournament = Tournament::new(
            request.name,
            request.event_date,
            request.ruleset,
            ground.id,
            request.target_count,
        );
        tournament.replace_assignments(outcome.assignments);
        let id = storage.insert_tournament(tournament).await?;

        if self.config.logging.show_progress {
            log::summary(
                "Tournament generated",
                &[
                    ("Tournament", id.to_string()),
                    ("Ground", ground.name.clone()),
                    ("Ruleset", request.ruleset.to_string()),
                    ("Rounds", outcome.rounds.to_string()),
                    ("Targets", request.target_count.to_string()),
                ],
            );
        }
        Ok(id)
    }

    /// Replace a tournament's assignments with a fresh generation run.
    ///
    /// The previous set is discarded only if the run succeeds.
    pub async fn regenerate(
        &self,
        storage: &dyn TournamentStorage,
        tournament_id: TournamentId,
        options: GenerationOptions,
        rng: &mut dyn RandomSource,
    ) -> Result<Tournament> {
        let mut tournament = storage.load_tournament(tournament_id).await?;
        let ground = storage.load_ground(tournament.ground_id).await?;

        let outcome = self.run_pipeline(
            &ground,
            tournament.ruleset,
            tournament.number_of_targets,
            options,
            rng,
        )?;

        let previous = tournament.replace_assignments(outcome.assignments);
        let meta = storage.save_tournament(&tournament).await?;
        tournament.revision = meta.revision;

        ::log::info!(
            "Regenerated tournament {}: {} assignments replaced by {} over {} round(s)",
            tournament.id,
            previous.len(),
            meta.assignment_count,
            outcome.rounds
        );
        Ok(tournament)
    }

    /// Validate a manually edited assignment list and save it if it passes.
    pub async fn apply_draft(
        &self,
        storage: &dyn TournamentStorage,
        tournament_id: TournamentId,
        rows: Vec<DraftAssignment>,
    ) -> Result<DraftOutcome> {
        let mut tournament = storage.load_tournament(tournament_id).await?;
        let ground = storage.load_ground(tournament.ground_id).await?;

        let context = ValidationContext::from_draft(
            tournament.ruleset,
            tournament.number_of_targets,
            &ground,
            &rows,
        );
        let result = self.engine.validate(&context);
        if !result.is_valid() {
            ::log::info!(
                "Draft for tournament {} rejected with {} issue(s)",
                tournament_id,
                result.len()
            );
            return Ok(DraftOutcome::Rejected(result));
        }

        let assignments = rows
            .into_iter()
            .map(|row| Assignment::new(row.round, row.lane_id, row.target_id, row.stakes))
            .collect();
        tournament.replace_assignments(assignments);
        let meta = storage.save_tournament(&tournament).await?;
        tournament.revision = meta.revision;

        Ok(DraftOutcome::Saved(tournament))
    }

    /// Run every rule over a stored tournament.
    pub async fn validate(
        &self,
        storage: &dyn TournamentStorage,
        tournament_id: TournamentId,
    ) -> Result<ValidationResult> {
        let tournament = storage.load_tournament(tournament_id).await?;
        let ground = storage.load_ground(tournament.ground_id).await?;

        let context = ValidationContext::for_tournament(&tournament, &ground);
        Ok(self.engine.validate(&context))
    }

    fn run_pipeline(
        &self,
        ground: &ArcheryGround,
        ruleset: Ruleset,
        target_count: u32,
        options: GenerationOptions,
        rng: &mut dyn RandomSource,
    ) -> Result<GenerationOutcome> {
        let outcome = self
            .pipeline
            .generate(ground, ruleset, target_count, options, rng)?;

        if self.config.generation.verify_output {
            let context = ValidationContext::from_assignments(
                ruleset,
                target_count,
                ground,
                &outcome.assignments,
            );
            let result = self.engine.validate(&context);
            if let Some(issue) = result.issues.first() {
                ::log::error!(
                    "Generated assignments for ground {} failed {} check(s)",
                    ground.id,
                    result.len()
                );
                return Err(AppError::validation(format!(
                    "generated assignments failed validation: {issue}"
                )));
            }
        }
        Ok(outcome)
    }
}
