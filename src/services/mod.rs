//! Service layer for the planner application.
//!
//! - Tournament generation, manual edits and checks (`TournamentPlanner`)

mod tournaments;

pub use tournaments::{DraftOutcome, GenerationRequest, TournamentPlanner};
