// src/models/mod.rs

//! Domain models for tournament planning.
//!
//! This module contains all data structures used throughout the application,
//! organized by their primary purpose.

mod config;
mod ground;
mod ruleset;
mod seed;
mod tournament;

// Re-export all public types
pub use config::{Config, GenerationConfig, LoggingConfig};
pub use ground::{
    ArcheryGround, GroundId, LaneId, NewLane, NewTarget, ShootingLane, Target, TargetId,
};
pub use ruleset::{Ruleset, Stake, StakeRange, TargetType};
pub use seed::GroundSeed;
pub use tournament::{
    Assignment, DraftAssignment, GenerationOptions, StakeDistances, Tournament, TournamentId,
};
