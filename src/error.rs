// src/error.rs

//! Unified error handling for tournament planning.

use std::fmt;

use thiserror::Error;

use crate::models::{Stake, TargetType};

/// Result type alias for planner operations.
pub type Result<T> = std::result::Result<T, AppError>;

/// Unified application error type.
#[derive(Error, Debug)]
pub enum AppError {
    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parsing failed
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Input data validation error
    #[error("Validation error: {0}")]
    Validation(String),

    /// Entity lookup failed
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: String },

    /// Stored tournament changed since it was loaded
    #[error(
        "Tournament {tournament_id} was modified concurrently \
         (expected revision {expected}, found {found})"
    )]
    Conflict {
        tournament_id: u64,
        expected: u64,
        found: u64,
    },

    /// Tournament generation failed
    #[error("Generation error: {0}")]
    Generation(#[from] GenerationError),
}

impl AppError {
    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Create a not-found error for an entity.
    pub fn not_found(entity: &'static str, id: impl fmt::Display) -> Self {
        Self::NotFound {
            entity,
            id: id.to_string(),
        }
    }
}

/// Reasons a generation run can abort.
///
/// None of these are retried automatically; the caller decides whether to try
/// again with different inputs (e.g. including training-only lanes).
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GenerationError {
    #[error("the archery ground has no shooting lanes")]
    NoLanesAtShootingRange,

    #[error("no shooting lane at the archery ground qualifies for this ruleset")]
    NoQualifiedLanesAtShootingRange,

    #[error("the ruleset declares no target types")]
    NoTargetTypes,

    #[error("the number of targets must be greater than zero")]
    NoTargetsRequested,

    #[error("not enough shooting lanes for {target_type}: {required} required, {found} found")]
    NotEnoughLanes {
        target_type: TargetType,
        required: usize,
        found: usize,
    },

    #[error("not enough targets of {target_type}: {required} required, {found} found")]
    NotEnoughTargets {
        target_type: TargetType,
        required: usize,
        found: usize,
    },

    #[error(
        "stake {stake} for {target_type} cannot be placed on lane '{lane}' \
         (range {min}..={max} m)"
    )]
    InfeasibleStakeRange {
        lane: String,
        stake: Stake,
        target_type: TargetType,
        min: f64,
        max: f64,
    },

    #[error("{target_type} is not part of the ruleset")]
    UnsupportedTargetType { target_type: TargetType },
}
