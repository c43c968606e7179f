// src/models/tournament.rs

//! Tournament and assignment data structures.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::{GroundId, LaneId, Ruleset, Stake, TargetId};

pub type TournamentId = u64;

/// Distance per stake, in whole metres.
pub type StakeDistances = BTreeMap<Stake, u32>;

/// Binding of a target to a lane in one round.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assignment {
    /// Round number, starting at 1
    pub round: u32,

    pub lane_id: LaneId,

    pub target_id: TargetId,

    /// Longest stake distance, shown in listings
    pub distance: u32,

    pub stakes: StakeDistances,
}

impl Assignment {
    pub fn new(round: u32, lane_id: LaneId, target_id: TargetId, stakes: StakeDistances) -> Self {
        let distance = stakes.values().copied().max().unwrap_or(0);
        Self {
            round,
            lane_id,
            target_id,
            distance,
            stakes,
        }
    }
}

/// A row of a manually edited assignment list.
///
/// Ids are not resolved yet; the row number is its 1-based position in the
/// submitted list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DraftAssignment {
    pub round: u32,
    pub lane_id: LaneId,
    pub target_id: TargetId,
    #[serde(default)]
    pub stakes: StakeDistances,
}

impl From<&Assignment> for DraftAssignment {
    fn from(assignment: &Assignment) -> Self {
        Self {
            round: assignment.round,
            lane_id: assignment.lane_id,
            target_id: assignment.target_id,
            stakes: assignment.stakes.clone(),
        }
    }
}

/// Switches for a generation run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationOptions {
    /// Draw new stake distances every round instead of once per lane
    #[serde(default)]
    pub randomize_stakes_between_rounds: bool,

    /// Use lanes and targets flagged as training-only
    #[serde(default)]
    pub include_training_only: bool,
}

/// A tournament held at one archery ground.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tournament {
    pub id: TournamentId,

    pub name: String,

    pub event_date: NaiveDate,

    pub ruleset: Ruleset,

    pub ground_id: GroundId,

    /// Declared number of targets, i.e. assignments across all rounds
    pub number_of_targets: u32,

    /// Current assignment set; only ever replaced as a whole
    #[serde(default)]
    pub assignments: Vec<Assignment>,

    /// Bumped by storage on every save
    #[serde(default)]
    pub revision: u64,
}

impl Tournament {
    pub fn new(
        name: impl Into<String>,
        event_date: NaiveDate,
        ruleset: Ruleset,
        ground_id: GroundId,
        number_of_targets: u32,
    ) -> Self {
        Self {
            id: 0,
            name: name.into(),
            event_date,
            ruleset,
            ground_id,
            number_of_targets,
            assignments: Vec::new(),
            revision: 0,
        }
    }

    /// Swap in a new assignment set, discarding the previous one.
    pub fn replace_assignments(&mut self, assignments: Vec<Assignment>) -> Vec<Assignment> {
        std::mem::replace(&mut self.assignments, assignments)
    }

    /// Number of rounds in the current assignment set.
    pub fn round_count(&self) -> u32 {
        self.assignments.iter().map(|a| a.round).max().unwrap_or(0)
    }

    pub fn assignments_in_round(&self, round: u32) -> impl Iterator<Item = &Assignment> {
        self.assignments.iter().filter(move |a| a.round == round)
    }

    /// Assignments ordered by round, then lane, for display.
    pub fn sorted_assignments(&self) -> Vec<&Assignment> {
        let mut sorted: Vec<&Assignment> = self.assignments.iter().collect();
        sorted.sort_by_key(|a| (a.round, a.lane_id, a.target_id));
        sorted
    }
}
