// src/validation/context.rs

//! Assignment sets prepared for validation.

use crate::models::{
    ArcheryGround, Assignment, DraftAssignment, LaneId, Ruleset, ShootingLane, StakeDistances,
    Target, TargetId, Tournament,
};

/// One assignment with its references resolved against a ground.
///
/// `lane` and `target` are `None` when the id is unknown to the ground.
#[derive(Debug, Clone, Copy)]
pub struct ValidationEntry<'a> {
    pub row: Option<usize>,
    pub round: u32,
    pub lane_id: LaneId,
    pub target_id: TargetId,
    pub lane: Option<&'a ShootingLane>,
    pub target: Option<&'a Target>,
    pub stakes: &'a StakeDistances,
}

impl ValidationEntry<'_> {
    /// Human-readable lane reference for messages.
    pub fn lane_label(&self) -> String {
        match self.lane {
            Some(lane) => format!("'{}'", lane.name),
            None => format!("#{}", self.lane_id),
        }
    }

    /// Human-readable target reference for messages.
    pub fn target_label(&self) -> String {
        match self.target {
            Some(target) => format!("'{}'", target.name),
            None => format!("#{}", self.target_id),
        }
    }
}

/// Everything a rule needs to check an assignment set.
#[derive(Debug, Clone)]
pub struct ValidationContext<'a> {
    pub ruleset: Ruleset,
    pub expected_target_count: u32,
    pub entries: Vec<ValidationEntry<'a>>,
}

impl<'a> ValidationContext<'a> {
    /// Context for user-submitted rows; row numbers start at 1.
    pub fn from_draft(
        ruleset: Ruleset,
        expected_target_count: u32,
        ground: &'a ArcheryGround,
        rows: &'a [DraftAssignment],
    ) -> Self {
        let entries = rows
            .iter()
            .enumerate()
            .map(|(index, row)| ValidationEntry {
                row: Some(index + 1),
                round: row.round,
                lane_id: row.lane_id,
                target_id: row.target_id,
                lane: ground.lane(row.lane_id),
                target: ground.target(row.target_id),
                stakes: &row.stakes,
            })
            .collect();

        Self {
            ruleset,
            expected_target_count,
            entries,
        }
    }

    /// Context for stored or freshly generated assignments.
    pub fn from_assignments(
        ruleset: Ruleset,
        expected_target_count: u32,
        ground: &'a ArcheryGround,
        assignments: &'a [Assignment],
    ) -> Self {
        let entries = assignments
            .iter()
            .map(|assignment| ValidationEntry {
                row: None,
                round: assignment.round,
                lane_id: assignment.lane_id,
                target_id: assignment.target_id,
                lane: ground.lane(assignment.lane_id),
                target: ground.target(assignment.target_id),
                stakes: &assignment.stakes,
            })
            .collect();

        Self {
            ruleset,
            expected_target_count,
            entries,
        }
    }

    pub fn for_tournament(tournament: &'a Tournament, ground: &'a ArcheryGround) -> Self {
        Self::from_assignments(
            tournament.ruleset,
            tournament.number_of_targets,
            ground,
            &tournament.assignments,
        )
    }
}
