// src/validation/uniqueness.rs

//! Lane and target identity rules.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use serde_json::json;

use crate::models::{LaneId, TargetId};

use super::{Issue, ValidationContext, ValidationRule};

/// A physical target stands on one lane only.
///
/// The first lane seen for a target is the baseline; rows placing it on
/// another lane are flagged.
pub struct TargetUniquenessRule;

impl ValidationRule for TargetUniquenessRule {
    fn name(&self) -> &'static str {
        "Target Uniqueness"
    }

    fn validate(&self, context: &ValidationContext<'_>) -> Vec<Issue> {
        let mut baseline: HashMap<TargetId, LaneId> = HashMap::new();
        let mut issues = Vec::new();

        for entry in &context.entries {
            let first_lane = *baseline.entry(entry.target_id).or_insert(entry.lane_id);
            if first_lane != entry.lane_id {
                issues.push(
                    Issue::new(
                        self.name(),
                        format!(
                            "Target {} is already placed on lane #{}, not lane {}",
                            entry.target_label(),
                            first_lane,
                            entry.lane_label()
                        ),
                    )
                    .with("target_id", entry.target_id)
                    .with("expected_lane_id", first_lane)
                    .with("lane_id", entry.lane_id)
                    .at_row(entry.row),
                );
            }
        }
        issues
    }
}

/// Within a round a lane hosts a single target.
pub struct LaneUniquenessRule;

impl ValidationRule for LaneUniquenessRule {
    fn name(&self) -> &'static str {
        "Lane Uniqueness"
    }

    fn validate(&self, context: &ValidationContext<'_>) -> Vec<Issue> {
        let mut occupied: HashMap<(u32, LaneId), TargetId> = HashMap::new();
        let mut issues = Vec::new();

        for entry in &context.entries {
            let first_target = *occupied
                .entry((entry.round, entry.lane_id))
                .or_insert(entry.target_id);
            if first_target != entry.target_id {
                issues.push(
                    Issue::new(
                        self.name(),
                        format!(
                            "Lane {} already hosts target #{} in round {}",
                            entry.lane_label(),
                            first_target,
                            entry.round
                        ),
                    )
                    .with("round", entry.round)
                    .with("lane_id", entry.lane_id)
                    .with("target_id", entry.target_id)
                    .with("existing_target_id", first_target)
                    .at_row(entry.row),
                );
            }
        }
        issues
    }
}

/// A lane keeps the same target in every round.
pub struct LaneConsistencyRule;

impl ValidationRule for LaneConsistencyRule {
    fn name(&self) -> &'static str {
        "Lane Consistency"
    }

    fn validate(&self, context: &ValidationContext<'_>) -> Vec<Issue> {
        let mut by_lane: BTreeMap<LaneId, BTreeSet<(u32, TargetId)>> = BTreeMap::new();
        for entry in &context.entries {
            by_lane
                .entry(entry.lane_id)
                .or_default()
                .insert((entry.round, entry.target_id));
        }

        let mut issues = Vec::new();
        for (lane_id, combinations) in by_lane {
            let targets: BTreeSet<TargetId> = combinations.iter().map(|(_, t)| *t).collect();
            if targets.len() < 2 {
                continue;
            }

            let listing = combinations
                .iter()
                .map(|(round, target_id)| format!("round {round}: target #{target_id}"))
                .collect::<Vec<_>>()
                .join(", ");
            let combinations: Vec<_> = combinations
                .iter()
                .map(|(round, target_id)| json!({ "round": round, "target_id": target_id }))
                .collect();

            issues.push(
                Issue::new(
                    self.name(),
                    format!("Lane #{lane_id} hosts different targets across rounds ({listing})"),
                )
                .with("lane_id", lane_id)
                .with("combinations", combinations),
            );
        }
        issues
    }
}
