// src/validation/stakes.rs

use crate::models::{Ruleset, StakeRange};

use super::{Issue, ValidationContext, ValidationEntry, ValidationRule};

/// Stake distances must match the ruleset table and fit on the lane.
///
/// Rows without a resolved target are left to the reference check.
pub struct StakeDistanceRule;

impl ValidationRule for StakeDistanceRule {
    fn name(&self) -> &'static str {
        "Stake Distance"
    }

    fn validate(&self, context: &ValidationContext<'_>) -> Vec<Issue> {
        let ruleset = context.ruleset;
        let mut issues = Vec::new();
        for entry in &context.entries {
            if let Some(target) = entry.target {
                let ranges = ruleset.stakes(target.target_type);
                issues.extend(self.entry_issues(ruleset, entry, ranges));
            }
        }
        issues
    }
}

impl StakeDistanceRule {
    /// Check one row with a resolved target against the stake table of its
    /// type. `None` means the ruleset has no table for the type.
    fn entry_issues(
        &self,
        ruleset: Ruleset,
        entry: &ValidationEntry<'_>,
        ranges: Option<&[StakeRange]>,
    ) -> Vec<Issue> {
        let Some(target) = entry.target else {
            return Vec::new();
        };
        let target_type = target.target_type;
        let lane_max = entry.lane.map(|lane| lane.max_distance);

        let Some(ranges) = ranges else {
            return vec![
                Issue::new(
                    self.name(),
                    format!(
                        "Target type {} of target {} is not allowed in {}",
                        target_type,
                        entry.target_label(),
                        ruleset
                    ),
                )
                .with("target_id", target.id)
                .with("target_type", target_type.as_str())
                .at_row(entry.row),
            ];
        };

        let mut issues = Vec::new();
        for range in ranges {
            match entry.stakes.get(&range.stake) {
                None => issues.push(
                    Issue::new(
                        self.name(),
                        format!(
                            "Stake {} is missing for target {}",
                            range.stake,
                            entry.target_label()
                        ),
                    )
                    .with("stake", range.stake.as_str())
                    .with("target_id", target.id)
                    .at_row(entry.row),
                ),
                Some(&distance) if !range.allows(distance, lane_max) => {
                    let max = lane_max.map_or(range.max, |lane_max| range.capped_max(lane_max));
                    issues.push(
                        Issue::new(
                            self.name(),
                            format!(
                                "Stake {} at {} m for target {} on lane {} is outside {}-{} m",
                                range.stake,
                                distance,
                                entry.target_label(),
                                entry.lane_label(),
                                range.min,
                                max
                            ),
                        )
                        .with("stake", range.stake.as_str())
                        .with("distance", distance)
                        .with("min", range.min)
                        .with("max", max)
                        .with("target_id", target.id)
                        .at_row(entry.row),
                    );
                }
                Some(_) => {}
            }
        }

        for stake in entry.stakes.keys() {
            if !ranges.iter().any(|range| range.stake == *stake) {
                issues.push(
                    Issue::new(
                        self.name(),
                        format!(
                            "Stake {} is not defined for {} in {}",
                            stake, target_type, ruleset
                        ),
                    )
                    .with("stake", stake.as_str())
                    .with("target_id", target.id)
                    .at_row(entry.row),
                );
            }
        }
        issues
    }
}
