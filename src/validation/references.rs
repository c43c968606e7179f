// src/validation/references.rs

use super::{Issue, ValidationContext, ValidationRule};

/// Every row needs a positive round and resolvable lane and target ids.
pub struct AssignmentRule;

impl ValidationRule for AssignmentRule {
    fn name(&self) -> &'static str {
        "Assignment"
    }

    fn validate(&self, context: &ValidationContext<'_>) -> Vec<Issue> {
        let mut issues = Vec::new();
        for entry in &context.entries {
            if entry.round == 0 {
                issues.push(
                    Issue::new(self.name(), "Round must be greater than zero")
                        .with("round", entry.round)
                        .at_row(entry.row),
                );
            }
            if entry.lane.is_none() {
                issues.push(
                    Issue::new(
                        self.name(),
                        format!("Lane {} does not exist on this ground", entry.lane_id),
                    )
                    .with("lane_id", entry.lane_id)
                    .at_row(entry.row),
                );
            }
            if entry.target.is_none() {
                issues.push(
                    Issue::new(
                        self.name(),
                        format!("Target {} does not exist on this ground", entry.target_id),
                    )
                    .with("target_id", entry.target_id)
                    .at_row(entry.row),
                );
            }
        }
        issues
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Ruleset;
    use crate::validation::test_support::{draft, ground};

    #[test]
    fn test_each_broken_reference_is_reported() {
        let ground = ground();
        let rows = vec![draft(1, 1, 1), draft(0, 7, 2), draft(1, 3, 42)];
        let context = ValidationContext::from_draft(Ruleset::Dsb3d, 3, &ground, &rows);

        let issues = AssignmentRule.validate(&context);

        assert_eq!(issues.len(), 3);
        assert_eq!(issues[0].row, Some(2));
        assert_eq!(issues[0].message, "Round must be greater than zero");
        assert_eq!(issues[1].context["lane_id"], 7);
        assert_eq!(issues[2].row, Some(3));
        assert_eq!(issues[2].context["target_id"], 42);
    }

    #[test]
    fn test_resolved_rows_pass() {
        let ground = ground();
        let rows = vec![draft(1, 1, 1), draft(2, 4, 4)];
        let context = ValidationContext::from_draft(Ruleset::Wa3d, 2, &ground, &rows);

        assert!(AssignmentRule.validate(&context).is_empty());
    }
}
