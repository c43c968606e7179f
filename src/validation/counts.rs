// src/validation/counts.rs

//! Rules over the assignment set as a whole.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use crate::models::TargetType;

use super::{Issue, ValidationContext, ValidationRule};

/// The number of assignments equals the declared target count.
pub struct TargetCountRule;

impl ValidationRule for TargetCountRule {
    fn name(&self) -> &'static str {
        "Target Count"
    }

    fn validate(&self, context: &ValidationContext<'_>) -> Vec<Issue> {
        let expected = context.expected_target_count as usize;
        let actual = context.entries.len();

        let message = match actual.cmp(&expected) {
            Ordering::Equal => return Vec::new(),
            Ordering::Less => format!("Too few assignments: expected {expected}, found {actual}"),
            Ordering::Greater => {
                format!("Too many assignments: expected {expected}, found {actual}")
            }
        };
        vec![
            Issue::new(self.name(), message)
                .with("expected", expected)
                .with("actual", actual),
        ]
    }
}

/// Every target type gets the same share of the declared total.
///
/// Only checked for rulesets that require balanced groups.
pub struct TargetGroupBalanceRule;

impl ValidationRule for TargetGroupBalanceRule {
    fn name(&self) -> &'static str {
        "Target Group Balance"
    }

    fn validate(&self, context: &ValidationContext<'_>) -> Vec<Issue> {
        let ruleset = context.ruleset;
        if !ruleset.requires_group_balance() {
            return Vec::new();
        }

        let types = ruleset.target_types();
        if types.is_empty() {
            return Vec::new();
        }
        let expected_total = context.expected_target_count as usize;
        if expected_total % types.len() != 0 {
            return vec![
                Issue::new(
                    self.name(),
                    format!(
                        "{} targets cannot be split evenly across {} target types",
                        expected_total,
                        types.len()
                    ),
                )
                .with("expected", expected_total)
                .with("type_count", types.len()),
            ];
        }
        let per_type = expected_total / types.len();

        let mut counts: BTreeMap<TargetType, usize> = BTreeMap::new();
        for target in context.entries.iter().filter_map(|entry| entry.target) {
            *counts.entry(target.target_type).or_default() += 1;
        }

        types
            .into_iter()
            .filter_map(|target_type| {
                let actual = counts.get(&target_type).copied().unwrap_or(0);
                (actual != per_type).then(|| {
                    Issue::new(
                        self.name(),
                        format!("{target_type} has {actual} assignments, expected {per_type}"),
                    )
                    .with("target_type", target_type.as_str())
                    .with("expected", per_type)
                    .with("actual", actual)
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Ruleset;
    use crate::validation::test_support::{balanced_rounds, draft, ground};

    #[test]
    fn test_too_few_and_too_many_differ() {
        let ground = ground();
        let rows = balanced_rounds(1);

        let fewer = ValidationContext::from_draft(Ruleset::Dsb3d, 5, &ground, &rows);
        let issues = TargetCountRule.validate(&fewer);
        assert_eq!(issues.len(), 1);
        assert!(issues[0].message.starts_with("Too few"));
        assert_eq!(issues[0].context["expected"], 5);
        assert_eq!(issues[0].context["actual"], 4);

        let more = ValidationContext::from_draft(Ruleset::Dsb3d, 3, &ground, &rows);
        let issues = TargetCountRule.validate(&more);
        assert!(issues[0].message.starts_with("Too many"));

        let exact = ValidationContext::from_draft(Ruleset::Dsb3d, 4, &ground, &rows);
        assert!(TargetCountRule.validate(&exact).is_empty());
    }

    #[test]
    fn test_total_not_divisible_by_type_count() {
        let ground = ground();
        let rows = balanced_rounds(1);
        let context = ValidationContext::from_draft(Ruleset::Dsb3d, 6, &ground, &rows);

        let issues = TargetGroupBalanceRule.validate(&context);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].context["type_count"], 4);
    }

    #[test]
    fn test_each_unbalanced_type_is_reported() {
        let ground = ground();
        // group 1 twice, group 4 missing
        let rows = vec![draft(1, 1, 1), draft(1, 2, 2), draft(1, 3, 3), draft(1, 4, 5)];
        let context = ValidationContext::from_draft(Ruleset::Dsb3d, 4, &ground, &rows);

        let issues = TargetGroupBalanceRule.validate(&context);
        let types: Vec<&str> = issues
            .iter()
            .filter_map(|i| i.context["target_type"].as_str())
            .collect();
        assert_eq!(types, vec!["ANIMAL_GROUP_1", "ANIMAL_GROUP_4"]);
    }

    #[test]
    fn test_balance_not_required_for_wa() {
        let ground = ground();
        let rows = vec![draft(1, 1, 1), draft(1, 2, 5)];
        let context = ValidationContext::from_draft(Ruleset::Wa3d, 2, &ground, &rows);

        assert!(TargetGroupBalanceRule.validate(&context).is_empty());
    }
}
