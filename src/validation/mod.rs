//! Validation rules for assignment sets.
//!
//! Rules are independent and pure. The engine runs all of them and
//! concatenates their issues; an empty result means the set is valid.
//!
//! - `references`: round and id resolution per row
//! - `stakes`: stake distances against the ruleset table and lane maximum
//! - `uniqueness`: target/lane identity within and across rounds
//! - `counts`: target count and group balance

pub mod context;
pub mod counts;
pub mod issue;
pub mod references;
pub mod stakes;
pub mod uniqueness;

#[cfg(test)]
mod test_support;

pub use context::{ValidationContext, ValidationEntry};
pub use counts::{TargetCountRule, TargetGroupBalanceRule};
pub use issue::{Issue, ValidationResult};
pub use references::AssignmentRule;
pub use stakes::StakeDistanceRule;
pub use uniqueness::{LaneConsistencyRule, LaneUniquenessRule, TargetUniquenessRule};

/// A single independent check.
pub trait ValidationRule: Send + Sync {
    /// Rule name reported with every issue.
    fn name(&self) -> &'static str;

    fn validate(&self, context: &ValidationContext<'_>) -> Vec<Issue>;
}

/// Runs every registered rule over a context.
pub struct ValidationEngine {
    rules: Vec<Box<dyn ValidationRule>>,
}

impl ValidationEngine {
    pub fn standard() -> Self {
        Self::with_rules(vec![
            Box::new(AssignmentRule),
            Box::new(StakeDistanceRule),
            Box::new(TargetUniquenessRule),
            Box::new(LaneUniquenessRule),
            Box::new(LaneConsistencyRule),
            Box::new(TargetCountRule),
            Box::new(TargetGroupBalanceRule),
        ])
    }

    pub fn with_rules(rules: Vec<Box<dyn ValidationRule>>) -> Self {
        Self { rules }
    }

    pub fn rule_names(&self) -> Vec<&'static str> {
        self.rules.iter().map(|r| r.name()).collect()
    }

    /// Collect the issues of every rule. Never fails.
    pub fn validate(&self, context: &ValidationContext<'_>) -> ValidationResult {
        let issues: Vec<Issue> = self
            .rules
            .iter()
            .flat_map(|rule| rule.validate(context))
            .collect();

        if issues.is_empty() {
            log::debug!("{} entries passed validation", context.entries.len());
        } else {
            log::debug!(
                "{} issue(s) in {} entries",
                issues.len(),
                context.entries.len()
            );
        }
        ValidationResult::new(issues)
    }
}

impl Default for ValidationEngine {
    fn default() -> Self {
        Self::standard()
    }
}
