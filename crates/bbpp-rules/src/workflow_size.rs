//! Evaluator for `workflow_size`.
//!
//! Workflows listed in `exceptions` by file name or path are not checked.

use bbpp_core::{
    Evaluator, Finding, Location, Rule, RuleOptions, RuleType, WorkflowData, WorkflowSizeOptions,
};
use tracing::debug;

/// Flags workflows with more activities than allowed.
#[derive(Debug, Clone, Copy, Default)]
pub struct WorkflowSize;

impl WorkflowSize {
    /// Creates the evaluator.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Evaluator for WorkflowSize {
    fn rule_type(&self) -> RuleType {
        RuleType::WorkflowSize
    }

    fn description(&self) -> &'static str {
        "Workflows stay small enough to review"
    }

    fn evaluate(&self, rule: &Rule, workflow: &WorkflowData) -> Vec<Finding> {
        if rule.is_exempt_file(workflow.path()) {
            debug!("{}: {} is whitelisted", rule.id, workflow.path().display());
            return Vec::new();
        }
        let max = match &rule.options {
            RuleOptions::WorkflowSize(o) => o.max_activities,
            _ => WorkflowSizeOptions::default().max_activities,
        };
        if workflow.activity_count <= max {
            return Vec::new();
        }

        vec![Finding::new(
            rule,
            Location::file(workflow.path()),
            format!(
                "Workflow has {} activities, more than the allowed {max}",
                workflow.activity_count
            ),
        )
        .with_detail("activity_count", workflow.activity_count)
        .with_detail("max_activities", max)
        .with_detail("suggestion", "split into smaller invoked workflows")]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rule(max_activities: u32) -> Rule {
        Rule::new("SIZE-001", "Workflow size", "structure").with_options(
            RuleOptions::WorkflowSize(WorkflowSizeOptions {
                max_activities,
                ..WorkflowSizeOptions::default()
            }),
        )
    }

    fn workflow(activity_count: u32) -> WorkflowData {
        WorkflowData {
            activity_count,
            ..WorkflowData::new("Main.xaml")
        }
    }

    #[test]
    fn test_limit_is_inclusive() {
        assert!(WorkflowSize.evaluate(&rule(10), &workflow(10)).is_empty());
        let findings = WorkflowSize.evaluate(&rule(10), &workflow(11));
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].details["max_activities"], 10);
    }

    #[test]
    fn test_whitelist_matches_full_path() {
        let rule = Rule::new("SIZE-001", "Workflow size", "structure").with_options(
            RuleOptions::WorkflowSize(WorkflowSizeOptions {
                max_activities: 1,
                exceptions: vec!["legacy/Main.xaml".to_string()],
            }),
        );
        let mut data = workflow(5);
        data.file_path = "legacy/Main.xaml".into();
        assert!(WorkflowSize.evaluate(&rule, &data).is_empty());
        assert_eq!(WorkflowSize.evaluate(&rule, &workflow(5)).len(), 1);
    }
}
