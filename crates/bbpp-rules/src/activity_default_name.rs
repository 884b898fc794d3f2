//! Evaluator for `activity_default_name`.
//!
//! # Detected Patterns
//!
//! - Activities with a blank display name
//! - Activities still named after their type (`Assign`, `Log Message`, ...)
//!
//! The designer inserts spaces into multi-word type names, so `LogMessage`
//! and `Log Message` are treated as the same default.

use bbpp_core::{Evaluator, Finding, Location, Rule, RuleType, WorkflowData};

/// Flags activities that keep their default display name.
#[derive(Debug, Clone, Copy, Default)]
pub struct ActivityDefaultName;

impl ActivityDefaultName {
    /// Creates the evaluator.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

fn squash(name: &str) -> String {
    name.chars().filter(|c| !c.is_whitespace()).collect()
}

fn is_default_name(display_name: &str, activity_type: &str) -> bool {
    let display = squash(display_name);
    display.is_empty() || (!activity_type.is_empty() && display == squash(activity_type))
}

impl Evaluator for ActivityDefaultName {
    fn rule_type(&self) -> RuleType {
        RuleType::ActivityDefaultName
    }

    fn description(&self) -> &'static str {
        "Activities have a descriptive display name"
    }

    fn evaluate(&self, rule: &Rule, workflow: &WorkflowData) -> Vec<Finding> {
        workflow
            .activities
            .iter()
            .enumerate()
            .filter(|(_, a)| is_default_name(&a.display_name, &a.activity_type))
            .filter(|(_, a)| !rule.is_exempt(&a.display_name) && !rule.is_exempt(&a.activity_type))
            .map(|(index, activity)| {
                let message = if activity.display_name.trim().is_empty() {
                    format!("{} activity has no display name", activity.activity_type)
                } else {
                    format!(
                        "{} activity keeps its default name `{}`",
                        activity.activity_type, activity.display_name
                    )
                };
                Finding::new(
                    rule,
                    Location::element(
                        workflow.path(),
                        "activity",
                        activity.display_name.as_str(),
                        index,
                    ),
                    message,
                )
                .with_detail("name", activity.display_name.as_str())
                .with_detail("activity_type", activity.activity_type.as_str())
            })
            .collect()
    }
}
