//! Evaluator for `argument_description`.

use bbpp_core::{
    ArgumentDescriptionOptions, Evaluator, Finding, Location, Rule, RuleOptions, RuleType,
    WorkflowData,
};
use std::borrow::Cow;

/// Requires an annotation on arguments of the targeted directions.
#[derive(Debug, Clone, Copy, Default)]
pub struct ArgumentDescription;

impl ArgumentDescription {
    /// Creates the evaluator.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

fn options(rule: &Rule) -> Cow<'_, ArgumentDescriptionOptions> {
    match &rule.options {
        RuleOptions::ArgumentDescription(o) => Cow::Borrowed(o),
        _ => Cow::Owned(ArgumentDescriptionOptions::default()),
    }
}

impl Evaluator for ArgumentDescription {
    fn rule_type(&self) -> RuleType {
        RuleType::ArgumentDescription
    }

    fn description(&self) -> &'static str {
        "Arguments have a non-blank annotation"
    }

    fn evaluate(&self, rule: &Rule, workflow: &WorkflowData) -> Vec<Finding> {
        let options = options(rule);

        workflow
            .arguments
            .iter()
            .enumerate()
            .filter(|(_, a)| options.directions.contains(&a.direction))
            .filter(|(_, a)| a.is_undocumented() && !rule.is_exempt(&a.name))
            .map(|(index, argument)| {
                Finding::new(
                    rule,
                    Location::element(workflow.path(), "argument", &argument.name, index),
                    format!(
                        "{} argument `{}` has no description",
                        argument.direction, argument.name
                    ),
                )
                .with_detail("name", argument.name.as_str())
                .with_detail("direction", argument.direction.to_string())
            })
            .collect()
    }
}
