//! Evaluator for `variable_naming`.
//!
//! # Detected Patterns
//!
//! - Variables whose name does not follow the rule's `convention`
//!
//! Two rules of this type with different conventions can both be enabled;
//! each reports independently.

use bbpp_core::{
    Evaluator, Finding, Location, NamingOptions, Rule, RuleOptions, RuleType, WorkflowData,
};
use std::borrow::Cow;
use tracing::debug;

/// Checks variable names against a case convention.
#[derive(Debug, Clone, Copy, Default)]
pub struct VariableNaming;

impl VariableNaming {
    /// Creates the evaluator.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

fn options(rule: &Rule) -> Cow<'_, NamingOptions> {
    match &rule.options {
        RuleOptions::VariableNaming(o) => Cow::Borrowed(o),
        _ => Cow::Owned(NamingOptions::default()),
    }
}

impl Evaluator for VariableNaming {
    fn rule_type(&self) -> RuleType {
        RuleType::VariableNaming
    }

    fn description(&self) -> &'static str {
        "Variable names follow the configured case convention"
    }

    fn evaluate(&self, rule: &Rule, workflow: &WorkflowData) -> Vec<Finding> {
        let options = options(rule);
        let convention = options.convention;

        let mut findings = Vec::new();
        for (index, variable) in workflow.variables.iter().enumerate() {
            let name = variable.name.as_str();
            if rule.is_exempt(name) {
                debug!("{}: '{name}' is whitelisted", rule.id);
                continue;
            }
            if convention.matches(name) {
                continue;
            }

            let mut finding = Finding::new(
                rule,
                Location::element(workflow.path(), "variable", name, index),
                format!("Variable `{name}` is not {convention}"),
            )
            .with_detail("name", name)
            .with_detail("convention", convention.to_string());

            let suggestion = convention.apply(name);
            if !suggestion.is_empty() {
                finding = finding.with_detail("suggestion", suggestion);
            }
            findings.push(finding);
        }
        findings
    }
}
