//! Evaluator for `empty_catch`.
//!
//! An empty catch handler swallows the exception without logging or
//! rethrowing it. Blocks are whitelisted by display name.

use bbpp_core::{Evaluator, Finding, Location, Rule, RuleType, WorkflowData};

/// Flags try/catch blocks with an empty catch handler.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmptyCatch;

impl EmptyCatch {
    /// Creates the evaluator.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Evaluator for EmptyCatch {
    fn rule_type(&self) -> RuleType {
        RuleType::EmptyCatch
    }

    fn description(&self) -> &'static str {
        "Catch handlers must handle, log or rethrow the exception"
    }

    fn evaluate(&self, rule: &Rule, workflow: &WorkflowData) -> Vec<Finding> {
        let mut findings = Vec::new();
        for (index, block) in workflow.try_catch_blocks.iter().enumerate() {
            if !block.catch_empty {
                continue;
            }
            let name = block.display_name.as_deref().unwrap_or_default();
            if !name.is_empty() && rule.is_exempt(name) {
                continue;
            }

            let message = if name.is_empty() {
                "Try/catch block has an empty catch handler".to_string()
            } else {
                format!("Try/catch block `{name}` has an empty catch handler")
            };
            findings.push(
                Finding::new(
                    rule,
                    Location::element(workflow.path(), "try_catch", name, index),
                    message,
                )
                .with_detail("name", name),
            );
        }
        findings
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bbpp_core::{RuleOptions, TryCatchBlock, WhitelistOptions};

    fn block(name: Option<&str>, catch_empty: bool) -> TryCatchBlock {
        TryCatchBlock {
            display_name: name.map(ToString::to_string),
            catch_empty,
        }
    }

    fn rule(exceptions: &[&str]) -> Rule {
        Rule::new("ERR-001", "Empty catch", "error_handling")
            .with_options(RuleOptions::EmptyCatch(WhitelistOptions {
                exceptions: exceptions.iter().map(ToString::to_string).collect(),
            }))
    }

    fn workflow() -> WorkflowData {
        let mut workflow = WorkflowData::new("Main.xaml");
        workflow.try_catch_blocks = vec![
            block(Some("Try Login"), true),
            block(Some("Try Download"), false),
            block(None, true),
        ];
        workflow
    }

    #[test]
    fn test_detects_empty_catch() {
        let findings = EmptyCatch.evaluate(&rule(&[]), &workflow());
        assert_eq!(findings.len(), 2);
        assert!(findings[0].message.contains("Try Login"));
        assert_eq!(
            findings[1].location,
            Location::element("Main.xaml", "try_catch", "", 2)
        );
    }

    #[test]
    fn test_whitelisted_block_is_skipped() {
        let findings = EmptyCatch.evaluate(&rule(&["Try Login"]), &workflow());
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].details["name"], "");
    }
}
