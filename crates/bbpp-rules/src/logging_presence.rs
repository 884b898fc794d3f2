//! Evaluator for `logging_presence`.
//!
//! Workflows listed in `exceptions` by file name or path are not checked.

use bbpp_core::{
    Evaluator, Finding, Location, LoggingPresenceOptions, Rule, RuleOptions, RuleType,
    WorkflowData,
};
use std::borrow::Cow;
use tracing::debug;

/// Requires a minimum number of log messages once a workflow is large enough.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingPresence;

impl LoggingPresence {
    /// Creates the evaluator.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

fn options(rule: &Rule) -> Cow<'_, LoggingPresenceOptions> {
    match &rule.options {
        RuleOptions::LoggingPresence(o) => Cow::Borrowed(o),
        _ => Cow::Owned(LoggingPresenceOptions::default()),
    }
}

impl Evaluator for LoggingPresence {
    fn rule_type(&self) -> RuleType {
        RuleType::LoggingPresence
    }

    fn description(&self) -> &'static str {
        "Workflows emit log messages"
    }

    fn evaluate(&self, rule: &Rule, workflow: &WorkflowData) -> Vec<Finding> {
        if rule.is_exempt_file(workflow.path()) {
            debug!("{}: {} is whitelisted", rule.id, workflow.path().display());
            return Vec::new();
        }
        let options = options(rule);
        if workflow.activity_count < options.min_activities
            || workflow.log_message_count >= options.min_log_messages
        {
            return Vec::new();
        }

        vec![Finding::new(
            rule,
            Location::file(workflow.path()),
            format!(
                "Workflow has {} log message(s), expected at least {}",
                workflow.log_message_count, options.min_log_messages
            ),
        )
        .with_detail("log_message_count", workflow.log_message_count)
        .with_detail("min_log_messages", options.min_log_messages)
        .with_detail("activity_count", workflow.activity_count)]
    }
}
