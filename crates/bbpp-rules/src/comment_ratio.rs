//! Evaluator for `comment_ratio`.
//!
//! The ratio is commented lines over total lines. Workflows without lines
//! are not checked, and neither are workflows whose file name or path is
//! listed in `exceptions`.

use bbpp_core::{
    CommentRatioOptions, Evaluator, Finding, Location, Rule, RuleOptions, RuleType, WorkflowData,
};
use std::borrow::Cow;
use tracing::debug;

/// Keeps the comment ratio of a workflow within bounds.
#[derive(Debug, Clone, Copy, Default)]
pub struct CommentRatio;

impl CommentRatio {
    /// Creates the evaluator.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

fn options(rule: &Rule) -> Cow<'_, CommentRatioOptions> {
    match &rule.options {
        RuleOptions::CommentRatio(o) => Cow::Borrowed(o),
        _ => Cow::Owned(CommentRatioOptions::default()),
    }
}

fn percent(ratio: f64) -> String {
    format!("{:.1}%", ratio * 100.0)
}

impl Evaluator for CommentRatio {
    fn rule_type(&self) -> RuleType {
        RuleType::CommentRatio
    }

    fn description(&self) -> &'static str {
        "Commented lines stay within the configured ratio"
    }

    fn evaluate(&self, rule: &Rule, workflow: &WorkflowData) -> Vec<Finding> {
        let Some(ratio) = workflow.comment_ratio() else {
            return Vec::new();
        };
        if rule.is_exempt_file(workflow.path()) {
            debug!("{}: {} is whitelisted", rule.id, workflow.path().display());
            return Vec::new();
        }
        let options = options(rule);

        let (bound, limit, message) = match (options.min_ratio, options.max_ratio) {
            (Some(min), _) if ratio < min => (
                "min_ratio",
                min,
                format!(
                    "Comment ratio {} is below the minimum {}",
                    percent(ratio),
                    percent(min)
                ),
            ),
            (_, Some(max)) if ratio > max => (
                "max_ratio",
                max,
                format!(
                    "Comment ratio {} is above the maximum {}",
                    percent(ratio),
                    percent(max)
                ),
            ),
            _ => return Vec::new(),
        };

        vec![Finding::new(rule, Location::file(workflow.path()), message)
            .with_detail("ratio", ratio)
            .with_detail(bound, limit)
            .with_detail("commented_lines", workflow.commented_lines)
            .with_detail("total_lines", workflow.total_lines)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rule(min_ratio: Option<f64>, max_ratio: Option<f64>) -> Rule {
        Rule::new("DOC-001", "Comment ratio", "documentation").with_options(
            RuleOptions::CommentRatio(CommentRatioOptions {
                min_ratio,
                max_ratio,
                ..CommentRatioOptions::default()
            }),
        )
    }

    fn workflow(commented: u32, total: u32) -> WorkflowData {
        WorkflowData {
            commented_lines: commented,
            total_lines: total,
            ..WorkflowData::new("Main.xaml")
        }
    }

    #[test]
    fn test_below_minimum() {
        let findings = CommentRatio.evaluate(&rule(Some(0.1), None), &workflow(2, 100));
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].location, Location::file("Main.xaml"));
        assert_eq!(findings[0].details["min_ratio"], 0.1);
        assert!(findings[0].message.contains("2.0%"));
    }

    #[test]
    fn test_above_maximum() {
        let findings = CommentRatio.evaluate(&rule(None, Some(0.5)), &workflow(80, 100));
        assert_eq!(findings.len(), 1);
        assert!(findings[0].details.contains_key("max_ratio"));
    }

    #[test]
    fn test_within_bounds() {
        assert!(CommentRatio
            .evaluate(&rule(Some(0.05), Some(0.5)), &workflow(10, 100))
            .is_empty());
    }

    #[test]
    fn test_whitelisted_workflow_is_skipped() {
        let rule = Rule::new("DOC-001", "Comment ratio", "documentation").with_options(
            RuleOptions::CommentRatio(CommentRatioOptions {
                exceptions: vec!["Main.xaml".to_string()],
                ..CommentRatioOptions::default()
            }),
        );
        let mut data = workflow(0, 100);
        data.file_path = "project/flows/Main.xaml".into();
        assert!(CommentRatio.evaluate(&rule, &data).is_empty());

        data.file_path = "project/flows/Other.xaml".into();
        assert_eq!(CommentRatio.evaluate(&rule, &data).len(), 1);
    }

    #[test]
    fn test_empty_workflow_is_skipped() {
        assert!(CommentRatio
            .evaluate(&rule(Some(0.5), None), &workflow(0, 0))
            .is_empty());
    }
}
