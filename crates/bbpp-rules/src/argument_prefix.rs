//! Evaluator for `argument_prefix`.
//!
//! # Detected Patterns
//!
//! - Arguments missing the prefix of their direction (`in_`, `out_`, `io_`)
//! - Arguments carrying the prefix of another direction
//! - Names whose remainder after the prefix breaks `format_after_prefix`
//!
//! Each argument yields at most one finding. A prefix problem is reported
//! before a format problem. Arguments with a direction that has no prefix
//! convention are ignored.

use bbpp_core::{
    ArgumentPrefixOptions, Evaluator, Finding, Location, Rule, RuleOptions, RuleType,
    WorkflowData,
};
use std::borrow::Cow;
use tracing::debug;

/// Checks argument names for direction prefixes and remainder case.
#[derive(Debug, Clone, Copy, Default)]
pub struct ArgumentPrefix;

impl ArgumentPrefix {
    /// Creates the evaluator.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

fn options(rule: &Rule) -> Cow<'_, ArgumentPrefixOptions> {
    match &rule.options {
        RuleOptions::ArgumentPrefix(o) => Cow::Borrowed(o),
        _ => Cow::Owned(ArgumentPrefixOptions::default()),
    }
}

/// Strips whichever configured prefix `name` starts with, longest first.
fn strip_any_prefix<'a>(name: &'a str, prefixes: &[&str]) -> Option<(&'a str, String)> {
    prefixes
        .iter()
        .filter(|p| !p.is_empty())
        .find_map(|p| name.strip_prefix(p).map(|rest| (rest, (*p).to_string())))
}

impl Evaluator for ArgumentPrefix {
    fn rule_type(&self) -> RuleType {
        RuleType::ArgumentPrefix
    }

    fn description(&self) -> &'static str {
        "Arguments carry their direction prefix followed by a well-cased name"
    }

    fn evaluate(&self, rule: &Rule, workflow: &WorkflowData) -> Vec<Finding> {
        let options = options(rule);
        let known = options.prefixes.all();
        let convention = options.format_after_prefix;

        let mut findings = Vec::new();
        for (index, argument) in workflow.arguments.iter().enumerate() {
            let name = argument.name.as_str();
            if rule.is_exempt(name) {
                debug!("{}: '{name}' is whitelisted", rule.id);
                continue;
            }
            let Some(expected) = options.prefixes.for_direction(argument.direction) else {
                continue;
            };
            let location = || Location::element(workflow.path(), "argument", name, index);

            if options.check_prefixes && !name.starts_with(expected) {
                let (bare, found) = match strip_any_prefix(name, &known) {
                    Some((rest, found)) => (rest, Some(found)),
                    None => (name, None),
                };
                let message = match &found {
                    Some(found) => format!(
                        "{} argument `{name}` uses prefix `{found}` instead of `{expected}`",
                        argument.direction
                    ),
                    None => format!(
                        "{} argument `{name}` is missing prefix `{expected}`",
                        argument.direction
                    ),
                };
                let kind = if found.is_some() {
                    "wrong_prefix"
                } else {
                    "missing_prefix"
                };
                findings.push(
                    Finding::new(rule, location(), message)
                        .with_detail("name", name)
                        .with_detail("direction", argument.direction.to_string())
                        .with_detail("kind", kind)
                        .with_detail("expected_prefix", expected)
                        .with_detail("suggestion", format!("{expected}{}", convention.apply(bare))),
                );
                continue;
            }

            if !options.validate_format_after_prefix {
                continue;
            }
            let (prefix, remainder) = match name.strip_prefix(expected) {
                Some(rest) if !expected.is_empty() => (expected, rest),
                _ => ("", name),
            };
            if convention.matches(remainder) {
                continue;
            }

            let mut finding = Finding::new(
                rule,
                location(),
                format!("Argument `{name}` is not {convention} after its prefix"),
            )
            .with_detail("name", name)
            .with_detail("direction", argument.direction.to_string())
            .with_detail("kind", "invalid_format")
            .with_detail("format", convention.to_string());

            let converted = convention.apply(remainder);
            if !converted.is_empty() {
                finding = finding.with_detail("suggestion", format!("{prefix}{converted}"));
            }
            findings.push(finding);
        }
        findings
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bbpp_core::{Argument, ArgumentDirection, NamingConvention};

    fn rule(options: ArgumentPrefixOptions) -> Rule {
        Rule::new("ARG-001", "Argument prefix", "naming")
            .with_options(RuleOptions::ArgumentPrefix(options))
    }

    fn workflow(args: &[(&str, ArgumentDirection)]) -> WorkflowData {
        args.iter().fold(WorkflowData::new("Main.xaml"), |w, (name, dir)| {
            w.with_argument(Argument::new(*name, *dir))
        })
    }

    fn kinds(findings: &[Finding]) -> Vec<&str> {
        findings
            .iter()
            .map(|f| f.details["kind"].as_str().unwrap_or_default())
            .collect()
    }

    #[test]
    fn test_accepts_well_formed_arguments() {
        let wf = workflow(&[
            ("in_Config", ArgumentDirection::In),
            ("out_Result", ArgumentDirection::Out),
            ("io_Queue", ArgumentDirection::InOut),
        ]);
        assert!(ArgumentPrefix
            .evaluate(&rule(ArgumentPrefixOptions::default()), &wf)
            .is_empty());
    }

    #[test]
    fn test_detects_missing_prefix() {
        let wf = workflow(&[("config", ArgumentDirection::In)]);
        let findings = ArgumentPrefix.evaluate(&rule(ArgumentPrefixOptions::default()), &wf);
        assert_eq!(kinds(&findings), ["missing_prefix"]);
        assert_eq!(findings[0].suggestion(), Some("in_Config"));
    }

    #[test]
    fn test_detects_wrong_prefix() {
        let wf = workflow(&[("in_Result", ArgumentDirection::Out)]);
        let findings = ArgumentPrefix.evaluate(&rule(ArgumentPrefixOptions::default()), &wf);
        assert_eq!(kinds(&findings), ["wrong_prefix"]);
        assert_eq!(findings[0].suggestion(), Some("out_Result"));
    }

    #[test]
    fn test_detects_format_after_prefix() {
        let options = ArgumentPrefixOptions {
            format_after_prefix: NamingConvention::CamelCase,
            ..ArgumentPrefixOptions::default()
        };
        let wf = workflow(&[
            ("in_myArgument", ArgumentDirection::In),
            ("in_MyArgument", ArgumentDirection::In),
            ("myArgument", ArgumentDirection::In),
        ]);
        let findings = ArgumentPrefix.evaluate(&rule(options), &wf);
        assert_eq!(kinds(&findings), ["invalid_format", "missing_prefix"]);
        assert_eq!(findings[0].suggestion(), Some("in_myArgument"));
        assert_eq!(findings[1].suggestion(), Some("in_myArgument"));
    }

    #[test]
    fn test_prefix_check_can_be_disabled() {
        let options = ArgumentPrefixOptions {
            check_prefixes: false,
            ..ArgumentPrefixOptions::default()
        };
        let wf = workflow(&[("Config", ArgumentDirection::In), ("bad", ArgumentDirection::In)]);
        let findings = ArgumentPrefix.evaluate(&rule(options), &wf);
        assert_eq!(kinds(&findings), ["invalid_format"]);
        assert_eq!(findings[0].suggestion(), Some("Bad"));
    }

    #[test]
    fn test_ignores_other_directions_and_exceptions() {
        let options = ArgumentPrefixOptions {
            exceptions: vec!["legacyArg".to_string()],
            ..ArgumentPrefixOptions::default()
        };
        let wf = workflow(&[
            ("whatever", ArgumentDirection::Other),
            ("legacyArg", ArgumentDirection::In),
        ]);
        assert!(ArgumentPrefix.evaluate(&rule(options), &wf).is_empty());
    }
}
