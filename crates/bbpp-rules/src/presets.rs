//! Default registry and the built-in Master rule set.

use crate::{
    ActivityDefaultName, ArgumentDescription, ArgumentPrefix, CommentRatio, EmptyCatch,
    LoggingPresence, VariableNaming, WorkflowSize,
};
use bbpp_core::{
    ArgumentDescriptionOptions, ArgumentPrefixOptions, CommentRatioOptions, EvaluatorBox,
    EvaluatorRegistry, LoggingPresenceOptions, NamingConvention, NamingOptions, Rule,
    RuleOptions, RuleSet, Severity, WhitelistOptions, WorkflowSizeOptions, MASTER_SET_NAME,
};

/// Returns one instance of every built-in evaluator.
#[must_use]
pub fn all_evaluators() -> Vec<EvaluatorBox> {
    vec![
        Box::new(VariableNaming::new()),
        Box::new(ArgumentPrefix::new()),
        Box::new(ArgumentDescription::new()),
        Box::new(EmptyCatch::new()),
        Box::new(CommentRatio::new()),
        Box::new(LoggingPresence::new()),
        Box::new(ActivityDefaultName::new()),
        Box::new(WorkflowSize::new()),
    ]
}

/// Returns a registry holding every built-in evaluator.
#[must_use]
pub fn default_registry() -> EvaluatorRegistry {
    let mut registry = EvaluatorRegistry::new();
    for evaluator in all_evaluators() {
        registry.register(evaluator);
    }
    registry
}

fn rule(
    id: &str,
    name: &str,
    category: &str,
    description: &str,
    severity: Severity,
    penalty: u32,
    options: RuleOptions,
) -> Rule {
    let mut rule = Rule::new(id, name, category)
        .with_severity(severity)
        .with_penalty(penalty)
        .with_options(options);
    rule.description = description.to_string();
    rule.sets = vec![MASTER_SET_NAME.to_string()];
    rule
}

/// Returns the built-in Master rule set.
///
/// Covers every built-in rule type. `NAMING-002` (PascalCase variables) is
/// shipped disabled as the alternative to `NAMING-001`.
#[must_use]
pub fn master_rule_set() -> RuleSet {
    let mut set = RuleSet::new(MASTER_SET_NAME);
    set.metadata.description = "Built-in best-practice rules".to_string();
    set.metadata.version = "1.0.0".to_string();
    set.metadata.author = "bbpp".to_string();

    set.rules = vec![
        rule(
            "NAMING-001",
            "Variables use camelCase",
            "naming",
            "Variable names start lowercase and contain no separators",
            Severity::Warning,
            2,
            RuleOptions::VariableNaming(NamingOptions::default()),
        ),
        rule(
            "NAMING-002",
            "Variables use PascalCase",
            "naming",
            "Variable names start uppercase and contain no separators",
            Severity::Warning,
            2,
            RuleOptions::VariableNaming(NamingOptions {
                convention: NamingConvention::PascalCase,
                exceptions: Vec::new(),
            }),
        )
        .enabled(false),
        rule(
            "NAMING-003",
            "Arguments carry a direction prefix",
            "naming",
            "Arguments start with in_, out_ or io_ followed by a PascalCase name",
            Severity::Warning,
            2,
            RuleOptions::ArgumentPrefix(ArgumentPrefixOptions::default()),
        ),
        rule(
            "NAMING-004",
            "Activities are renamed",
            "naming",
            "Activities do not keep the display name of their type",
            Severity::Info,
            1,
            RuleOptions::ActivityDefaultName(WhitelistOptions::default()),
        ),
        rule(
            "DOC-001",
            "Arguments are described",
            "documentation",
            "Every argument has a non-blank annotation",
            Severity::Info,
            1,
            RuleOptions::ArgumentDescription(ArgumentDescriptionOptions::default()),
        ),
        rule(
            "DOC-002",
            "Workflows are commented",
            "documentation",
            "At least 5% of the lines of a workflow are comments",
            Severity::Info,
            1,
            RuleOptions::CommentRatio(CommentRatioOptions::default()),
        ),
        rule(
            "ERR-001",
            "No empty catch",
            "error_handling",
            "Catch handlers log, handle or rethrow the exception",
            Severity::Error,
            5,
            RuleOptions::EmptyCatch(WhitelistOptions::default()),
        ),
        rule(
            "LOG-001",
            "Workflows log",
            "logging",
            "Every workflow emits at least one log message",
            Severity::Warning,
            2,
            RuleOptions::LoggingPresence(LoggingPresenceOptions::default()),
        ),
        rule(
            "STRUCT-001",
            "Workflows stay small",
            "structure",
            "Workflows have at most 100 activities",
            Severity::Warning,
            3,
            RuleOptions::WorkflowSize(WorkflowSizeOptions::default()),
        ),
    ];
    set
}
