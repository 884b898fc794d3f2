//! Rule dispatch engine.

use crate::config::Config;
use crate::evaluator::EvaluatorRegistry;
use crate::model::{Rule, RuleType};
use crate::resolver::ActiveSetResolver;
use crate::types::{AnalysisResult, Finding};
use crate::workflow::WorkflowData;

use indexmap::IndexMap;
use thiserror::Error;
use tracing::{debug, info};

/// Errors that can occur while building an analyzer.
#[derive(Debug, Error)]
pub enum AnalyzerError {
    /// Neither explicit rules nor a resolver were supplied.
    #[error("no rule source: supply rules or an active-set resolver")]
    NoRuleSource,

    /// No evaluator registry was supplied.
    #[error("no evaluator registry supplied")]
    NoRegistry,
}

/// Builder for configuring an [`Analyzer`].
#[derive(Default)]
pub struct AnalyzerBuilder {
    rules: Option<Vec<Rule>>,
    resolver: Option<ActiveSetResolver>,
    set_names: Option<Vec<String>>,
    registry: Option<EvaluatorRegistry>,
    config: Option<Config>,
}

impl AnalyzerBuilder {
    /// Creates a new builder with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Uses an explicit effective rule collection.
    #[must_use]
    pub fn rules(mut self, rules: Vec<Rule>) -> Self {
        self.rules = Some(rules);
        self
    }

    /// Adds a single rule to the explicit collection.
    #[must_use]
    pub fn rule(mut self, rule: Rule) -> Self {
        self.rules.get_or_insert_with(Vec::new).push(rule);
        self
    }

    /// Resolves rules from the active sets when no explicit rules are given.
    #[must_use]
    pub fn resolver(mut self, resolver: ActiveSetResolver) -> Self {
        self.resolver = Some(resolver);
        self
    }

    /// Resolves these sets instead of the persisted active selection.
    #[must_use]
    pub fn sets(mut self, set_names: Vec<String>) -> Self {
        self.set_names = Some(set_names);
        self
    }

    /// Sets the evaluator registry.
    #[must_use]
    pub fn registry(mut self, registry: EvaluatorRegistry) -> Self {
        self.registry = Some(registry);
        self
    }

    /// Sets the configuration whose per-rule overrides are applied.
    #[must_use]
    pub fn config(mut self, config: Config) -> Self {
        self.config = Some(config);
        self
    }

    /// Builds the analyzer, snapshotting the effective rules.
    ///
    /// # Errors
    ///
    /// Returns an error if no registry or no rule source was supplied.
    pub fn build(self) -> Result<Analyzer, AnalyzerError> {
        let registry = self.registry.ok_or(AnalyzerError::NoRegistry)?;

        let rules = match (self.rules, self.resolver) {
            (Some(rules), _) => rules,
            (None, Some(resolver)) => resolver.get_effective_rules(self.set_names.as_deref()),
            (None, None) => return Err(AnalyzerError::NoRuleSource),
        };

        let config = self.config.unwrap_or_default();
        let rules = apply_overrides(rules, &config);

        let mut index: IndexMap<RuleType, Vec<Rule>> = IndexMap::new();
        for rule in rules {
            index.entry(rule.rule_type.clone()).or_default().push(rule);
        }

        for rule_type in index.keys() {
            if !registry.contains(rule_type) {
                debug!("No evaluator for rule type '{rule_type}', its rules are inert");
            }
        }

        Ok(Analyzer { index, registry })
    }
}

/// Applies local enable/severity overrides to a rule snapshot.
fn apply_overrides(mut rules: Vec<Rule>, config: &Config) -> Vec<Rule> {
    for rule in &mut rules {
        if let Some(enabled) = config.rule_enabled(&rule.id) {
            rule.enabled = enabled;
        }
        if let Some(severity) = config.rule_severity(&rule.id) {
            rule.severity = severity;
        }
    }
    rules
}

/// Runs registered evaluators for an effective rule collection.
///
/// Use [`Analyzer::builder()`] to construct an instance. The rule collection
/// is a snapshot taken at build time; build a new analyzer to pick up changes
/// to the active selection.
pub struct Analyzer {
    index: IndexMap<RuleType, Vec<Rule>>,
    registry: EvaluatorRegistry,
}

impl Analyzer {
    /// Creates a new builder for configuring an analyzer.
    #[must_use]
    pub fn builder() -> AnalyzerBuilder {
        AnalyzerBuilder::new()
    }

    /// Returns the number of rules in the snapshot, enabled or not.
    #[must_use]
    pub fn rule_count(&self) -> usize {
        self.index.values().map(Vec::len).sum()
    }

    /// Returns the rule types present, in first-appearance order.
    #[must_use]
    pub fn rule_types(&self) -> Vec<&RuleType> {
        self.index.keys().collect()
    }

    /// Iterates over all rules in execution order.
    pub fn rules(&self) -> impl Iterator<Item = &Rule> {
        self.index.values().flatten()
    }

    /// Returns the evaluator registry.
    #[must_use]
    pub fn registry(&self) -> &EvaluatorRegistry {
        &self.registry
    }

    /// Analyzes one workflow.
    ///
    /// Findings are ordered by rule type (first appearance in the rule
    /// collection), then by rule order within the type. Disabled rules and
    /// rules without a registered evaluator produce nothing.
    #[must_use]
    pub fn analyze(&self, workflow: &WorkflowData) -> Vec<Finding> {
        debug!("Analyzing: {}", workflow.path().display());

        let mut findings = Vec::new();
        for (rule_type, rules) in &self.index {
            let Some(evaluator) = self.registry.get(rule_type) else {
                continue;
            };

            for rule in rules {
                if !rule.enabled {
                    debug!("Skipping disabled rule: {}", rule.id);
                    continue;
                }
                findings.extend(evaluator.evaluate(rule, workflow));
            }
        }
        findings
    }

    /// Analyzes several workflows and aggregates the results.
    #[must_use]
    pub fn analyze_all(&self, workflows: &[WorkflowData]) -> AnalysisResult {
        info!(
            "Starting analysis of {} workflow(s) with {} rule(s)",
            workflows.len(),
            self.rule_count()
        );

        let mut result = AnalysisResult::new();
        for workflow in workflows {
            result.findings.extend(self.analyze(workflow));
            result.workflows_checked += 1;
        }

        info!(
            "Analysis complete: {} finding(s) in {} workflow(s)",
            result.findings.len(),
            result.workflows_checked
        );
        result
    }
}

impl std::fmt::Debug for Analyzer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Analyzer")
            .field("rule_types", &self.rule_types())
            .field("rule_count", &self.rule_count())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RuleOverride;
    use crate::evaluator::Evaluator;
    use crate::types::{Location, Severity};

    /// Flags every variable, to observe dispatch order.
    struct EveryVariable;

    impl Evaluator for EveryVariable {
        fn rule_type(&self) -> RuleType {
            RuleType::Custom("every_variable".to_string())
        }

        fn evaluate(&self, rule: &Rule, workflow: &WorkflowData) -> Vec<Finding> {
            workflow
                .variables
                .iter()
                .enumerate()
                .map(|(i, v)| {
                    Finding::new(
                        rule,
                        Location::element(workflow.path(), "variable", &v.name, i),
                        "seen",
                    )
                })
                .collect()
        }
    }

    /// Flags the file once.
    struct Once;

    impl Evaluator for Once {
        fn rule_type(&self) -> RuleType {
            RuleType::Custom("once".to_string())
        }

        fn evaluate(&self, rule: &Rule, workflow: &WorkflowData) -> Vec<Finding> {
            vec![Finding::new(rule, Location::file(workflow.path()), "once")]
        }
    }

    fn registry() -> EvaluatorRegistry {
        EvaluatorRegistry::new().with(EveryVariable).with(Once)
    }

    fn rule(id: &str, rule_type: &str) -> Rule {
        Rule::new(id, id, "test").with_type(RuleType::from(rule_type))
    }

    #[test]
    fn test_builder_requires_source() {
        let result = Analyzer::builder().registry(registry()).build();
        assert!(matches!(result, Err(AnalyzerError::NoRuleSource)));
    }

    #[test]
    fn test_builder_requires_registry() {
        let result = Analyzer::builder().rules(vec![]).build();
        assert!(matches!(result, Err(AnalyzerError::NoRegistry)));
    }

    #[test]
    fn test_findings_follow_index_order() {
        let analyzer = Analyzer::builder()
            .registry(registry())
            .rule(rule("A", "once"))
            .rule(rule("B", "every_variable"))
            .rule(rule("C", "once"))
            .build()
            .unwrap();

        assert_eq!(analyzer.rule_types().len(), 2);

        let workflow = WorkflowData::new("Main.xaml").with_variables(["x", "y"]);
        let ids: Vec<_> = analyzer
            .analyze(&workflow)
            .into_iter()
            .map(|f| f.rule_id)
            .collect();
        assert_eq!(ids, ["A", "C", "B", "B"]);
    }

    #[test]
    fn test_unknown_type_and_disabled_rules_are_inert() {
        let analyzer = Analyzer::builder()
            .registry(registry())
            .rule(rule("A", "not_implemented_yet"))
            .rule(rule("B", "once").enabled(false))
            .build()
            .unwrap();

        assert_eq!(analyzer.rule_count(), 2);
        assert!(analyzer.analyze(&WorkflowData::new("Main.xaml")).is_empty());
    }

    #[test]
    fn test_config_overrides() {
        let mut config = Config::default();
        config.rules.insert(
            "A".to_string(),
            RuleOverride {
                enabled: None,
                severity: Some(Severity::Info),
            },
        );
        config.rules.insert(
            "B".to_string(),
            RuleOverride {
                enabled: Some(true),
                severity: None,
            },
        );

        let analyzer = Analyzer::builder()
            .registry(registry())
            .config(config)
            .rule(rule("A", "once").with_severity(Severity::Error))
            .rule(rule("B", "once").enabled(false))
            .build()
            .unwrap();

        let findings = analyzer.analyze(&WorkflowData::new("Main.xaml"));
        assert_eq!(findings.len(), 2);
        assert_eq!(findings[0].severity, Severity::Info);
    }

    #[test]
    fn test_analyze_all_counts_workflows() {
        let analyzer = Analyzer::builder()
            .registry(registry())
            .rule(rule("A", "once"))
            .build()
            .unwrap();

        let result = analyzer.analyze_all(&[
            WorkflowData::new("Main.xaml"),
            WorkflowData::new("Process.xaml"),
        ]);
        assert_eq!(result.workflows_checked, 2);
        assert_eq!(result.findings.len(), 2);
    }
}
