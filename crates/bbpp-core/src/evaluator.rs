//! Evaluator trait and registry.

use crate::model::{Rule, RuleType};
use crate::types::Finding;
use crate::workflow::WorkflowData;
use std::collections::HashMap;
use std::sync::Arc;

/// The check behind one rule type.
///
/// Evaluators are pure: they read the rule (severity, category, options) and
/// the workflow data and return zero or more findings, one per offending
/// element. They must not depend on anything but their inputs.
///
/// # Example
///
/// ```ignore
/// use bbpp_core::{Evaluator, Finding, Location, Rule, RuleType, WorkflowData};
///
/// pub struct NoEmptyWorkflow;
///
/// impl Evaluator for NoEmptyWorkflow {
///     fn rule_type(&self) -> RuleType { RuleType::Custom("no_empty_workflow".into()) }
///
///     fn evaluate(&self, rule: &Rule, workflow: &WorkflowData) -> Vec<Finding> {
///         if workflow.activity_count > 0 {
///             return vec![];
///         }
///         vec![Finding::new(rule, Location::file(workflow.path()), "Workflow has no activities")]
///     }
/// }
/// ```
pub trait Evaluator: Send + Sync {
    /// Returns the rule type this evaluator implements.
    fn rule_type(&self) -> RuleType;

    /// Returns a brief description of what this evaluator checks.
    fn description(&self) -> &'static str {
        ""
    }

    /// Evaluates `rule` against `workflow`.
    fn evaluate(&self, rule: &Rule, workflow: &WorkflowData) -> Vec<Finding>;
}

/// Type alias for boxed Evaluator trait objects.
pub type EvaluatorBox = Box<dyn Evaluator>;

/// Maps rule types to their evaluators.
///
/// New rule types are added by registering an evaluator; the analyzer never
/// needs to change. Cloning shares the evaluators.
#[derive(Clone, Default)]
pub struct EvaluatorRegistry {
    evaluators: HashMap<RuleType, Arc<dyn Evaluator>>,
}

impl EvaluatorRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an evaluator, replacing any previous one for its type.
    #[must_use]
    pub fn with<E: Evaluator + 'static>(mut self, evaluator: E) -> Self {
        self.register(Box::new(evaluator));
        self
    }

    /// Registers a boxed evaluator, replacing any previous one for its type.
    pub fn register(&mut self, evaluator: EvaluatorBox) {
        self.evaluators
            .insert(evaluator.rule_type(), Arc::from(evaluator));
    }

    /// Returns the evaluator for a rule type.
    #[must_use]
    pub fn get(&self, rule_type: &RuleType) -> Option<&dyn Evaluator> {
        self.evaluators.get(rule_type).map(|e| &**e)
    }

    /// Returns true if a rule type has an evaluator.
    #[must_use]
    pub fn contains(&self, rule_type: &RuleType) -> bool {
        self.evaluators.contains_key(rule_type)
    }

    /// Returns the registered rule types, sorted.
    #[must_use]
    pub fn rule_types(&self) -> Vec<&RuleType> {
        let mut types: Vec<_> = self.evaluators.keys().collect();
        types.sort();
        types
    }

    /// Number of registered evaluators.
    #[must_use]
    pub fn len(&self) -> usize {
        self.evaluators.len()
    }

    /// Returns true if nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.evaluators.is_empty()
    }
}

impl std::fmt::Debug for EvaluatorRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EvaluatorRegistry")
            .field("rule_types", &self.rule_types())
            .finish()
    }
}
