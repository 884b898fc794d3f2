//! DTO ↔ domain model conversion with validation.

use super::dto::{RuleDocument, RuleSetDocument};
use crate::model::{ModelError, Rule, RuleSet, RuleType};
use crate::options::RuleOptions;
use crate::types::Severity;

/// Errors during DTO → domain conversion.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// A field-level validation error.
    #[error("{context}: {source}")]
    Validation {
        /// Where the error occurred (e.g. "rules[2].parameters").
        context: String,
        /// The underlying model error.
        source: ModelError,
    },
}

/// Converts a `RuleSetDocument` to a validated `RuleSet`.
///
/// # Errors
///
/// Returns the first error encountered during conversion.
pub fn load(dto: RuleSetDocument) -> Result<RuleSet, LoadError> {
    let rules = dto
        .rules
        .into_iter()
        .enumerate()
        .map(|(i, r)| convert_rule(r, i))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(RuleSet {
        metadata: dto.metadata,
        enabled: dto.enabled,
        dependencies: dto.dependencies,
        rules,
    })
}

/// Converts a list of rule documents, as found in aggregate exports.
///
/// # Errors
///
/// Returns the first error encountered during conversion.
pub fn load_rules(rules: Vec<RuleDocument>) -> Result<Vec<Rule>, LoadError> {
    rules
        .into_iter()
        .enumerate()
        .map(|(i, r)| convert_rule(r, i))
        .collect()
}

fn convert_rule(dto: RuleDocument, index: usize) -> Result<Rule, LoadError> {
    let ctx = format!("rules[{index}]");
    let validation = |field: &str, source| LoadError::Validation {
        context: format!("{ctx}.{field}"),
        source,
    };

    if dto.id.trim().is_empty() {
        return Err(validation("id", ModelError::EmptyRuleId));
    }

    let severity = dto
        .severity
        .parse::<Severity>()
        .map_err(|e| validation("severity", e))?;
    let rule_type = RuleType::from(dto.rule_type);
    let options = RuleOptions::from_parameters(&rule_type, dto.parameters)
        .map_err(|e| validation("parameters", e))?;

    Ok(Rule {
        id: dto.id,
        name: dto.name,
        description: dto.description,
        category: dto.category,
        severity,
        penalty: dto.penalty,
        enabled: dto.enabled,
        sets: dto.sets,
        rule_type,
        options,
        implementation_status: dto.implementation_status,
    })
}

/// Converts a domain rule set back into its document form.
#[must_use]
pub fn to_document(set: &RuleSet) -> RuleSetDocument {
    RuleSetDocument {
        metadata: set.metadata.clone(),
        enabled: set.enabled,
        dependencies: set.dependencies.clone(),
        rules: set.rules.iter().map(to_rule_document).collect(),
    }
}

/// Converts a domain rule back into its document form.
#[must_use]
pub fn to_rule_document(rule: &Rule) -> RuleDocument {
    RuleDocument {
        id: rule.id.clone(),
        name: rule.name.clone(),
        description: rule.description.clone(),
        category: rule.category.clone(),
        severity: rule.severity.to_string(),
        penalty: rule.penalty,
        enabled: rule.enabled,
        sets: rule.sets.clone(),
        rule_type: rule.rule_type.to_string(),
        parameters: rule.options.to_parameters(),
        implementation_status: rule.implementation_status.clone(),
    }
}
