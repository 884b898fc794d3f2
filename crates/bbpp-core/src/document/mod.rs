//! Rule-set documents: structural validation and conversion.
//!
//! # Pipeline
//!
//! ```text
//! JSON text
//!   ↓ serde_json (untyped Value)
//! validate_structure()
//!   ↓ serde (DTO layer)
//! dto types
//!   ↓ validate + convert
//! RuleSet (domain model)
//! ```
//!
//! Nothing downstream of `validate_structure` sees a document that lacks
//! `rules` or a rule that lacks the minimal field set.

pub mod dto;
pub mod loader;

use serde_json::Value;
use std::collections::HashMap;

/// Fields every rule in a document must carry.
pub const REQUIRED_RULE_FIELDS: &[&str] = &["id", "name", "category", "severity", "enabled"];

/// Reasons a document fails structural validation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StructureError {
    /// The top-level value is not an object.
    #[error("document is not a JSON object")]
    NotAnObject,

    /// The top-level `rules` field is absent.
    #[error("missing 'rules' field")]
    MissingRules,

    /// `rules` is present but not a sequence.
    #[error("'rules' field is not a list")]
    RulesNotList,

    /// A rule entry is not an object.
    #[error("rule {index} is not an object")]
    RuleNotObject {
        /// Position of the rule.
        index: usize,
    },

    /// A rule lacks one of [`REQUIRED_RULE_FIELDS`].
    #[error("rule {index} is missing required field '{field}'")]
    MissingRuleField {
        /// Position of the rule.
        index: usize,
        /// Missing field name.
        field: &'static str,
    },
}

/// Errors turning document text into a domain value.
#[derive(Debug, thiserror::Error)]
pub enum DocumentError {
    /// Text is not well-formed JSON.
    #[error("not valid JSON: {0}")]
    Syntax(serde_json::Error),

    /// JSON lacks the required structure.
    #[error("{0}")]
    Structure(#[from] StructureError),

    /// A field has the wrong type.
    #[error("invalid field: {0}")]
    Schema(serde_json::Error),

    /// Domain validation failed.
    #[error("{0}")]
    Load(#[from] loader::LoadError),

    /// Two aggregate entries map to the same set document.
    #[error("sets {index} and {previous} both map to '{filename}'")]
    DuplicateSet {
        /// Shared document filename.
        filename: String,
        /// Position of the earlier entry.
        previous: usize,
        /// Position of the later entry.
        index: usize,
    },
}

/// Checks the minimal structure of a rule-set document.
///
/// # Errors
///
/// Returns the first [`StructureError`] found.
pub fn validate_structure(document: &Value) -> Result<(), StructureError> {
    let object = document.as_object().ok_or(StructureError::NotAnObject)?;
    let rules = object.get("rules").ok_or(StructureError::MissingRules)?;
    validate_rules(rules)
}

/// Checks the minimal structure of an aggregate export document.
///
/// # Errors
///
/// Returns the first [`StructureError`] found; each entry of `sets` must
/// itself pass the rule-set checks.
pub fn validate_aggregate_structure(document: &Value) -> Result<(), StructureError> {
    let object = document.as_object().ok_or(StructureError::NotAnObject)?;
    let sets = object
        .get("sets")
        .and_then(Value::as_array)
        .ok_or(StructureError::MissingRules)?;
    sets.iter().try_for_each(validate_structure)
}

fn validate_rules(rules: &Value) -> Result<(), StructureError> {
    let rules = rules.as_array().ok_or(StructureError::RulesNotList)?;
    for (index, rule) in rules.iter().enumerate() {
        let rule = rule
            .as_object()
            .ok_or(StructureError::RuleNotObject { index })?;
        if let Some(field) = REQUIRED_RULE_FIELDS
            .iter()
            .copied()
            .find(|f| !rule.contains_key(*f))
        {
            return Err(StructureError::MissingRuleField { index, field });
        }
    }
    Ok(())
}

/// Parses and fully validates a rule-set document.
///
/// # Errors
///
/// Returns an error if the text is not JSON, lacks required structure, or
/// fails domain validation. No partial result is ever produced.
pub fn parse_rule_set(content: &str) -> Result<crate::model::RuleSet, DocumentError> {
    let value: Value = serde_json::from_str(content).map_err(DocumentError::Syntax)?;
    validate_structure(&value)?;
    let dto: dto::RuleSetDocument = serde_json::from_value(value).map_err(DocumentError::Schema)?;
    Ok(loader::load(dto)?)
}

/// Parses and validates an aggregate export document.
///
/// # Errors
///
/// Returns an error if the text is not JSON, lacks required structure, or
/// any contained rule fails domain validation.
pub fn parse_aggregate(content: &str) -> Result<dto::AggregateDocument, DocumentError> {
    let value: Value = serde_json::from_str(content).map_err(DocumentError::Syntax)?;
    validate_aggregate_structure(&value)?;
    let aggregate: dto::AggregateDocument =
        serde_json::from_value(value).map_err(DocumentError::Schema)?;
    let mut seen: HashMap<String, usize> = HashMap::new();
    for (index, entry) in aggregate.sets.iter().enumerate() {
        let filename = crate::model::set_filename(&entry.metadata.name);
        if let Some(&previous) = seen.get(&filename) {
            return Err(DocumentError::DuplicateSet {
                filename,
                previous,
                index,
            });
        }
        seen.insert(filename, index);
        loader::load_rules(entry.rules.clone())?;
    }
    Ok(aggregate)
}
