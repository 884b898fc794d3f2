//! JSON document types (DTO layer).
//!
//! These types exist solely for serde. They are converted to domain types via
//! the loader, and back when saving.

use crate::model::SetMetadata;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Raw representation of one rule-set document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuleSetDocument {
    /// Set metadata.
    #[serde(default)]
    pub metadata: SetMetadata,
    /// Whether the set contributes rules (default: true).
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Advisory dependencies on other sets.
    #[serde(default)]
    pub dependencies: Map<String, Value>,
    /// Rules in document order.
    pub rules: Vec<RuleDocument>,
}

/// Raw representation of one rule.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuleDocument {
    /// Rule id.
    pub id: String,
    /// Rule name.
    pub name: String,
    /// Description.
    #[serde(default)]
    pub description: String,
    /// Category tag.
    pub category: String,
    /// Severity string ("error", "warning", "info").
    pub severity: String,
    /// Non-negative cost weight.
    #[serde(default)]
    pub penalty: u32,
    /// Whether the rule runs.
    pub enabled: bool,
    /// Set names the rule nominally belongs to.
    #[serde(default)]
    pub sets: Vec<String>,
    /// Evaluator identifier.
    #[serde(default)]
    pub rule_type: String,
    /// Evaluator-specific parameters.
    #[serde(default)]
    pub parameters: Map<String, Value>,
    /// Informational implementation status.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub implementation_status: Option<String>,
}

/// Metadata of an aggregate export.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AggregateMetadata {
    /// Export name.
    pub name: String,
    /// Tool version that produced the export.
    pub version: String,
    /// Export timestamp.
    pub exported_at: String,
    /// Number of sets in the export.
    pub sets_count: usize,
}

/// One set inside an aggregate export.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AggregateEntry {
    /// The set's own metadata.
    #[serde(default)]
    pub metadata: SetMetadata,
    /// Whether the set contributes rules (default: true).
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Advisory dependencies on other sets.
    #[serde(default)]
    pub dependencies: Map<String, Value>,
    /// The set's rules.
    pub rules: Vec<RuleDocument>,
}

/// Aggregate export of several sets.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AggregateDocument {
    /// Export metadata.
    #[serde(default)]
    pub metadata: AggregateMetadata,
    /// Exported sets in selection order.
    pub sets: Vec<AggregateEntry>,
}

fn default_true() -> bool {
    true
}
