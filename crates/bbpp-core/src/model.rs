//! Domain model for rules, rule sets and the persisted user selection.
//!
//! Values here are already validated: documents on disk go through
//! [`crate::document`] before they become a [`RuleSet`], so nothing in this
//! module has to distrust its own fields.

use crate::options::RuleOptions;
use crate::types::Severity;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::path::Path;

/// Errors raised when a value fails domain validation.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ModelError {
    /// Severity string is not one of error, warning, info.
    #[error("unknown severity `{value}`, expected: error, warning, info")]
    UnknownSeverity {
        /// The invalid value.
        value: String,
    },

    /// A rule id is empty.
    #[error("rule id must not be empty")]
    EmptyRuleId,

    /// A rule parameter has an unrecognized key or a value of the wrong shape.
    #[error("invalid parameters for rule type `{rule_type}`: {reason}")]
    InvalidParameters {
        /// Rule type whose parameters were rejected.
        rule_type: String,
        /// Why the parameters were rejected.
        reason: String,
    },

    /// A numeric parameter is outside its permitted range.
    #[error("parameter `{key}` out of range: {reason}")]
    OutOfRange {
        /// Parameter key.
        key: String,
        /// Description of the violated bound.
        reason: String,
    },
}

/// Identifier selecting the evaluator for a rule.
///
/// Built-in identifiers get their own variant; anything else is kept as
/// [`RuleType::Custom`] so documents can reference checks that are only
/// registered by an embedding application, or not implemented yet.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum RuleType {
    /// Variable names follow a case convention.
    VariableNaming,
    /// Argument names carry a direction prefix and a case convention.
    ArgumentPrefix,
    /// Arguments carry an annotation.
    ArgumentDescription,
    /// Catch blocks are not empty.
    EmptyCatch,
    /// Commented-line ratio within bounds.
    CommentRatio,
    /// Workflow logs at least a minimum number of messages.
    LoggingPresence,
    /// Activities are renamed from their default display name.
    ActivityDefaultName,
    /// Workflow activity count stays below a maximum.
    WorkflowSize,
    /// Any other identifier.
    Custom(String),
}

impl RuleType {
    /// All built-in rule types.
    pub const BUILTIN: &'static [RuleType] = &[
        Self::VariableNaming,
        Self::ArgumentPrefix,
        Self::ArgumentDescription,
        Self::EmptyCatch,
        Self::CommentRatio,
        Self::LoggingPresence,
        Self::ActivityDefaultName,
        Self::WorkflowSize,
    ];

    /// Returns the document identifier of this rule type.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::VariableNaming => "variable_naming",
            Self::ArgumentPrefix => "argument_prefix",
            Self::ArgumentDescription => "argument_description",
            Self::EmptyCatch => "empty_catch",
            Self::CommentRatio => "comment_ratio",
            Self::LoggingPresence => "logging_presence",
            Self::ActivityDefaultName => "activity_default_name",
            Self::WorkflowSize => "workflow_size",
            Self::Custom(name) => name,
        }
    }

    /// Returns true for identifiers without a built-in variant.
    #[must_use]
    pub fn is_custom(&self) -> bool {
        matches!(self, Self::Custom(_))
    }
}

impl From<&str> for RuleType {
    fn from(value: &str) -> Self {
        Self::BUILTIN
            .iter()
            .find(|t| t.as_str() == value)
            .cloned()
            .unwrap_or_else(|| Self::Custom(value.to_string()))
    }
}

impl From<String> for RuleType {
    fn from(value: String) -> Self {
        Self::from(value.as_str())
    }
}

impl From<RuleType> for String {
    fn from(value: RuleType) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for RuleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// A single best-practice rule.
#[derive(Debug, Clone, PartialEq)]
pub struct Rule {
    /// Unique id within an effective collection.
    pub id: String,
    /// Human-readable name.
    pub name: String,
    /// Longer description.
    pub description: String,
    /// Free-form category tag.
    pub category: String,
    /// Severity of findings from this rule.
    pub severity: Severity,
    /// Cost weight consumed by downstream scoring.
    pub penalty: u32,
    /// Whether the rule runs.
    pub enabled: bool,
    /// Set names this rule nominally belongs to.
    pub sets: Vec<String>,
    /// Selects the evaluator.
    pub rule_type: RuleType,
    /// Validated evaluator parameters.
    pub options: RuleOptions,
    /// Informational implementation status.
    pub implementation_status: Option<String>,
}

impl Rule {
    /// Creates an enabled warning-level rule with no evaluator assigned yet.
    #[must_use]
    pub fn new(id: impl Into<String>, name: impl Into<String>, category: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: String::new(),
            category: category.into(),
            severity: Severity::Warning,
            penalty: 0,
            enabled: true,
            sets: Vec::new(),
            rule_type: RuleType::Custom(String::new()),
            options: RuleOptions::Custom(Map::new()),
            implementation_status: None,
        }
    }

    /// Sets typed options, switching `rule_type` to match built-in options.
    #[must_use]
    pub fn with_options(mut self, options: RuleOptions) -> Self {
        if let Some(rule_type) = options.builtin_type() {
            self.rule_type = rule_type;
        }
        self.options = options;
        self
    }

    /// Sets the rule type, keeping the current options.
    #[must_use]
    pub fn with_type(mut self, rule_type: RuleType) -> Self {
        self.rule_type = rule_type;
        self
    }

    /// Sets the severity.
    #[must_use]
    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }

    /// Sets the penalty.
    #[must_use]
    pub fn with_penalty(mut self, penalty: u32) -> Self {
        self.penalty = penalty;
        self
    }

    /// Sets whether the rule is enabled.
    #[must_use]
    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Returns true if `name` is whitelisted by this rule's `exceptions`.
    #[must_use]
    pub fn is_exempt(&self, name: &str) -> bool {
        self.options.is_exempt(name)
    }

    /// Returns true if a workflow file is whitelisted, by file name or by
    /// its full path.
    #[must_use]
    pub fn is_exempt_file(&self, path: &Path) -> bool {
        path.file_name()
            .is_some_and(|name| self.is_exempt(&name.to_string_lossy()))
            || self.is_exempt(&path.to_string_lossy())
    }
}

/// Descriptive metadata of a rule set.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SetMetadata {
    /// Set name; the storage filename is derived from it.
    pub name: String,
    /// Description.
    pub description: String,
    /// Version string.
    pub version: String,
    /// Author.
    pub author: String,
    /// Creation timestamp as written by the author.
    pub created: String,
    /// Last update timestamp.
    pub last_updated: String,
    /// Free-form changelog entries.
    pub changelog: Vec<Value>,
}

/// A named, independently toggle-able collection of rules.
#[derive(Debug, Clone, PartialEq)]
pub struct RuleSet {
    /// Set metadata.
    pub metadata: SetMetadata,
    /// A disabled set contributes no rules.
    pub enabled: bool,
    /// Advisory dependencies on other sets.
    pub dependencies: Map<String, Value>,
    /// Rules in document order.
    pub rules: Vec<Rule>,
}

impl RuleSet {
    /// Creates an enabled, empty rule set.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            metadata: SetMetadata {
                name: name.into(),
                ..SetMetadata::default()
            },
            enabled: true,
            dependencies: Map::new(),
            rules: Vec::new(),
        }
    }

    /// Appends a rule.
    #[must_use]
    pub fn with_rule(mut self, rule: Rule) -> Self {
        self.rules.push(rule);
        self
    }

    /// Returns the storage filename for this set.
    #[must_use]
    pub fn filename(&self) -> String {
        set_filename(&self.metadata.name)
    }
}

/// Prefix of every rule-set document filename.
pub const SET_FILE_PREFIX: &str = "BBPP_";

/// Extension of rule-set documents.
pub const SET_FILE_EXTENSION: &str = "json";

/// Derives the storage filename of a set from its name.
///
/// Characters outside `[A-Za-z0-9_-]` are replaced by `_`, so
/// `"Master"` becomes `BBPP_Master.json` and `"REFramework v2"` becomes
/// `BBPP_REFramework_v2.json`.
#[must_use]
pub fn set_filename(name: &str) -> String {
    let sanitized: String = name
        .trim()
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '_' || c == '-' {
                c
            } else {
                '_'
            }
        })
        .collect();
    format!("{SET_FILE_PREFIX}{sanitized}.{SET_FILE_EXTENSION}")
}

/// Current user configuration format version.
pub const USER_CONFIG_VERSION: &str = "1.0";

/// Process-wide persisted selection of active rule sets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserConfig {
    /// Format version.
    #[serde(default = "default_version")]
    pub version: String,
    /// Last time the selection changed.
    #[serde(default)]
    pub last_updated: String,
    /// Ordered set-file identifiers; order defines conflict priority.
    #[serde(default)]
    pub active_bbpp_sets: Vec<String>,
}

impl UserConfig {
    /// Creates a configuration selecting the given sets, stamped now.
    #[must_use]
    pub fn with_sets(active_bbpp_sets: Vec<String>) -> Self {
        Self {
            version: default_version(),
            last_updated: chrono::Local::now().to_rfc3339(),
            active_bbpp_sets,
        }
    }
}

fn default_version() -> String {
    USER_CONFIG_VERSION.to_string()
}
