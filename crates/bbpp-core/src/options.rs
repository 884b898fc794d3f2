//! Typed evaluator parameters.
//!
//! Rule documents carry `parameters` as a free-form JSON object. At load time
//! it is converted into one [`RuleOptions`] variant per built-in rule type;
//! unknown keys and ill-typed values are rejected there instead of being
//! discovered during analysis. Parameters of custom rule types are kept
//! verbatim.

use crate::model::{ModelError, RuleType};
use crate::utils::case;
use crate::workflow::ArgumentDirection;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Key of the per-rule exception whitelist.
pub const EXCEPTIONS_KEY: &str = "exceptions";

/// Identifier case convention.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NamingConvention {
    /// `myVariable`
    #[serde(rename = "camelCase")]
    CamelCase,
    /// `MyVariable`
    #[serde(rename = "PascalCase")]
    PascalCase,
    /// `my_variable`
    #[serde(rename = "snake_case")]
    SnakeCase,
}

impl NamingConvention {
    /// Returns true if `name` follows this convention.
    #[must_use]
    pub fn matches(self, name: &str) -> bool {
        match self {
            Self::CamelCase => case::is_camel_case(name),
            Self::PascalCase => case::is_pascal_case(name),
            Self::SnakeCase => case::is_snake_case(name),
        }
    }

    /// Rewrites `name` into this convention.
    #[must_use]
    pub fn apply(self, name: &str) -> String {
        match self {
            Self::CamelCase => case::to_camel_case(name),
            Self::PascalCase => case::to_pascal_case(name),
            Self::SnakeCase => case::to_snake_case(name),
        }
    }
}

impl std::fmt::Display for NamingConvention {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::CamelCase => write!(f, "camelCase"),
            Self::PascalCase => write!(f, "PascalCase"),
            Self::SnakeCase => write!(f, "snake_case"),
        }
    }
}

/// Options for `variable_naming`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct NamingOptions {
    /// Required case convention.
    pub convention: NamingConvention,
    /// Names never flagged.
    pub exceptions: Vec<String>,
}

impl Default for NamingOptions {
    fn default() -> Self {
        Self {
            convention: NamingConvention::CamelCase,
            exceptions: Vec::new(),
        }
    }
}

/// Prefix required for each argument direction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DirectionPrefixes {
    /// Prefix for `In` arguments.
    #[serde(rename = "In")]
    pub input: String,
    /// Prefix for `Out` arguments.
    #[serde(rename = "Out")]
    pub output: String,
    /// Prefix for `InOut` arguments.
    #[serde(rename = "InOut")]
    pub in_out: String,
}

impl Default for DirectionPrefixes {
    fn default() -> Self {
        Self {
            input: "in_".to_string(),
            output: "out_".to_string(),
            in_out: "io_".to_string(),
        }
    }
}

impl DirectionPrefixes {
    /// Returns the prefix for a direction, if the direction has one.
    #[must_use]
    pub fn for_direction(&self, direction: ArgumentDirection) -> Option<&str> {
        match direction {
            ArgumentDirection::In => Some(&self.input),
            ArgumentDirection::Out => Some(&self.output),
            ArgumentDirection::InOut => Some(&self.in_out),
            ArgumentDirection::Other => None,
        }
    }

    /// Returns every configured prefix, longest first.
    #[must_use]
    pub fn all(&self) -> Vec<&str> {
        let mut prefixes = vec![
            self.input.as_str(),
            self.output.as_str(),
            self.in_out.as_str(),
        ];
        prefixes.sort_by_key(|p| std::cmp::Reverse(p.len()));
        prefixes
    }
}

/// Options for `argument_prefix`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ArgumentPrefixOptions {
    /// Require the direction prefix.
    pub check_prefixes: bool,
    /// Check the case of the remainder after the prefix.
    pub validate_format_after_prefix: bool,
    /// Case convention of the remainder.
    pub format_after_prefix: NamingConvention,
    /// Prefix per direction.
    pub prefixes: DirectionPrefixes,
    /// Names never flagged.
    pub exceptions: Vec<String>,
}

impl Default for ArgumentPrefixOptions {
    fn default() -> Self {
        Self {
            check_prefixes: true,
            validate_format_after_prefix: true,
            format_after_prefix: NamingConvention::PascalCase,
            prefixes: DirectionPrefixes::default(),
            exceptions: Vec::new(),
        }
    }
}

/// Options for `argument_description`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ArgumentDescriptionOptions {
    /// Directions whose arguments need an annotation.
    pub directions: Vec<ArgumentDirection>,
    /// Names never flagged.
    pub exceptions: Vec<String>,
}

impl Default for ArgumentDescriptionOptions {
    fn default() -> Self {
        Self {
            directions: vec![
                ArgumentDirection::In,
                ArgumentDirection::Out,
                ArgumentDirection::InOut,
            ],
            exceptions: Vec::new(),
        }
    }
}

/// Options for rules whose only parameter is the whitelist.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WhitelistOptions {
    /// Names never flagged.
    pub exceptions: Vec<String>,
}

/// Options for `comment_ratio`.
///
/// Ratios are fractions in `0.0..=1.0` of commented lines over total lines.
/// An explicit `null` disables that bound.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CommentRatioOptions {
    /// Minimum ratio.
    pub min_ratio: Option<f64>,
    /// Maximum ratio.
    pub max_ratio: Option<f64>,
    /// Workflow file names or paths never flagged.
    pub exceptions: Vec<String>,
}

impl Default for CommentRatioOptions {
    fn default() -> Self {
        Self {
            min_ratio: Some(0.05),
            max_ratio: None,
            exceptions: Vec::new(),
        }
    }
}

impl CommentRatioOptions {
    fn validate(&self) -> Result<(), ModelError> {
        for (key, value) in [("min_ratio", self.min_ratio), ("max_ratio", self.max_ratio)] {
            if let Some(v) = value {
                if !(0.0..=1.0).contains(&v) {
                    return Err(ModelError::OutOfRange {
                        key: key.to_string(),
                        reason: format!("{v} is not within 0.0..=1.0"),
                    });
                }
            }
        }
        if let (Some(min), Some(max)) = (self.min_ratio, self.max_ratio) {
            if min > max {
                return Err(ModelError::OutOfRange {
                    key: "min_ratio".to_string(),
                    reason: format!("{min} is greater than max_ratio {max}"),
                });
            }
        }
        Ok(())
    }
}

/// Options for `logging_presence`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingPresenceOptions {
    /// Minimum number of log messages.
    pub min_log_messages: u32,
    /// Workflows with fewer activities are not checked.
    pub min_activities: u32,
    /// Workflow file names or paths never flagged.
    pub exceptions: Vec<String>,
}

impl Default for LoggingPresenceOptions {
    fn default() -> Self {
        Self {
            min_log_messages: 1,
            min_activities: 0,
            exceptions: Vec::new(),
        }
    }
}

/// Options for `workflow_size`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WorkflowSizeOptions {
    /// Maximum number of activities.
    pub max_activities: u32,
    /// Workflow file names or paths never flagged.
    pub exceptions: Vec<String>,
}

impl Default for WorkflowSizeOptions {
    fn default() -> Self {
        Self {
            max_activities: 100,
            exceptions: Vec::new(),
        }
    }
}

/// Validated parameters of a rule, one variant per built-in rule type.
#[derive(Debug, Clone, PartialEq)]
pub enum RuleOptions {
    /// `variable_naming`
    VariableNaming(NamingOptions),
    /// `argument_prefix`
    ArgumentPrefix(ArgumentPrefixOptions),
    /// `argument_description`
    ArgumentDescription(ArgumentDescriptionOptions),
    /// `empty_catch`
    EmptyCatch(WhitelistOptions),
    /// `comment_ratio`
    CommentRatio(CommentRatioOptions),
    /// `logging_presence`
    LoggingPresence(LoggingPresenceOptions),
    /// `activity_default_name`
    ActivityDefaultName(WhitelistOptions),
    /// `workflow_size`
    WorkflowSize(WorkflowSizeOptions),
    /// Parameters of a custom rule type, kept verbatim.
    Custom(Map<String, Value>),
}

impl RuleOptions {
    /// Parses and validates raw parameters for `rule_type`.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::InvalidParameters`] for unknown keys or ill-typed
    /// values, and [`ModelError::OutOfRange`] for values outside their bounds.
    pub fn from_parameters(
        rule_type: &RuleType,
        parameters: Map<String, Value>,
    ) -> Result<Self, ModelError> {
        let options = match rule_type {
            RuleType::VariableNaming => Self::VariableNaming(parse(rule_type, parameters)?),
            RuleType::ArgumentPrefix => Self::ArgumentPrefix(parse(rule_type, parameters)?),
            RuleType::ArgumentDescription => {
                Self::ArgumentDescription(parse(rule_type, parameters)?)
            }
            RuleType::EmptyCatch => Self::EmptyCatch(parse(rule_type, parameters)?),
            RuleType::CommentRatio => {
                let options: CommentRatioOptions = parse(rule_type, parameters)?;
                options.validate()?;
                Self::CommentRatio(options)
            }
            RuleType::LoggingPresence => Self::LoggingPresence(parse(rule_type, parameters)?),
            RuleType::ActivityDefaultName => {
                Self::ActivityDefaultName(parse(rule_type, parameters)?)
            }
            RuleType::WorkflowSize => Self::WorkflowSize(parse(rule_type, parameters)?),
            RuleType::Custom(_) => Self::Custom(parameters),
        };
        Ok(options)
    }

    /// Converts back into a raw parameter object.
    #[must_use]
    pub fn to_parameters(&self) -> Map<String, Value> {
        let value = match self {
            Self::VariableNaming(o) => serde_json::to_value(o),
            Self::ArgumentPrefix(o) => serde_json::to_value(o),
            Self::ArgumentDescription(o) => serde_json::to_value(o),
            Self::EmptyCatch(o) | Self::ActivityDefaultName(o) => serde_json::to_value(o),
            Self::CommentRatio(o) => serde_json::to_value(o),
            Self::LoggingPresence(o) => serde_json::to_value(o),
            Self::WorkflowSize(o) => serde_json::to_value(o),
            Self::Custom(map) => return map.clone(),
        };
        match value {
            Ok(Value::Object(map)) => map,
            _ => Map::new(),
        }
    }

    /// Returns the rule type these options belong to, for built-in variants.
    #[must_use]
    pub fn builtin_type(&self) -> Option<RuleType> {
        match self {
            Self::VariableNaming(_) => Some(RuleType::VariableNaming),
            Self::ArgumentPrefix(_) => Some(RuleType::ArgumentPrefix),
            Self::ArgumentDescription(_) => Some(RuleType::ArgumentDescription),
            Self::EmptyCatch(_) => Some(RuleType::EmptyCatch),
            Self::CommentRatio(_) => Some(RuleType::CommentRatio),
            Self::LoggingPresence(_) => Some(RuleType::LoggingPresence),
            Self::ActivityDefaultName(_) => Some(RuleType::ActivityDefaultName),
            Self::WorkflowSize(_) => Some(RuleType::WorkflowSize),
            Self::Custom(_) => None,
        }
    }

    /// Returns true if `name` literally matches an `exceptions` entry.
    #[must_use]
    pub fn is_exempt(&self, name: &str) -> bool {
        let listed = |list: &[String]| list.iter().any(|e| e == name);
        match self {
            Self::VariableNaming(o) => listed(&o.exceptions),
            Self::ArgumentPrefix(o) => listed(&o.exceptions),
            Self::ArgumentDescription(o) => listed(&o.exceptions),
            Self::EmptyCatch(o) | Self::ActivityDefaultName(o) => listed(&o.exceptions),
            Self::CommentRatio(o) => listed(&o.exceptions),
            Self::LoggingPresence(o) => listed(&o.exceptions),
            Self::WorkflowSize(o) => listed(&o.exceptions),
            Self::Custom(map) => map
                .get(EXCEPTIONS_KEY)
                .and_then(Value::as_array)
                .is_some_and(|list| list.iter().any(|e| e.as_str() == Some(name))),
        }
    }
}

fn parse<T: DeserializeOwned>(
    rule_type: &RuleType,
    parameters: Map<String, Value>,
) -> Result<T, ModelError> {
    serde_json::from_value(Value::Object(parameters)).map_err(|e| ModelError::InvalidParameters {
        rule_type: rule_type.to_string(),
        reason: e.to_string(),
    })
}
