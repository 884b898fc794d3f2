//! Structural workflow data consumed by evaluators.
//!
//! Produced by an external parser; every field defaults when absent so that
//! parsers can omit sections a workflow does not have.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Direction of a workflow argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ArgumentDirection {
    /// Input argument.
    In,
    /// Output argument.
    Out,
    /// Input/output argument.
    InOut,
    /// Any direction the parser reports that has no prefix convention.
    #[serde(other)]
    Other,
}

impl std::fmt::Display for ArgumentDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::In => write!(f, "In"),
            Self::Out => write!(f, "Out"),
            Self::InOut => write!(f, "InOut"),
            Self::Other => write!(f, "Other"),
        }
    }
}

/// A workflow variable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Variable {
    /// Variable name.
    pub name: String,
    /// Declared type, if reported.
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub type_name: Option<String>,
    /// Declaring scope, if reported.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scope: Option<String>,
}

/// A workflow argument.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Argument {
    /// Argument name.
    #[serde(default)]
    pub name: String,
    /// Argument direction.
    #[serde(default = "default_direction")]
    pub direction: ArgumentDirection,
    /// Description annotation.
    #[serde(default)]
    pub annotation: Option<String>,
    /// Declared type, if reported.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub type_name: Option<String>,
}

fn default_direction() -> ArgumentDirection {
    ArgumentDirection::In
}

impl Argument {
    /// Creates an argument without annotation.
    #[must_use]
    pub fn new(name: impl Into<String>, direction: ArgumentDirection) -> Self {
        Self {
            name: name.into(),
            direction,
            annotation: None,
            type_name: None,
        }
    }

    /// Sets the annotation.
    #[must_use]
    pub fn with_annotation(mut self, annotation: impl Into<String>) -> Self {
        self.annotation = Some(annotation.into());
        self
    }

    /// Returns true if the annotation is absent or blank.
    #[must_use]
    pub fn is_undocumented(&self) -> bool {
        self.annotation
            .as_deref()
            .map_or(true, |a| a.trim().is_empty())
    }
}

/// An activity in the workflow tree.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Activity {
    /// Activity type name (e.g. "Assign").
    pub activity_type: String,
    /// Display name shown in the designer.
    pub display_name: String,
}

/// A try/catch block.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TryCatchBlock {
    /// Display name of the block, if reported.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    /// True if a catch handler has no activities.
    pub catch_empty: bool,
}

/// Parsed structure of one workflow file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkflowData {
    /// Workflow file path.
    pub file_path: PathBuf,
    /// Declared variables.
    pub variables: Vec<Variable>,
    /// Declared arguments.
    pub arguments: Vec<Argument>,
    /// Activities in the workflow.
    pub activities: Vec<Activity>,
    /// Total number of activities.
    pub activity_count: u32,
    /// Try/catch blocks.
    pub try_catch_blocks: Vec<TryCatchBlock>,
    /// Total source lines.
    pub total_lines: u32,
    /// Commented source lines.
    pub commented_lines: u32,
    /// Number of log message activities.
    pub log_message_count: u32,
}

impl WorkflowData {
    /// Creates empty workflow data for a file.
    #[must_use]
    pub fn new(file_path: impl Into<PathBuf>) -> Self {
        Self {
            file_path: file_path.into(),
            ..Self::default()
        }
    }

    /// Adds variables by name.
    #[must_use]
    pub fn with_variables<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.variables.extend(names.into_iter().map(|name| Variable {
            name: name.into(),
            ..Variable::default()
        }));
        self
    }

    /// Adds an argument.
    #[must_use]
    pub fn with_argument(mut self, argument: Argument) -> Self {
        self.arguments.push(argument);
        self
    }

    /// Returns the workflow file path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.file_path
    }

    /// Ratio of commented lines over total lines, `None` for an empty file.
    #[must_use]
    pub fn comment_ratio(&self) -> Option<f64> {
        if self.total_lines == 0 {
            None
        } else {
            Some(f64::from(self.commented_lines) / f64::from(self.total_lines))
        }
    }
}
