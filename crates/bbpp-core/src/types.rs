//! Core types for findings and analysis results.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Severity level for rule findings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Informational message, does not fail analysis.
    Info,
    /// Warning that should be addressed.
    Warning,
    /// Error that must be fixed.
    Error,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Info => write!(f, "info"),
            Self::Warning => write!(f, "warning"),
            Self::Error => write!(f, "error"),
        }
    }
}

impl std::str::FromStr for Severity {
    type Err = crate::model::ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "error" => Ok(Self::Error),
            "warning" => Ok(Self::Warning),
            "info" => Ok(Self::Info),
            other => Err(crate::model::ModelError::UnknownSeverity {
                value: other.to_string(),
            }),
        }
    }
}

/// Where in a workflow a finding applies.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "scope", rename_all = "lowercase")]
pub enum Location {
    /// The workflow file as a whole.
    File {
        /// Workflow file path as reported by the parser.
        file: PathBuf,
    },
    /// A single element inside the workflow (variable, argument, activity, ...).
    Element {
        /// Workflow file path as reported by the parser.
        file: PathBuf,
        /// Element kind (e.g. "variable", "argument").
        element: String,
        /// Element name or display name.
        name: String,
        /// Position of the element in its parser-supplied sequence.
        index: usize,
    },
}

impl Location {
    /// Creates a file-level location.
    #[must_use]
    pub fn file(file: impl Into<PathBuf>) -> Self {
        Self::File { file: file.into() }
    }

    /// Creates an element-level location.
    #[must_use]
    pub fn element(
        file: impl Into<PathBuf>,
        element: impl Into<String>,
        name: impl Into<String>,
        index: usize,
    ) -> Self {
        Self::Element {
            file: file.into(),
            element: element.into(),
            name: name.into(),
            index,
        }
    }

    /// Returns the workflow file of this location.
    #[must_use]
    pub fn file_path(&self) -> &std::path::Path {
        match self {
            Self::File { file } | Self::Element { file, .. } => file,
        }
    }
}

impl std::fmt::Display for Location {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::File { file } => write!(f, "{}", file.display()),
            Self::Element {
                file,
                element,
                name,
                ..
            } => write!(f, "{} ({element} `{name}`)", file.display()),
        }
    }
}

/// One reported violation of a single rule against a single workflow element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Finding {
    /// Id of the violated rule (e.g. "NAMING-001").
    pub rule_id: String,
    /// Human-readable rule name.
    pub rule_name: String,
    /// Rule category tag.
    pub category: String,
    /// Severity of this finding.
    pub severity: Severity,
    /// Cost weight copied from the rule, for downstream scoring.
    #[serde(default)]
    pub penalty: u32,
    /// Where the violation was found.
    pub location: Location,
    /// Human-readable message.
    pub message: String,
    /// Evaluator-specific evidence (offending value, suggestion, measured ratio...).
    #[serde(default)]
    pub details: BTreeMap<String, Value>,
}

impl Finding {
    /// Creates a finding for `rule`, taking identity, category, severity and
    /// penalty from it.
    #[must_use]
    pub fn new(rule: &crate::model::Rule, location: Location, message: impl Into<String>) -> Self {
        Self {
            rule_id: rule.id.clone(),
            rule_name: rule.name.clone(),
            category: rule.category.clone(),
            severity: rule.severity,
            penalty: rule.penalty,
            location,
            message: message.into(),
            details: BTreeMap::new(),
        }
    }

    /// Adds a piece of evidence to this finding.
    #[must_use]
    pub fn with_detail(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.details.insert(key.into(), value.into());
        self
    }

    /// Returns the suggested correction, if the evaluator produced one.
    #[must_use]
    pub fn suggestion(&self) -> Option<&str> {
        self.details.get("suggestion").and_then(Value::as_str)
    }

    /// Formats the finding for terminal output.
    #[must_use]
    pub fn format(&self) -> String {
        use std::fmt::Write;
        let mut output = format!("{} {} at {}\n", self.rule_id, self.rule_name, self.location);
        let _ = writeln!(output, "  {}: {}", self.severity, self.message);
        if let Some(suggestion) = self.suggestion() {
            let _ = writeln!(output, "  = help: use `{suggestion}`");
        }
        output
    }
}

impl std::fmt::Display for Finding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}: {} [{}] {}",
            self.location, self.severity, self.rule_id, self.message
        )
    }
}

/// Result of analyzing one or more workflows.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct AnalysisResult {
    /// All findings, in evaluation order.
    pub findings: Vec<Finding>,
    /// Number of workflows analyzed.
    pub workflows_checked: usize,
}

impl AnalysisResult {
    /// Creates a new empty result.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if there are any errors.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        self.findings.iter().any(|f| f.severity == Severity::Error)
    }

    /// Checks if any findings meet or exceed the given severity threshold.
    #[must_use]
    pub fn has_findings_at(&self, severity: Severity) -> bool {
        self.findings.iter().any(|f| f.severity >= severity)
    }

    /// Returns findings filtered by severity.
    #[must_use]
    pub fn by_severity(&self, severity: Severity) -> Vec<&Finding> {
        self.findings
            .iter()
            .filter(|f| f.severity == severity)
            .collect()
    }

    /// Counts findings by severity as `(errors, warnings, infos)`.
    #[must_use]
    pub fn count_by_severity(&self) -> (usize, usize, usize) {
        let count = |severity| self.findings.iter().filter(|f| f.severity == severity).count();
        (
            count(Severity::Error),
            count(Severity::Warning),
            count(Severity::Info),
        )
    }

    /// Sums the penalties of all findings.
    #[must_use]
    pub fn total_penalty(&self) -> u64 {
        self.findings.iter().map(|f| u64::from(f.penalty)).sum()
    }

    /// Formats all findings plus a summary line.
    #[must_use]
    pub fn format_report(&self) -> String {
        use std::fmt::Write;

        let mut report = String::new();
        for finding in &self.findings {
            let _ = writeln!(report, "{}", finding.format());
        }

        let (errors, warnings, infos) = self.count_by_severity();
        let _ = writeln!(
            report,
            "Found {} error(s), {} warning(s), {} info(s) in {} workflow(s), total penalty {}",
            errors,
            warnings,
            infos,
            self.workflows_checked,
            self.total_penalty()
        );
        report
    }

    /// Adds findings from another result.
    pub fn extend(&mut self, other: Self) {
        self.findings.extend(other.findings);
        self.workflows_checked += other.workflows_checked;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Rule;

    fn make_finding(severity: Severity) -> Finding {
        let mut rule = Rule::new("NAMING-001", "Variables in camelCase", "naming");
        rule.severity = severity;
        rule.penalty = 3;
        Finding::new(
            &rule,
            Location::element("Main.xaml", "variable", "MyVar", 0),
            "Variable `MyVar` is not camelCase",
        )
    }

    #[test]
    fn finding_copies_rule_identity() {
        let f = make_finding(Severity::Warning);
        assert_eq!(f.rule_id, "NAMING-001");
        assert_eq!(f.category, "naming");
        assert_eq!(f.penalty, 3);
        assert_eq!(f.severity, Severity::Warning);
    }

    #[test]
    fn format_includes_suggestion() {
        let f = make_finding(Severity::Error).with_detail("suggestion", "myVar");
        assert!(f.format().contains("= help: use `myVar`"));
    }

    #[test]
    fn format_omits_help_without_suggestion() {
        let f = make_finding(Severity::Error);
        assert!(!f.format().contains("help"));
    }

    #[test]
    fn display_mentions_element() {
        let f = make_finding(Severity::Error);
        let display = format!("{f}");
        assert!(display.contains("variable `MyVar`"));
        assert!(display.contains("[NAMING-001]"));
    }

    #[test]
    fn severity_parses_lowercase() {
        assert_eq!("warning".parse::<Severity>().ok(), Some(Severity::Warning));
        assert!("critical".parse::<Severity>().is_err());
    }

    #[test]
    fn result_counts_and_penalty() {
        let mut result = AnalysisResult::new();
        result.workflows_checked = 2;
        result.findings.push(make_finding(Severity::Warning));
        result.findings.push(make_finding(Severity::Error));

        assert_eq!(result.count_by_severity(), (1, 1, 0));
        assert_eq!(result.total_penalty(), 6);
        assert!(result.has_errors());
        assert!(result.has_findings_at(Severity::Warning));
        assert!(result.format_report().contains("in 2 workflow(s)"));
    }

    #[test]
    fn has_findings_at_respects_threshold() {
        let mut result = AnalysisResult::new();
        result.findings.push(make_finding(Severity::Info));
        assert!(!result.has_findings_at(Severity::Warning));
        assert!(result.has_findings_at(Severity::Info));
    }
}
