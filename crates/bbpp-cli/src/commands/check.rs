//! Check command implementation.

use anyhow::{Context, Result};
use bbpp::{Config, Session, Severity};
use std::path::PathBuf;

use crate::OutputFormat;

/// Runs the check command.
pub fn run(
    config: Config,
    workflow_paths: &[PathBuf],
    sets: Option<Vec<String>>,
    format: OutputFormat,
    fail_on: Option<Severity>,
) -> Result<()> {
    let fail_on = fail_on
        .or(config.analysis.fail_on)
        .unwrap_or(Severity::Error);
    let session = Session::open(config);

    let workflows = workflow_paths
        .iter()
        .map(|path| Session::load_workflow(path))
        .collect::<Result<Vec<_>, _>>()?;

    let analyzer = session
        .analyzer(sets)
        .context("Failed to build analyzer")?;
    if analyzer.rule_count() == 0 {
        tracing::warn!(
            "No effective rules; run `bbpp init` or `bbpp sets activate` to select rule sets"
        );
    }

    let result = analyzer.analyze_all(&workflows);

    super::output::print(&result, format)?;

    if result.has_findings_at(fail_on) {
        std::process::exit(1);
    }

    Ok(())
}
