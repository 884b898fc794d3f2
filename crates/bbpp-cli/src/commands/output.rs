//! Shared output formatting for check results.

use anyhow::Result;
use bbpp::{AnalysisResult, Severity};

use crate::OutputFormat;

/// Print check results in the specified format.
pub fn print(result: &AnalysisResult, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Text => print_text(result),
        OutputFormat::Json => return print_json(result),
        OutputFormat::Compact => print_compact(result),
    }
    Ok(())
}

/// Colored severity label for terminal output.
fn severity_label(severity: Severity) -> &'static str {
    match severity {
        Severity::Error => "\x1b[31merror\x1b[0m",
        Severity::Warning => "\x1b[33mwarning\x1b[0m",
        Severity::Info => "\x1b[34minfo\x1b[0m",
    }
}

fn print_text(result: &AnalysisResult) {
    let (errors, warnings, infos) = result.count_by_severity();

    for finding in &result.findings {
        println!(
            "{} {} at {}",
            finding.rule_id, finding.rule_name, finding.location
        );
        println!("  {}: {}", severity_label(finding.severity), finding.message);
        if let Some(suggestion) = finding.suggestion() {
            println!("  = help: use `{suggestion}`");
        }
        println!();
    }

    let summary_color = if errors > 0 {
        "\x1b[31m"
    } else if warnings > 0 {
        "\x1b[33m"
    } else {
        "\x1b[32m"
    };

    println!(
        "{}Found {} error(s), {} warning(s), {} info(s) in {} workflow(s), penalty {}\x1b[0m",
        summary_color,
        errors,
        warnings,
        infos,
        result.workflows_checked,
        result.total_penalty()
    );
}

fn print_json(result: &AnalysisResult) -> Result<()> {
    let json = serde_json::to_string_pretty(result)?;
    println!("{json}");
    Ok(())
}

fn print_compact(result: &AnalysisResult) {
    for finding in &result.findings {
        println!("{finding}");
    }
}
