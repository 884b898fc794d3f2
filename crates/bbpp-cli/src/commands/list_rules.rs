//! List rules command implementation.

use anyhow::{Context, Result};
use bbpp::{Config, Session};

/// Runs the list-rules command.
pub fn run(config: Config, sets: Option<Vec<String>>) -> Result<()> {
    let session = Session::open(config);
    let analyzer = session
        .analyzer(sets)
        .context("Failed to build analyzer")?;
    let registry = analyzer.registry();

    println!("Effective rules:\n");
    println!(
        "{:<12} {:<8} {:<24} {:<16} Name",
        "Id", "Enabled", "Type", "Severity"
    );
    println!("{}", "-".repeat(80));

    for rule in analyzer.rules() {
        let rule_type = if registry.contains(&rule.rule_type) {
            rule.rule_type.to_string()
        } else {
            format!("{} (inert)", rule.rule_type)
        };
        println!(
            "{:<12} {:<8} {:<24} {:<16} {}",
            rule.id,
            if rule.enabled { "yes" } else { "no" },
            rule_type,
            rule.severity.to_string(),
            rule.name
        );
    }

    println!("\nRegistered evaluators:");
    for rule_type in registry.rule_types() {
        let description = registry
            .get(rule_type)
            .map(|e| e.description())
            .unwrap_or_default();
        println!("  {rule_type:<24} {description}");
    }

    println!("\nUse `bbpp sets activate <set>...` to change the active selection.");
    Ok(())
}
