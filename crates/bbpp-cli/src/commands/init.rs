//! Init command implementation.

use anyhow::{bail, Context, Result};
use bbpp::{Config, Session};
use std::path::Path;

use crate::config_resolver::PROJECT_CONFIG_NAMES;

const DEFAULT_CONFIG: &str = r#"# bbpp configuration

[storage]
# Directory holding one BBPP_<name>.json document per rule set
rules_dir = ".bbpp/rules"
# Ordered selection of active sets
user_config = ".bbpp/user_config.json"

[analysis]
# Exit with status 1 when a finding at or above this severity is reported
fail_on = "error"

# Local per-rule overrides, keyed by rule id

# [rules.NAMING-001]
# enabled = false

# [rules.ERR-001]
# severity = "warning"
"#;

/// Runs the init command.
pub fn run(project_dir: &Path, force: bool) -> Result<()> {
    let config_path = project_dir.join(PROJECT_CONFIG_NAMES[0]);

    if config_path.exists() && !force {
        bail!(
            "Configuration file already exists at {}. Use --force to overwrite.",
            config_path.display()
        );
    }

    std::fs::write(&config_path, DEFAULT_CONFIG)
        .with_context(|| format!("Failed to write {}", config_path.display()))?;

    let config = Config::from_file(&config_path)?;
    let session = Session::open(config);
    let master = session.install_master(force)?;
    let active = session.resolver().get_active_set_names();

    println!("Created {}", config_path.display());
    println!("Master rule set at {}", master.display());
    println!("Active sets: {}", active.join(", "));
    println!("\nNext steps:");
    println!("  1. Edit {} to override rules", PROJECT_CONFIG_NAMES[0]);
    println!("  2. Run: bbpp check <workflow.json>...");

    Ok(())
}
