//! Rule-set management commands.

use anyhow::{Context, Result};
use bbpp::{Config, RepositoryError, Session};
use std::path::Path;

use crate::{OutputFormat, SetsCommand};

/// Renders a repository error with its diagnostic code and help.
fn diagnostic(error: RepositoryError) -> anyhow::Error {
    anyhow::anyhow!("{:?}", miette::Report::new(error))
}

/// Runs a `sets` subcommand.
pub fn run(config: Config, command: SetsCommand) -> Result<()> {
    let session = Session::open(config);
    let resolver = session.resolver();
    let repository = session.repository();

    match command {
        SetsCommand::List { format } => {
            let sets = resolver.list_available_sets().map_err(diagnostic)?;
            match format {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&sets)?),
                OutputFormat::Text | OutputFormat::Compact => {
                    if sets.is_empty() {
                        println!("No rule sets in {}", repository.rules_dir().display());
                    }
                    for set in sets {
                        let marker = if set.is_active { "*" } else { " " };
                        println!(
                            "{marker} {:<30} {:<10} {:>4} rule(s)  {}",
                            set.filename, set.version, set.rules_count, set.description
                        );
                    }
                }
            }
        }
        SetsCommand::Active => {
            for (i, name) in resolver.get_active_set_names().iter().enumerate() {
                println!("{}. {name}", i + 1);
            }
        }
        SetsCommand::Activate { sets } => {
            for id in &sets {
                let path = repository.path_for(id);
                if !path.exists() {
                    tracing::warn!("{} does not exist yet", path.display());
                }
            }
            resolver.set_active_set_names(&sets).map_err(diagnostic)?;
            println!("Active sets: {}", sets.join(", "));
        }
        SetsCommand::Export { set, dest } => {
            repository
                .export(&repository.path_for(&set), &dest)
                .map_err(diagnostic)?;
            println!("Exported {set} to {}", dest.display());
        }
        SetsCommand::Import { source, name } => {
            let dest_name = match name {
                Some(name) => name,
                None => file_name(&source)?,
            };
            let outcome = repository.import(&source, &dest_name).map_err(diagnostic)?;
            println!("Imported {}", outcome.destination.display());
            if let Some(backup) = outcome.backup {
                println!("Previous version saved as {}", backup.display());
            }
        }
        SetsCommand::ExportAll { dest, sets } => {
            let count = match sets {
                Some(sets) => repository.export_all(&sets, &dest),
                None => resolver.export_all_active(&dest),
            }
            .map_err(diagnostic)?;
            println!("Exported {count} set(s) to {}", dest.display());
        }
        SetsCommand::ImportAll { source } => {
            let outcomes = repository.import_aggregate(&source).map_err(diagnostic)?;
            for outcome in &outcomes {
                println!("Imported {}", outcome.destination.display());
                if let Some(backup) = &outcome.backup {
                    println!("  previous version saved as {}", backup.display());
                }
            }
        }
        SetsCommand::Backups { set } => {
            let filename = file_name(&repository.path_for(&set))?;
            let backups = repository.list_backups(&filename).map_err(diagnostic)?;
            if backups.is_empty() {
                println!("No backups of {filename}");
            }
            for backup in backups {
                println!("{}", backup.display());
            }
        }
    }

    Ok(())
}

fn file_name(path: &Path) -> Result<String> {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .with_context(|| format!("{} has no file name", path.display()))
}
