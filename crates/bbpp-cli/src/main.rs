//! bbpp CLI tool.
//!
//! Usage:
//! ```bash
//! bbpp check [OPTIONS] <WORKFLOW.json>...
//! bbpp sets list|active|activate|export|import|export-all|import-all|backups
//! bbpp list-rules
//! bbpp init
//! ```

use anyhow::Result;
use bbpp::Severity;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;
mod config_resolver;

/// Best-practice linter for automation workflows
#[derive(Parser)]
#[command(name = "bbpp")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check parsed workflow data against the active rule sets
    Check {
        /// Workflow data documents (JSON)
        #[arg(required = true)]
        workflows: Vec<PathBuf>,

        /// Use these sets instead of the active selection (comma-separated)
        #[arg(long, value_delimiter = ',')]
        sets: Option<Vec<String>>,

        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,

        /// Fail when a finding at or above this severity is reported
        #[arg(long)]
        fail_on: Option<FailOn>,
    },

    /// Manage rule sets and the active selection
    Sets {
        #[command(subcommand)]
        command: SetsCommand,
    },

    /// List the effective rules and registered evaluators
    ListRules {
        /// Use these sets instead of the active selection (comma-separated)
        #[arg(long, value_delimiter = ',')]
        sets: Option<Vec<String>>,
    },

    /// Create bbpp.toml and install the Master rule set
    Init {
        /// Overwrite existing config and reinstall the Master set
        #[arg(long)]
        force: bool,
    },
}

/// Rule-set management commands.
#[derive(Subcommand)]
pub enum SetsCommand {
    /// List every set document in storage
    List {
        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,
    },
    /// Show the active selection, in priority order
    Active,
    /// Replace the active selection (first set wins on duplicate rule ids)
    Activate {
        /// Set names or filenames, highest priority first
        #[arg(required = true)]
        sets: Vec<String>,
    },
    /// Copy a set document out of storage
    Export {
        /// Set name or filename
        set: String,
        /// Destination file
        dest: PathBuf,
    },
    /// Validate and copy a set document into storage
    Import {
        /// Source document
        source: PathBuf,
        /// Destination set name or filename (default: source filename)
        #[arg(long)]
        name: Option<String>,
    },
    /// Export several sets into one aggregate document
    ExportAll {
        /// Destination file
        dest: PathBuf,
        /// Sets to export (default: the active selection)
        #[arg(long, value_delimiter = ',')]
        sets: Option<Vec<String>>,
    },
    /// Split an aggregate document back into set documents
    ImportAll {
        /// Aggregate document
        source: PathBuf,
    },
    /// List backups of a set document
    Backups {
        /// Set name or filename
        set: String,
    },
}

/// Output format for results.
#[derive(Clone, Copy, Debug, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text output.
    #[default]
    Text,
    /// JSON output.
    Json,
    /// One-line-per-finding compact format.
    Compact,
}

/// Severity threshold for a failing exit code.
#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum FailOn {
    /// Fail on errors only.
    Error,
    /// Fail on warnings and errors.
    Warning,
    /// Fail on any finding.
    Info,
}

impl From<FailOn> for Severity {
    fn from(value: FailOn) -> Self {
        match value {
            FailOn::Error => Self::Error,
            FailOn::Warning => Self::Warning,
            FailOn::Info => Self::Info,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let project_dir = std::env::current_dir()?;
    let config = || config_resolver::load(&project_dir, cli.config.as_deref());

    match cli.command {
        Commands::Check {
            workflows,
            sets,
            format,
            fail_on,
        } => commands::check::run(config()?, &workflows, sets, format, fail_on.map(Severity::from)),
        Commands::Sets { command } => commands::sets::run(config()?, command),
        Commands::ListRules { sets } => commands::list_rules::run(config()?, sets),
        Commands::Init { force } => commands::init::run(&project_dir, force),
    }
}
