//! Locating and loading `bbpp.toml`.
//!
//! Candidates are tried in order:
//!
//! 1. `--config` flag (must exist)
//! 2. `{project}/bbpp.toml` or `{project}/.bbpp.toml`
//! 3. `$BBPP_CONFIG_DIR/config.toml` or `~/.bbpp/config.toml`
//!
//! Storage paths in a config file are relative to that file. Without any
//! config file, rule sets and the active selection live in the global
//! directory so every project shares one installation.

use anyhow::{Context, Result};
use bbpp::{Config, StorageConfig};
use std::fmt;
use std::path::{Path, PathBuf};

/// Project-level config file names, checked in order.
pub const PROJECT_CONFIG_NAMES: &[&str] = &["bbpp.toml", ".bbpp.toml"];

const GLOBAL_CONFIG_NAME: &str = "config.toml";
const CONFIG_DIR_ENV: &str = "BBPP_CONFIG_DIR";
const GLOBAL_DIR_NAME: &str = ".bbpp";

/// Where the configuration came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    /// Given with `--config`.
    Explicit(PathBuf),
    /// Found in the project directory.
    Project(PathBuf),
    /// Found in the global directory.
    Global(PathBuf),
    /// No file; storage rooted at the contained directory.
    Default(PathBuf),
}

impl fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Explicit(p) => write!(f, "{} (--config)", p.display()),
            Self::Project(p) => write!(f, "{} (project)", p.display()),
            Self::Global(p) => write!(f, "{} (global)", p.display()),
            Self::Default(dir) => write!(f, "defaults, storage under {}", dir.display()),
        }
    }
}

/// Resolves the configuration for one project directory.
#[derive(Debug, Clone)]
pub struct ConfigResolver {
    project_dir: PathBuf,
    global_dir: Option<PathBuf>,
}

impl ConfigResolver {
    /// Uses `$BBPP_CONFIG_DIR`, or `~/.bbpp`, as the global directory.
    #[must_use]
    pub fn new(project_dir: &Path) -> Self {
        let global_dir = std::env::var_os(CONFIG_DIR_ENV)
            .map(PathBuf::from)
            .or_else(|| home::home_dir().map(|h| h.join(GLOBAL_DIR_NAME)));
        Self::with_global_dir(project_dir, global_dir)
    }

    fn with_global_dir(project_dir: &Path, global_dir: Option<PathBuf>) -> Self {
        Self {
            project_dir: project_dir.to_path_buf(),
            global_dir,
        }
    }

    /// Picks the first existing candidate.
    ///
    /// # Errors
    ///
    /// Fails if an explicit path does not exist.
    pub fn source(&self, explicit: Option<&Path>) -> Result<ConfigSource> {
        if let Some(path) = explicit {
            anyhow::ensure!(
                path.is_file(),
                "Config file {} does not exist",
                path.display()
            );
            return Ok(ConfigSource::Explicit(path.to_path_buf()));
        }

        if let Some(path) = PROJECT_CONFIG_NAMES
            .iter()
            .map(|name| self.project_dir.join(name))
            .find(|p| p.is_file())
        {
            return Ok(ConfigSource::Project(path));
        }

        if let Some(dir) = &self.global_dir {
            let path = dir.join(GLOBAL_CONFIG_NAME);
            if path.is_file() {
                return Ok(ConfigSource::Global(path));
            }
        }

        let base = self
            .global_dir
            .clone()
            .unwrap_or_else(|| self.project_dir.join(GLOBAL_DIR_NAME));
        Ok(ConfigSource::Default(base))
    }

    /// Resolves and loads the configuration.
    ///
    /// # Errors
    ///
    /// Fails if the chosen file is missing or cannot be parsed.
    pub fn load(&self, explicit: Option<&Path>) -> Result<(ConfigSource, Config)> {
        let source = self.source(explicit)?;
        let config = match &source {
            ConfigSource::Explicit(path)
            | ConfigSource::Project(path)
            | ConfigSource::Global(path) => Config::from_file(path)
                .with_context(|| format!("Failed to load config: {}", path.display()))?,
            ConfigSource::Default(base) => Config {
                storage: StorageConfig::rooted_at(base),
                ..Config::default()
            },
        };
        tracing::debug!("Configuration: {source}");
        Ok((source, config))
    }
}

/// Loads the configuration for `project_dir`.
///
/// # Errors
///
/// See [`ConfigResolver::load`].
pub fn load(project_dir: &Path, explicit: Option<&Path>) -> Result<Config> {
    let (source, config) = ConfigResolver::new(project_dir).load(explicit)?;
    if matches!(source, ConfigSource::Global(_)) {
        tracing::info!("Using global config: {source}");
    }
    Ok(config)
}
