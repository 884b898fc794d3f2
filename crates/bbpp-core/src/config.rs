//! Configuration types for bbpp.

use crate::types::Severity;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Top-level configuration for bbpp.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Where rule sets and the user selection are stored.
    #[serde(default)]
    pub storage: StorageConfig,

    /// Analysis settings.
    #[serde(default)]
    pub analysis: AnalysisConfig,

    /// Local per-rule overrides, keyed by rule id.
    #[serde(default)]
    pub rules: HashMap<String, RuleOverride>,
}

impl Config {
    /// Creates a new default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from a TOML file.
    ///
    /// Relative storage paths are resolved against the file's directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        let mut config = Self::parse(&content)?;
        if let Some(base) = path.parent() {
            config.storage = config.storage.relative_to(base);
        }
        Ok(config)
    }

    /// Parses configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is invalid.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::Parse {
            message: e.to_string(),
        })
    }

    /// Checks if a rule is enabled by local configuration.
    ///
    /// Returns `None` when the configuration says nothing about the rule.
    #[must_use]
    pub fn rule_enabled(&self, rule_id: &str) -> Option<bool> {
        self.rules.get(rule_id).and_then(|c| c.enabled)
    }

    /// Gets the severity override for a rule.
    #[must_use]
    pub fn rule_severity(&self, rule_id: &str) -> Option<Severity> {
        self.rules.get(rule_id).and_then(|c| c.severity)
    }
}

/// Storage locations. Passed explicitly to the repository and resolver.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Directory holding one JSON document per rule set.
    #[serde(default = "default_rules_dir")]
    pub rules_dir: PathBuf,

    /// Path of the user configuration document.
    #[serde(default = "default_user_config")]
    pub user_config: PathBuf,

    /// Set file selected when no user configuration exists yet.
    #[serde(default = "default_master_file")]
    pub default_set: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            rules_dir: default_rules_dir(),
            user_config: default_user_config(),
            default_set: default_master_file(),
        }
    }
}

impl StorageConfig {
    /// Creates a storage configuration rooted at `base`.
    ///
    /// Rule sets live in `base/rules`, the user selection in
    /// `base/user_config.json`.
    #[must_use]
    pub fn rooted_at(base: &Path) -> Self {
        Self::default().relative_to(base)
    }

    /// Resolves relative paths against `base`.
    #[must_use]
    pub fn relative_to(mut self, base: &Path) -> Self {
        if self.rules_dir.is_relative() {
            self.rules_dir = base.join(&self.rules_dir);
        }
        if self.user_config.is_relative() {
            self.user_config = base.join(&self.user_config);
        }
        self
    }
}

fn default_rules_dir() -> PathBuf {
    PathBuf::from("rules")
}

fn default_user_config() -> PathBuf {
    PathBuf::from("user_config.json")
}

fn default_master_file() -> String {
    crate::model::set_filename(MASTER_SET_NAME)
}

/// Name of the built-in aggregate set.
pub const MASTER_SET_NAME: &str = "Master";

/// Analysis-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Severity at or above which a check run fails (default: error).
    #[serde(default)]
    pub fail_on: Option<Severity>,
}

/// Local override for one rule.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RuleOverride {
    /// Force the rule on or off.
    #[serde(default)]
    pub enabled: Option<bool>,

    /// Severity override for this rule.
    #[serde(default)]
    pub severity: Option<Severity>,
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// IO error reading config file.
    #[error("Failed to read config file {path}: {source}")]
    Io {
        /// Path that failed to read.
        path: PathBuf,
        /// Underlying IO error.
        source: std::io::Error,
    },

    /// Parse error in config file.
    #[error("Failed to parse config: {message}")]
    Parse {
        /// Parse error message.
        message: String,
    },
}
