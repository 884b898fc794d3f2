//! Active-set resolution.
//!
//! Reads and writes the persisted selection of active sets and merges the
//! selected sets into one effective rule collection. Order of the selection
//! is conflict priority: when two sets define the same rule id, the set
//! listed first wins and later duplicates are dropped.

use crate::config::StorageConfig;
use crate::model::{Rule, RuleSet, UserConfig};
use crate::repository::{write_atomic, RepositoryError, RuleRepository};

use serde::Serialize;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Summary of one rule-set document found in storage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SetSummary {
    /// Set name from metadata.
    pub name: String,
    /// Document filename.
    pub filename: String,
    /// Full document path.
    pub filepath: PathBuf,
    /// Set version.
    pub version: String,
    /// Set author.
    pub author: String,
    /// Set description.
    pub description: String,
    /// Number of rules in the set.
    pub rules_count: usize,
    /// Whether the set is in the active selection.
    pub is_active: bool,
}

/// Resolves which sets are active and which rules they contribute.
#[derive(Debug, Clone)]
pub struct ActiveSetResolver {
    repository: RuleRepository,
    user_config_path: PathBuf,
    default_set: String,
}

impl ActiveSetResolver {
    /// Creates a resolver over the configured storage.
    #[must_use]
    pub fn new(storage: &StorageConfig) -> Self {
        Self {
            repository: RuleRepository::new(storage),
            user_config_path: storage.user_config.clone(),
            default_set: storage.default_set.clone(),
        }
    }

    /// Returns the underlying repository.
    #[must_use]
    pub fn repository(&self) -> &RuleRepository {
        &self.repository
    }

    /// Returns the user configuration path.
    #[must_use]
    pub fn user_config_path(&self) -> &Path {
        &self.user_config_path
    }

    /// Reads the user configuration.
    ///
    /// A missing or unreadable document is replaced by defaults, which are
    /// written back. This never fails; write errors are only logged.
    #[must_use]
    pub fn load_user_config(&self) -> UserConfig {
        match std::fs::read_to_string(&self.user_config_path) {
            Ok(content) => match serde_json::from_str::<UserConfig>(&content) {
                Ok(config) => return config,
                Err(e) => warn!(
                    "User config {} is corrupt ({e}), regenerating defaults",
                    self.user_config_path.display()
                ),
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                info!(
                    "No user config at {}, creating defaults",
                    self.user_config_path.display()
                );
            }
            Err(e) => warn!(
                "Cannot read user config {} ({e}), using defaults",
                self.user_config_path.display()
            ),
        }

        let config = UserConfig::with_sets(vec![self.default_set.clone()]);
        if let Err(e) = self.write_user_config(&config) {
            warn!("Failed to write default user config: {e}");
        }
        config
    }

    /// Returns the ordered active selection.
    #[must_use]
    pub fn get_active_set_names(&self) -> Vec<String> {
        self.load_user_config().active_bbpp_sets
    }

    /// Persists the given ordered selection verbatim.
    ///
    /// # Errors
    ///
    /// Fails if the user configuration cannot be written.
    pub fn set_active_set_names(&self, names: &[String]) -> Result<(), RepositoryError> {
        let config = UserConfig::with_sets(names.to_vec());
        self.write_user_config(&config)?;
        info!("Active sets: {}", names.join(", "));
        Ok(())
    }

    fn write_user_config(&self, config: &UserConfig) -> Result<(), RepositoryError> {
        let content =
            serde_json::to_string_pretty(config).map_err(|e| RepositoryError::Serialize {
                path: self.user_config_path.clone(),
                source: e,
            })?;
        write_atomic(&self.user_config_path, content.as_bytes())
    }

    /// Lists every rule-set document in storage with its activation state.
    ///
    /// Documents that fail to load are skipped with a warning.
    ///
    /// # Errors
    ///
    /// Fails if the storage directory cannot be scanned.
    pub fn list_available_sets(&self) -> Result<Vec<SetSummary>, RepositoryError> {
        let active: HashSet<PathBuf> = self
            .get_active_set_names()
            .iter()
            .map(|id| self.repository.path_for(id))
            .collect();

        let mut summaries = Vec::new();
        for path in self.repository.list_documents()? {
            if path == self.user_config_path {
                continue;
            }
            let set = match self.repository.load(&path) {
                Ok(set) => set,
                Err(e) => {
                    warn!("Skipping {}: {e}", path.display());
                    continue;
                }
            };
            let filename = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            summaries.push(SetSummary {
                name: set.metadata.name,
                filename,
                is_active: active.contains(&path),
                filepath: path,
                version: set.metadata.version,
                author: set.metadata.author,
                description: set.metadata.description,
                rules_count: set.rules.len(),
            });
        }
        Ok(summaries)
    }

    /// Loads the named sets (default: the active selection) and merges them.
    ///
    /// Sets that cannot be loaded are skipped with a warning, disabled sets
    /// contribute nothing, and duplicate rule ids resolve to the first set in
    /// `set_names` order.
    #[must_use]
    pub fn get_effective_rules(&self, set_names: Option<&[String]>) -> Vec<Rule> {
        let names = match set_names {
            Some(names) => names.to_vec(),
            None => self.get_active_set_names(),
        };

        let sets = names
            .iter()
            .filter_map(|id| match self.repository.load_set(id) {
                Ok(set) => Some(set),
                Err(e) => {
                    warn!("Skipping set '{id}': {e}");
                    None
                }
            });

        let rules = merge_rule_sets(sets);
        info!(
            "Resolved {} effective rule(s) from {} set(s)",
            rules.len(),
            names.len()
        );
        rules
    }

    /// Filters a rule collection to enabled rules.
    #[must_use]
    pub fn get_enabled_rules(rules: &[Rule]) -> Vec<Rule> {
        rules.iter().filter(|r| r.enabled).cloned().collect()
    }

    /// Exports all active sets into one aggregate document.
    ///
    /// # Errors
    ///
    /// Fails if an active set cannot be loaded or the write fails.
    pub fn export_all_active(&self, dest: &Path) -> Result<usize, RepositoryError> {
        self.repository
            .export_all(&self.get_active_set_names(), dest)
    }
}

/// Merges rule sets in priority order.
///
/// Disabled sets are skipped. The first occurrence of each rule id wins.
#[must_use]
pub fn merge_rule_sets(sets: impl IntoIterator<Item = RuleSet>) -> Vec<Rule> {
    let mut seen = HashSet::new();
    let mut merged = Vec::new();

    for set in sets {
        if !set.enabled {
            debug!("Skipping disabled set '{}'", set.metadata.name);
            continue;
        }
        for rule in set.rules {
            if seen.insert(rule.id.clone()) {
                merged.push(rule);
            } else {
                debug!(
                    "Dropping duplicate rule '{}' from set '{}'",
                    rule.id, set.metadata.name
                );
            }
        }
    }

    merged
}
