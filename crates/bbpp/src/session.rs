//! One-call wiring of configuration, storage and evaluators.

use bbpp_core::{
    ActiveSetResolver, AnalysisResult, Analyzer, AnalyzerError, Config, EvaluatorRegistry,
    RepositoryError, RuleRepository, WorkflowData,
};
use bbpp_rules::{default_registry, master_rule_set};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

/// Errors raised by a [`Session`].
#[derive(Debug, Error)]
pub enum SessionError {
    /// A workflow data document could not be read.
    #[error("failed to read workflow data {path}: {source}")]
    Read {
        /// Document path.
        path: PathBuf,
        /// Underlying IO error.
        source: std::io::Error,
    },

    /// A workflow data document is not valid JSON of the expected shape.
    #[error("invalid workflow data {path}: {source}")]
    Parse {
        /// Document path.
        path: PathBuf,
        /// Underlying JSON error.
        source: serde_json::Error,
    },

    /// Storage failure.
    #[error(transparent)]
    Repository(#[from] RepositoryError),

    /// The analyzer could not be built.
    #[error(transparent)]
    Analyzer(#[from] AnalyzerError),
}

/// Configuration, resolver and evaluators for one process.
///
/// Every call to [`Session::analyzer`] snapshots the active selection at
/// that moment.
#[derive(Debug, Clone)]
pub struct Session {
    config: Config,
    resolver: ActiveSetResolver,
    registry: EvaluatorRegistry,
}

impl Session {
    /// Opens a session with the built-in evaluators.
    #[must_use]
    pub fn open(config: Config) -> Self {
        let resolver = ActiveSetResolver::new(&config.storage);
        debug!(
            "Session storage: rules in {}, selection in {}",
            config.storage.rules_dir.display(),
            config.storage.user_config.display()
        );
        Self {
            config,
            resolver,
            registry: default_registry(),
        }
    }

    /// Replaces the evaluator registry.
    #[must_use]
    pub fn with_registry(mut self, registry: EvaluatorRegistry) -> Self {
        self.registry = registry;
        self
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Returns the active-set resolver.
    #[must_use]
    pub fn resolver(&self) -> &ActiveSetResolver {
        &self.resolver
    }

    /// Returns the rule repository.
    #[must_use]
    pub fn repository(&self) -> &RuleRepository {
        self.resolver.repository()
    }

    /// Returns the evaluator registry.
    #[must_use]
    pub fn registry(&self) -> &EvaluatorRegistry {
        &self.registry
    }

    /// Writes the built-in Master set to storage.
    ///
    /// An existing Master document is left alone unless `overwrite` is set,
    /// in which case it is backed up first. Returns the document path.
    ///
    /// # Errors
    ///
    /// Fails if the document cannot be written.
    pub fn install_master(&self, overwrite: bool) -> Result<PathBuf, RepositoryError> {
        let master = master_rule_set();
        let repository = self.repository();
        let path = repository.rules_dir().join(master.filename());

        if path.exists() && !overwrite {
            debug!("Master set already present at {}", path.display());
            return Ok(path);
        }

        let outcome = repository.replace_set(&master)?;
        info!("Installed Master set at {}", outcome.destination.display());
        Ok(outcome.destination)
    }

    /// Builds an analyzer over `sets`, or the persisted selection.
    ///
    /// # Errors
    ///
    /// Fails if the analyzer cannot be built.
    pub fn analyzer(&self, sets: Option<Vec<String>>) -> Result<Analyzer, AnalyzerError> {
        let mut builder = Analyzer::builder()
            .resolver(self.resolver.clone())
            .registry(self.registry.clone())
            .config(self.config.clone());
        if let Some(sets) = sets {
            builder = builder.sets(sets);
        }
        builder.build()
    }

    /// Analyzes workflows against `sets`, or the persisted selection.
    ///
    /// # Errors
    ///
    /// Fails if the analyzer cannot be built.
    pub fn check(
        &self,
        workflows: &[WorkflowData],
        sets: Option<Vec<String>>,
    ) -> Result<AnalysisResult, SessionError> {
        Ok(self.analyzer(sets)?.analyze_all(workflows))
    }

    /// Reads one workflow data document.
    ///
    /// # Errors
    ///
    /// Fails if the file cannot be read or does not parse.
    pub fn load_workflow(path: &Path) -> Result<WorkflowData, SessionError> {
        let content = std::fs::read_to_string(path).map_err(|e| SessionError::Read {
            path: path.to_path_buf(),
            source: e,
        })?;
        let mut workflow: WorkflowData =
            serde_json::from_str(&content).map_err(|e| SessionError::Parse {
                path: path.to_path_buf(),
                source: e,
            })?;
        if workflow.file_path.as_os_str().is_empty() {
            workflow.file_path = path.to_path_buf();
        }
        Ok(workflow)
    }
}
