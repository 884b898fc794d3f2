//! Rule-set document storage.
//!
//! The repository exclusively owns the documents under its rules directory.
//! Every write goes through a temporary file in the target directory that is
//! persisted over the destination, so a failed write never leaves a
//! half-written document behind.

use crate::config::StorageConfig;
use crate::document::dto::{AggregateDocument, AggregateEntry, AggregateMetadata, RuleSetDocument};
use crate::document::{self, loader, StructureError};
use crate::model::{set_filename, RuleSet, SET_FILE_EXTENSION};

use miette::Diagnostic;
use serde_json::Value;
use std::io::Write;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Suffix marker of backup files: `<filename>.backup_<timestamp>`.
pub const BACKUP_MARKER: &str = ".backup_";

/// Timestamp format used in backup file names.
const BACKUP_TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

/// Errors from rule-set storage operations.
#[derive(Debug, Error, Diagnostic)]
pub enum RepositoryError {
    /// IO error reading or writing a document.
    #[error("IO error on {path}: {source}")]
    #[diagnostic(code(bbpp::repository::io))]
    Io {
        /// Path involved.
        path: PathBuf,
        /// Underlying IO error.
        source: std::io::Error,
    },

    /// The source document does not exist.
    #[error("rule-set document not found: {path}")]
    #[diagnostic(code(bbpp::repository::not_found))]
    NotFound {
        /// Missing path.
        path: PathBuf,
    },

    /// The document is not a valid rule-set document.
    #[error("invalid rule-set document {path}: {message}")]
    #[diagnostic(
        code(bbpp::repository::invalid),
        help("a rule-set document is a JSON object with a `rules` list; every rule needs id, name, category, severity and enabled")
    )]
    Validation {
        /// Offending document.
        path: PathBuf,
        /// Human-readable reason.
        message: String,
    },

    /// Serializing a document failed.
    #[error("failed to serialize {path}: {source}")]
    #[diagnostic(code(bbpp::repository::serialize))]
    Serialize {
        /// Destination path.
        path: PathBuf,
        /// Underlying serde error.
        source: serde_json::Error,
    },
}

impl RepositoryError {
    fn io(path: &Path, source: std::io::Error) -> Self {
        if source.kind() == std::io::ErrorKind::NotFound {
            Self::NotFound {
                path: path.to_path_buf(),
            }
        } else {
            Self::Io {
                path: path.to_path_buf(),
                source,
            }
        }
    }

    fn validation(path: &Path, message: impl ToString) -> Self {
        Self::Validation {
            path: path.to_path_buf(),
            message: message.to_string(),
        }
    }
}

/// Outcome of writing an imported document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportOutcome {
    /// Where the document was written.
    pub destination: PathBuf,
    /// Where the previous document was moved, if one existed.
    pub backup: Option<PathBuf>,
}

/// Loads, saves and moves rule-set documents in one storage directory.
#[derive(Debug, Clone)]
pub struct RuleRepository {
    rules_dir: PathBuf,
}

impl RuleRepository {
    /// Creates a repository over the configured rules directory.
    #[must_use]
    pub fn new(storage: &StorageConfig) -> Self {
        Self {
            rules_dir: storage.rules_dir.clone(),
        }
    }

    /// Creates a repository over an explicit directory.
    #[must_use]
    pub fn at(rules_dir: impl Into<PathBuf>) -> Self {
        Self {
            rules_dir: rules_dir.into(),
        }
    }

    /// Returns the rules directory.
    #[must_use]
    pub fn rules_dir(&self) -> &Path {
        &self.rules_dir
    }

    /// Returns the storage path for a set identifier.
    ///
    /// Identifiers ending in `.json` are taken as filenames; anything else is
    /// treated as a set name and mapped through [`set_filename`].
    #[must_use]
    pub fn path_for(&self, identifier: &str) -> PathBuf {
        let is_filename = Path::new(identifier)
            .extension()
            .is_some_and(|ext| ext == SET_FILE_EXTENSION);
        if is_filename {
            self.rules_dir.join(identifier)
        } else {
            self.rules_dir.join(set_filename(identifier))
        }
    }

    /// Checks the minimal structure of a parsed document.
    ///
    /// # Errors
    ///
    /// Returns the reason the document is invalid.
    pub fn validate_structure(document: &Value) -> Result<(), StructureError> {
        document::validate_structure(document)
    }

    /// Loads and validates a rule-set document.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError::NotFound`] if the file does not exist and
    /// [`RepositoryError::Validation`] if it is not a valid document.
    pub fn load(&self, path: &Path) -> Result<RuleSet, RepositoryError> {
        let content = read(path)?;
        let set = document::parse_rule_set(&content)
            .map_err(|e| RepositoryError::validation(path, e))?;
        debug!(
            "Loaded set '{}' ({} rules) from {}",
            set.metadata.name,
            set.rules.len(),
            path.display()
        );
        Ok(set)
    }

    /// Loads a set by identifier (filename or set name).
    ///
    /// # Errors
    ///
    /// See [`RuleRepository::load`].
    pub fn load_set(&self, identifier: &str) -> Result<RuleSet, RepositoryError> {
        self.load(&self.path_for(identifier))
    }

    /// Saves a rule set to `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the atomic write fails.
    pub fn save(&self, set: &RuleSet, path: &Path) -> Result<(), RepositoryError> {
        let content = to_json(&loader::to_document(set), path)?;
        write_atomic(path, content.as_bytes())?;
        debug!("Saved set '{}' to {}", set.metadata.name, path.display());
        Ok(())
    }

    /// Saves a rule set under its derived filename in the rules directory.
    ///
    /// # Errors
    ///
    /// See [`RuleRepository::save`].
    pub fn save_set(&self, set: &RuleSet) -> Result<PathBuf, RepositoryError> {
        let path = self.rules_dir.join(set.filename());
        self.save(set, &path)?;
        Ok(path)
    }

    /// Saves a rule set under its derived filename, backing up any existing
    /// document the way [`RuleRepository::import`] does.
    ///
    /// # Errors
    ///
    /// Fails if serialization, the backup or the write fails.
    pub fn replace_set(&self, set: &RuleSet) -> Result<ImportOutcome, RepositoryError> {
        let dest_name = set.filename();
        let content = to_json(&loader::to_document(set), &self.rules_dir.join(&dest_name))?;
        self.install(content.as_bytes(), &dest_name)
    }

    /// Copies a valid document verbatim to `dest`.
    ///
    /// # Errors
    ///
    /// Fails if the source does not exist or is not a valid document.
    pub fn export(&self, source: &Path, dest: &Path) -> Result<(), RepositoryError> {
        let content = read(source)?;
        document::parse_rule_set(&content).map_err(|e| RepositoryError::validation(source, e))?;
        write_atomic(dest, content.as_bytes())?;
        info!("Exported {} to {}", source.display(), dest.display());
        Ok(())
    }

    /// Imports a document into the rules directory as `dest_name`.
    ///
    /// `dest_name` is a set identifier as accepted by
    /// [`RuleRepository::path_for`] and must not contain path components.
    /// The source is validated before storage is touched. An existing
    /// destination is renamed to `<filename>.backup_<timestamp>` first; if
    /// the new document cannot be written the backup is moved back.
    ///
    /// # Errors
    ///
    /// Fails if `dest_name` is not a plain identifier, if the source is
    /// missing or invalid, or if the backup or write fails.
    pub fn import(&self, source: &Path, dest_name: &str) -> Result<ImportOutcome, RepositoryError> {
        let filename = self.destination_filename(dest_name)?;
        let content = read(source)?;
        document::parse_rule_set(&content).map_err(|e| RepositoryError::validation(source, e))?;
        let outcome = self.install(content.as_bytes(), &filename)?;
        info!(
            "Imported {} as {}",
            source.display(),
            outcome.destination.display()
        );
        Ok(outcome)
    }

    /// Writes an aggregate document holding the given sets, in order.
    ///
    /// # Errors
    ///
    /// Fails if any named set cannot be loaded or the write fails.
    pub fn export_all(&self, set_ids: &[String], dest: &Path) -> Result<usize, RepositoryError> {
        let sets = set_ids
            .iter()
            .map(|id| self.load_set(id))
            .collect::<Result<Vec<_>, _>>()?;

        let aggregate = AggregateDocument {
            metadata: AggregateMetadata {
                name: "BBPP configuration export".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                exported_at: chrono::Local::now().to_rfc3339(),
                sets_count: sets.len(),
            },
            sets: sets
                .iter()
                .map(|set| {
                    let doc = loader::to_document(set);
                    AggregateEntry {
                        metadata: doc.metadata,
                        enabled: doc.enabled,
                        dependencies: doc.dependencies,
                        rules: doc.rules,
                    }
                })
                .collect(),
        };

        let content = to_json(&aggregate, dest)?;
        write_atomic(dest, content.as_bytes())?;
        info!("Exported {} set(s) to {}", sets.len(), dest.display());
        Ok(sets.len())
    }

    /// Splits an aggregate export back into one document per set.
    ///
    /// Every entry is validated before any document is written, including
    /// that no two entries map to the same filename. Each set is written
    /// under its derived filename with the same backup behavior as
    /// [`RuleRepository::import`], keeping its `enabled` flag and
    /// dependencies.
    ///
    /// # Errors
    ///
    /// Fails if the source is missing or invalid, or if a write fails.
    pub fn import_aggregate(&self, source: &Path) -> Result<Vec<ImportOutcome>, RepositoryError> {
        let content = read(source)?;
        let aggregate =
            document::parse_aggregate(&content).map_err(|e| RepositoryError::validation(source, e))?;

        let mut outcomes = Vec::with_capacity(aggregate.sets.len());
        for entry in aggregate.sets {
            let dest_name = set_filename(&entry.metadata.name);
            let doc = RuleSetDocument {
                metadata: entry.metadata,
                enabled: entry.enabled,
                dependencies: entry.dependencies,
                rules: entry.rules,
            };
            let dest = self.rules_dir.join(&dest_name);
            let content = to_json(&doc, &dest)?;
            outcomes.push(self.install(content.as_bytes(), &dest_name)?);
        }

        info!(
            "Imported {} set(s) from aggregate {}",
            outcomes.len(),
            source.display()
        );
        Ok(outcomes)
    }

    /// Lists all `*.json` documents in the rules directory, sorted.
    ///
    /// # Errors
    ///
    /// Fails if the directory pattern is invalid.
    pub fn list_documents(&self) -> Result<Vec<PathBuf>, RepositoryError> {
        self.glob(&format!("*.{SET_FILE_EXTENSION}"))
    }

    /// Lists backups of `filename`, oldest first.
    ///
    /// # Errors
    ///
    /// Fails if the directory pattern is invalid.
    pub fn list_backups(&self, filename: &str) -> Result<Vec<PathBuf>, RepositoryError> {
        self.glob(&format!(
            "{}{BACKUP_MARKER}*",
            glob::Pattern::escape(filename)
        ))
    }

    fn glob(&self, file_pattern: &str) -> Result<Vec<PathBuf>, RepositoryError> {
        if !self.rules_dir.is_dir() {
            return Ok(Vec::new());
        }
        let dir = glob::Pattern::escape(&self.rules_dir.to_string_lossy());
        let pattern = format!("{dir}/{file_pattern}");
        let entries = glob::glob(&pattern)
            .map_err(|e| RepositoryError::validation(&self.rules_dir, e))?;

        let mut paths = Vec::new();
        for entry in entries {
            match entry {
                Ok(path) if path.is_file() => paths.push(path),
                Ok(_) => {}
                Err(e) => warn!("Skipping unreadable entry: {e}"),
            }
        }
        paths.sort();
        Ok(paths)
    }

    /// Maps an import identifier to a document filename inside the rules
    /// directory.
    fn destination_filename(&self, dest_name: &str) -> Result<String, RepositoryError> {
        let is_plain = !dest_name.trim().is_empty()
            && Path::new(dest_name).file_name() == Some(dest_name.as_ref());
        if !is_plain {
            return Err(RepositoryError::validation(
                &self.rules_dir.join(dest_name),
                format!("'{dest_name}' is not a plain set name or filename"),
            ));
        }
        let path = self.path_for(dest_name);
        path.file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .ok_or_else(|| {
                RepositoryError::validation(&path, "destination has no file name")
            })
    }

    /// Writes `content` as `dest_name`, backing up any existing document.
    fn install(&self, content: &[u8], dest_name: &str) -> Result<ImportOutcome, RepositoryError> {
        let destination = self.rules_dir.join(dest_name);
        let backup = if destination.exists() {
            Some(backup_existing(&destination)?)
        } else {
            None
        };

        if let Err(e) = write_atomic(&destination, content) {
            if let Some(backup) = &backup {
                warn!(
                    "Write to {} failed, restoring {}",
                    destination.display(),
                    backup.display()
                );
                if let Err(restore) = std::fs::rename(backup, &destination) {
                    warn!("Failed to restore backup {}: {restore}", backup.display());
                }
            }
            return Err(e);
        }

        Ok(ImportOutcome {
            destination,
            backup,
        })
    }
}

/// Renames `path` to a fresh `<name>.backup_<timestamp>` sibling.
fn backup_existing(path: &Path) -> Result<PathBuf, RepositoryError> {
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let stamp = chrono::Local::now().format(BACKUP_TIMESTAMP_FORMAT);
    let base = format!("{file_name}{BACKUP_MARKER}{stamp}");

    let mut backup = path.with_file_name(&base);
    let mut n = 1;
    while backup.exists() {
        backup = path.with_file_name(format!("{base}_{n}"));
        n += 1;
    }

    std::fs::rename(path, &backup).map_err(|e| RepositoryError::io(path, e))?;
    info!("Backed up {} to {}", path.display(), backup.display());
    Ok(backup)
}

fn read(path: &Path) -> Result<String, RepositoryError> {
    std::fs::read_to_string(path).map_err(|e| RepositoryError::io(path, e))
}

fn to_json<T: serde::Serialize>(value: &T, path: &Path) -> Result<String, RepositoryError> {
    serde_json::to_string_pretty(value)
        .map(|mut s| {
            s.push('\n');
            s
        })
        .map_err(|e| RepositoryError::Serialize {
            path: path.to_path_buf(),
            source: e,
        })
}

/// Writes `content` to `path` through a temporary sibling file.
pub(crate) fn write_atomic(path: &Path, content: &[u8]) -> Result<(), RepositoryError> {
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(dir).map_err(|e| RepositoryError::io(dir, e))?;

    let mut tmp = tempfile::NamedTempFile::new_in(dir).map_err(|e| RepositoryError::io(dir, e))?;
    tmp.write_all(content)
        .and_then(|()| tmp.as_file().sync_all())
        .map_err(|e| RepositoryError::io(tmp.path(), e))?;
    tmp.persist(path)
        .map_err(|e| RepositoryError::io(path, e.error))?;
    Ok(())
}
