//! # bbpp-core
//!
//! Core framework for workflow best-practice linting.
//!
//! This crate provides the rule document model and the machinery around it:
//!
//! - [`RuleRepository`] for loading, saving, exporting and importing rule sets
//! - [`ActiveSetResolver`] for merging the active sets into effective rules
//! - [`Evaluator`] trait and [`EvaluatorRegistry`] for rule-type checks
//! - [`Analyzer`] for dispatching effective rules over workflow data
//! - [`Finding`] for representing violations
//!
//! ## Example
//!
//! ```ignore
//! use bbpp_core::{ActiveSetResolver, Analyzer, StorageConfig};
//!
//! let resolver = ActiveSetResolver::new(&StorageConfig::rooted_at(".bbpp".as_ref()));
//! let analyzer = Analyzer::builder()
//!     .resolver(resolver)
//!     .registry(my_registry())
//!     .build()?;
//!
//! let result = analyzer.analyze_all(&workflows);
//! print!("{}", result.format_report());
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod analyzer;
mod config;
mod evaluator;
mod model;
mod options;
mod repository;
mod resolver;
mod types;
mod workflow;

/// Rule-set document format: DTOs, structural validation, conversion.
pub mod document;

/// Utility modules for evaluator implementations.
pub mod utils;

pub use analyzer::{Analyzer, AnalyzerBuilder, AnalyzerError};
pub use config::{
    AnalysisConfig, Config, ConfigError, RuleOverride, StorageConfig, MASTER_SET_NAME,
};
pub use evaluator::{Evaluator, EvaluatorBox, EvaluatorRegistry};
pub use model::{
    set_filename, ModelError, Rule, RuleSet, RuleType, SetMetadata, UserConfig,
    SET_FILE_EXTENSION, SET_FILE_PREFIX, USER_CONFIG_VERSION,
};
pub use options::{
    ArgumentDescriptionOptions, ArgumentPrefixOptions, CommentRatioOptions, DirectionPrefixes,
    LoggingPresenceOptions, NamingConvention, NamingOptions, RuleOptions, WhitelistOptions,
    WorkflowSizeOptions, EXCEPTIONS_KEY,
};
pub use repository::{ImportOutcome, RepositoryError, RuleRepository, BACKUP_MARKER};
pub use resolver::{merge_rule_sets, ActiveSetResolver, SetSummary};
pub use types::{AnalysisResult, Finding, Location, Severity};
pub use workflow::{Activity, Argument, ArgumentDirection, TryCatchBlock, Variable, WorkflowData};
