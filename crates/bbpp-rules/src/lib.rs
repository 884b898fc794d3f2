//! # bbpp-rules
//!
//! Built-in evaluators for bbpp.
//!
//! Each evaluator implements one `rule_type`. Rules select an evaluator by
//! type and configure it through their typed options; the evaluators
//! themselves hold no state.
//!
//! ## Available Evaluators
//!
//! | Rule type | Evaluator | Checks |
//! |-----------|-----------|--------|
//! | `variable_naming` | [`VariableNaming`] | Variable names follow a case convention |
//! | `argument_prefix` | [`ArgumentPrefix`] | Arguments carry their direction prefix |
//! | `argument_description` | [`ArgumentDescription`] | Arguments have an annotation |
//! | `empty_catch` | [`EmptyCatch`] | Catch handlers are not empty |
//! | `comment_ratio` | [`CommentRatio`] | Commented lines stay within bounds |
//! | `logging_presence` | [`LoggingPresence`] | Workflows log at least a few messages |
//! | `activity_default_name` | [`ActivityDefaultName`] | Activities are renamed from their type |
//! | `workflow_size` | [`WorkflowSize`] | Workflows stay below an activity count |
//!
//! ## Usage
//!
//! ```ignore
//! use bbpp_core::Analyzer;
//! use bbpp_rules::{default_registry, master_rule_set};
//!
//! let analyzer = Analyzer::builder()
//!     .rules(master_rule_set().rules)
//!     .registry(default_registry())
//!     .build()?;
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod activity_default_name;
mod argument_description;
mod argument_prefix;
mod comment_ratio;
mod empty_catch;
mod logging_presence;
mod presets;
mod variable_naming;
mod workflow_size;

pub use activity_default_name::ActivityDefaultName;
pub use argument_description::ArgumentDescription;
pub use argument_prefix::ArgumentPrefix;
pub use comment_ratio::CommentRatio;
pub use empty_catch::EmptyCatch;
pub use logging_presence::LoggingPresence;
pub use presets::{all_evaluators, default_registry, master_rule_set};
pub use variable_naming::VariableNaming;
pub use workflow_size::WorkflowSize;

/// Re-export core types for convenience.
pub use bbpp_core::{Evaluator, Finding, Rule, RuleType, Severity};
