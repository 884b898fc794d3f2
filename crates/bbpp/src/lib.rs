//! # bbpp
//!
//! Best-practice rule engine for automation workflows.
//!
//! This is the facade crate that re-exports the core framework and the
//! built-in evaluators, and wires them together in a [`Session`].
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use bbpp::{Config, Session};
//!
//! let session = Session::open(Config::from_file("bbpp.toml".as_ref())?);
//! session.install_master(false)?;
//!
//! let workflow = Session::load_workflow("out/Main.json".as_ref())?;
//! let result = session.check(&[workflow], None)?;
//! print!("{}", result.format_report());
//! ```
//!
//! ## Custom Evaluators
//!
//! ```rust,ignore
//! let mut registry = bbpp::rules::default_registry();
//! registry.register(Box::new(MyEvaluator));
//! let session = Session::open(config).with_registry(registry);
//! ```

#![forbid(unsafe_code)]

// Re-export core types and traits
pub use bbpp_core::*;

/// Built-in evaluators and the Master rule set.
pub mod rules {
    pub use bbpp_rules::*;
}

mod session;

pub use session::{Session, SessionError};
