//! Subcommand implementations.

pub mod check;
pub mod init;
pub mod list_rules;
pub mod output;
pub mod sets;
