//! Command implementations.
//!
//! Each command implements the [`Command`] trait, which provides a uniform
//! interface for executing commands and reporting results.
//!
//! # Architecture
//!
//! Commands are dispatched via [`CommandDispatcher`], which routes a
//! [`crate::launch::LaunchDecision`] to one of:
//! - [`RunCommand`] - full check, remediation and relaunch
//! - [`CheckCommand`] - one category, no relaunch
//! - [`LaunchCommand`] - module handoff

pub mod check;
pub mod dispatcher;
pub mod launch;
pub mod run;

pub use check::{show_installed, verify_and_remediate, CheckCommand};
pub use dispatcher::{Command, CommandDispatcher, CommandResult};
pub use launch::LaunchCommand;
pub use run::RunCommand;
