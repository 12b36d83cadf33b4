//! Command-line interface.
//!
//! # Architecture
//!
//! - [`args`] - Argument definitions using clap derive macros
//! - [`context`] - Collaborators and settings shared by commands
//! - [`commands`] - Command implementations

pub mod args;
pub mod commands;
pub mod context;

pub use args::Cli;
pub use commands::{Command, CommandDispatcher, CommandResult};
pub use context::{PreflightContext, Settings, DEFAULT_TITLE, PAUSE_PROMPT};
