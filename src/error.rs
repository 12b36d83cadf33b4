//! Error types for preflight operations.
//!
//! This module defines [`PreflightError`], the primary error type used
//! throughout the crate, and a [`Result`] type alias for convenience.
//!
//! # Error Handling Strategy
//!
//! - Use `PreflightError` for failures that callers report per dependency
//! - Use `anyhow::Error` (via `PreflightError::Other`) for unexpected errors
//! - None of these abort the default flow: the orchestrator logs them and
//!   moves on to the next dependency

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for preflight operations.
#[derive(Debug, Error)]
pub enum PreflightError {
    /// Configuration file not found at expected location.
    #[error("Configuration not found: {path}")]
    ConfigNotFound { path: PathBuf },

    /// Failed to parse configuration file.
    #[error("Failed to parse config at {path}: {message}")]
    ConfigParseError { path: PathBuf, message: String },

    /// An inventory key is absent or could not be opened.
    #[error("Inventory key unreadable: {path}: {message}")]
    InventoryUnreadable { path: String, message: String },

    /// A version string could not be turned into numeric segments.
    #[error("Cannot parse version '{input}': {message}")]
    VersionParse { input: String, message: String },

    /// Fetching an installer artifact failed.
    #[error("Download of '{dependency}' failed: {message}")]
    DownloadFailed { dependency: String, message: String },

    /// Downloaded installer does not match the configured digest.
    #[error("Checksum mismatch for '{dependency}': expected {expected}, got {actual}")]
    ChecksumMismatch {
        dependency: String,
        expected: String,
        actual: String,
    },

    /// Installer process exited unsuccessfully.
    #[error("Installer for '{dependency}' failed with exit code {code:?}")]
    InstallFailed {
        dependency: String,
        code: Option<i32>,
    },

    /// A program could not be started.
    #[error("Failed to launch {program}: {message}")]
    LaunchFailed { program: String, message: String },

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic wrapped error for anyhow interop.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type alias for preflight operations.
pub type Result<T> = std::result::Result<T, PreflightError>;
