//! Installer download and execution.
//!
//! - [`Downloader`] fetches installer artifacts ([`HttpDownloader`] over HTTPS)
//! - [`ProcessRunner`] starts programs, waiting or detached ([`SystemRunner`])
//! - [`InstallOrchestrator`] drives both for every unmet dependency

pub mod downloader;
pub mod orchestrator;
pub mod runner;

pub use downloader::{default_download_dir, Downloader, HttpDownloader};
pub use orchestrator::{InstallAction, InstallOrchestrator, InstallOutcome, RemediationReport};
pub use runner::{is_installer_success, ProcessRunner, RunResult, SystemRunner, INSTALLER_SUCCESS_CODES};
