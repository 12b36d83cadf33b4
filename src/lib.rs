//! Preflight - runtime dependency installer.
//!
//! Preflight runs before a host application starts. It checks that the
//! native and .NET runtimes the application needs are installed at or
//! above their minimum versions, silently installs whatever is missing,
//! and then hands off to the application or to one of its modules.
//!
//! # Modules
//!
//! - [`cli`] - Command-line interface, argument parsing and commands
//! - [`config`] - Configuration loading and parsing
//! - [`error`] - Error types and result aliases
//! - [`install`] - Installer download, execution and orchestration
//! - [`inventory`] - Installed-software inventory access
//! - [`launch`] - Invocation routing and process handoff
//! - [`platform`] - Architecture and environment detection
//! - [`requirements`] - Dependency catalog, scanning and status
//! - [`ui`] - Console output, spinners and pauses
//! - [`version`] - Version parsing and comparison
//!
//! # Example
//!
//! ```
//! use preflight::inventory::SnapshotInventory;
//! use preflight::requirements::{Catalog, ComponentScanner, DependencyKind};
//!
//! let inventory = SnapshotInventory::new().with_key(
//!     r"SOFTWARE\Microsoft\Windows\CurrentVersion\Uninstall\{F3017226}",
//!     &[
//!         ("DisplayName", "Microsoft Edge WebView2 Runtime"),
//!         ("DisplayVersion", "120.0.2210.91"),
//!     ],
//! );
//! let catalog = Catalog::builtin();
//! let report = ComponentScanner::new(&inventory, &catalog).scan(&DependencyKind::ALL);
//!
//! assert!(report.requirements.is_met(DependencyKind::WebViewRuntime));
//! assert!(!report.requirements.is_met(DependencyKind::NativeRuntime));
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod install;
pub mod inventory;
pub mod launch;
pub mod platform;
pub mod requirements;
pub mod ui;
pub mod version;

pub use error::{PreflightError, Result};
