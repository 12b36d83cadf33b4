//! Runtime requirement detection.
//!
//! This module decides whether the native and .NET runtime components the
//! application needs are installed at or above their minimum versions.
//!
//! # Modules
//!
//! - [`catalog`] - The declarative table of required dependencies
//! - [`scanner`] - Inventory scan that evaluates the catalog
//! - [`status`] - Per-dependency met/unmet results

pub mod catalog;
pub mod scanner;
pub mod status;

pub use catalog::{
    Catalog, Category, DependencyKind, DependencySpec, InstallerSource, NameMatcher, Probe,
    DEFAULT_INVENTORY_ROOTS,
};
pub use scanner::{ComponentScanner, MatchedEntry, ScanReport};
pub use status::RequirementSet;
