//! Configuration loading and parsing.
//!
//! - Schema definitions in [`schema`]
//! - File discovery and loading in [`loader`]
//!
//! Every field is optional. Without a config file the built-in catalog
//! and defaults apply.
//!
//! # Example
//!
//! ```
//! use preflight::config::load_config;
//! use tempfile::TempDir;
//! use std::fs;
//!
//! let temp = TempDir::new().unwrap();
//! fs::write(temp.path().join("preflight.yml"), "app:\n  executable: App.exe").unwrap();
//!
//! let config = load_config(temp.path(), None).unwrap();
//! assert_eq!(config.app.executable, Some("App.exe".to_string()));
//! ```

pub mod loader;
pub mod schema;

pub use loader::{
    default_config_path, load_config, load_config_file, parse_config, CONFIG_FILE_NAME,
};
pub use schema::{AppConfig, DependencyOverride, PreflightConfig};
