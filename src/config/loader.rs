//! Configuration file discovery and loading.

use crate::config::schema::PreflightConfig;
use crate::error::{PreflightError, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// File name looked up next to the installer executable.
pub const CONFIG_FILE_NAME: &str = "preflight.yml";

/// Default config location for an operating directory.
pub fn default_config_path(base_dir: &Path) -> PathBuf {
    base_dir.join(CONFIG_FILE_NAME)
}

/// Load and parse a config file that must exist.
pub fn load_config_file(path: &Path) -> Result<PreflightConfig> {
    let content = fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            PreflightError::ConfigNotFound {
                path: path.to_path_buf(),
            }
        } else {
            PreflightError::Io(e)
        }
    })?;

    parse_config(&content, path)
}

/// Parse YAML content into PreflightConfig.
///
/// # Arguments
///
/// * `content` - The YAML content to parse
/// * `source_path` - Path for error reporting
pub fn parse_config(content: &str, source_path: &Path) -> Result<PreflightConfig> {
    if content.trim().is_empty() {
        return Ok(PreflightConfig::default());
    }
    serde_yaml::from_str(content).map_err(|e| PreflightError::ConfigParseError {
        path: source_path.to_path_buf(),
        message: e.to_string(),
    })
}

/// Load configuration for a run.
///
/// An explicit path must exist. Without one, `preflight.yml` in
/// `base_dir` is used when present and built-in defaults otherwise.
pub fn load_config(base_dir: &Path, config_override: Option<&Path>) -> Result<PreflightConfig> {
    if let Some(override_path) = config_override {
        return load_config_file(override_path);
    }

    let path = default_config_path(base_dir);
    if path.exists() {
        tracing::debug!("Loading config from {}", path.display());
        load_config_file(&path)
    } else {
        tracing::debug!("No config at {}; using defaults", path.display());
        Ok(PreflightConfig::default())
    }
}
