//! Configuration schema definitions.
//!
//! This module contains the struct definitions that map to the
//! `preflight.yml` file format.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Root configuration structure for preflight.yml
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PreflightConfig {
    /// Main application launched after the checks
    pub app: AppConfig,

    /// Directory the main application and modules live in
    /// (defaults to the installer's own directory)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_dir: Option<PathBuf>,

    /// Wait for a key press before launching the main application
    pub pause_before_launch: bool,

    /// Re-scan the inventory after installing missing dependencies
    pub verify_after_install: bool,

    /// Where installer artifacts are downloaded to
    #[serde(skip_serializing_if = "Option::is_none")]
    pub download_dir: Option<PathBuf>,

    /// Inventory keys enumerated for installed software, in scan order
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inventory_roots: Option<Vec<String>>,

    /// Per-dependency overrides of the built-in catalog, keyed by
    /// dependency key (`vc`, `webview`, `desktop-runtime`, `aspcore`)
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub dependencies: BTreeMap<String, DependencyOverride>,
}

impl Default for PreflightConfig {
    fn default() -> Self {
        Self {
            app: AppConfig::default(),
            base_dir: None,
            pause_before_launch: true,
            verify_after_install: false,
            download_dir: None,
            inventory_roots: None,
            dependencies: BTreeMap::new(),
        }
    }
}

/// The application this installer guards.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    /// Executable file name, relative to the base directory
    #[serde(skip_serializing_if = "Option::is_none")]
    pub executable: Option<String>,

    /// Console title / banner text
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

/// Overrides for one catalog entry. Unset fields keep the built-in value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DependencyOverride {
    /// Minimum acceptable version
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_version: Option<String>,

    /// Installer URL used for every architecture
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    /// Expected SHA-256 of the installer, hex encoded
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sha256: Option<String>,

    /// Arguments that make the installer run silently
    #[serde(skip_serializing_if = "Option::is_none")]
    pub args: Option<Vec<String>>,

    /// Substrings that must all appear in an inventory display name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub match_all: Option<Vec<String>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_pause_and_skip_verification() {
        let config = PreflightConfig::default();
        assert!(config.pause_before_launch);
        assert!(!config.verify_after_install);
        assert!(config.app.executable.is_none());
        assert!(config.dependencies.is_empty());
    }

    #[test]
    fn empty_yaml_is_default() {
        let config: PreflightConfig = serde_yaml::from_str("{}").unwrap();
        assert_eq!(config, PreflightConfig::default());
    }

    #[test]
    fn parses_full_config() {
        let yaml = r#"
app:
  executable: TcNo-Acc-Switcher.exe
  title: TcNo Account Switcher - Runtime installer
pause_before_launch: false
verify_after_install: true
download_dir: /tmp/preflight
inventory_roots:
  - 'SOFTWARE\Microsoft\Windows\CurrentVersion\Uninstall'
dependencies:
  webview:
    min_version: "100.0"
    sha256: abcd
  aspcore:
    url: https://example.com/aspnetcore.exe
    args: ["/quiet"]
    match_all: ["ASP.NET Core 8"]
"#;
        let config: PreflightConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.app.executable.as_deref(), Some("TcNo-Acc-Switcher.exe"));
        assert!(!config.pause_before_launch);
        assert!(config.verify_after_install);
        assert_eq!(config.inventory_roots.as_ref().map(|r| r.len()), Some(1));
        let webview = &config.dependencies["webview"];
        assert_eq!(webview.min_version.as_deref(), Some("100.0"));
        assert!(webview.url.is_none());
        let aspcore = &config.dependencies["aspcore"];
        assert_eq!(aspcore.args.as_deref(), Some(&["/quiet".to_string()][..]));
    }

    #[test]
    fn rejects_unknown_fields() {
        let result: Result<PreflightConfig, _> = serde_yaml::from_str("pause: true");
        assert!(result.is_err());
        let result: Result<PreflightConfig, _> =
            serde_yaml::from_str("dependencies:\n  vc:\n    version: '1'");
        assert!(result.is_err());
    }
}
