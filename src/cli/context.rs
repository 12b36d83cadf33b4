//! Everything a command needs, assembled once per invocation.

use std::path::{Path, PathBuf};

use crate::config::PreflightConfig;
use crate::install::{Downloader, InstallOrchestrator, ProcessRunner};
use crate::inventory::Inventory;
use crate::launch::ModuleLauncher;
use crate::platform::Arch;
use crate::requirements::{Catalog, ComponentScanner, DEFAULT_INVENTORY_ROOTS};

use super::args::Cli;

/// Banner shown when no title is configured.
pub const DEFAULT_TITLE: &str = "Runtime installer";

/// Prompt shown before relaunching the main application.
pub const PAUSE_PROMPT: &str = "Press any key to continue . . .";

/// Resolved behaviour switches.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    /// Directory the main application and modules live in.
    pub base_dir: PathBuf,
    /// Banner text.
    pub title: String,
    /// Main application, relative to `base_dir`.
    pub app_executable: Option<String>,
    /// Wait for a key before relaunching.
    pub pause_before_launch: bool,
    /// Re-scan after remediation.
    pub verify_after_install: bool,
    /// Plan only.
    pub dry_run: bool,
    /// Inventory roots to enumerate.
    pub inventory_roots: Vec<String>,
    /// Architecture installers and the shared host are resolved for.
    pub arch: Arch,
}

impl Settings {
    /// Settings from a config file; `default_base` applies when the file
    /// names no base directory.
    pub fn from_config(config: &PreflightConfig, default_base: &Path) -> Self {
        Self {
            base_dir: config
                .base_dir
                .clone()
                .unwrap_or_else(|| default_base.to_path_buf()),
            title: config
                .app
                .title
                .clone()
                .unwrap_or_else(|| DEFAULT_TITLE.to_string()),
            app_executable: config.app.executable.clone(),
            pause_before_launch: config.pause_before_launch,
            verify_after_install: config.verify_after_install,
            dry_run: false,
            inventory_roots: config.inventory_roots.clone().unwrap_or_else(|| {
                DEFAULT_INVENTORY_ROOTS.iter().map(|r| r.to_string()).collect()
            }),
            arch: Arch::current(),
        }
    }

    /// Apply command-line flags on top.
    pub fn with_cli(mut self, cli: &Cli) -> Self {
        if cli.no_pause {
            self.pause_before_launch = false;
        }
        if cli.verify {
            self.verify_after_install = true;
        }
        self.dry_run = cli.dry_run;
        self
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self::from_config(&PreflightConfig::default(), Path::new("."))
    }
}

/// Collaborators and settings shared by every command.
pub struct PreflightContext<'a> {
    /// Installed-software inventory.
    pub inventory: &'a dyn Inventory,
    /// Installer download.
    pub downloader: &'a dyn Downloader,
    /// Process launching.
    pub runner: &'a dyn ProcessRunner,
    /// Dependencies to check.
    pub catalog: Catalog,
    /// Behaviour switches.
    pub settings: Settings,
}

impl<'a> PreflightContext<'a> {
    /// Scanner over the configured roots.
    pub fn scanner(&self) -> ComponentScanner<'_> {
        ComponentScanner::new(self.inventory, &self.catalog)
            .with_roots(self.settings.inventory_roots.clone())
    }

    /// Orchestrator for the configured architecture.
    pub fn orchestrator(&self) -> InstallOrchestrator<'_> {
        InstallOrchestrator::new(&self.catalog, self.downloader, self.runner)
            .with_arch(self.settings.arch)
    }

    /// Module launcher rooted at the base directory.
    pub fn launcher(&self) -> ModuleLauncher<'_> {
        ModuleLauncher::new(self.inventory, self.runner, &self.settings.base_dir)
            .with_arch(self.settings.arch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use clap::Parser;

    #[test]
    fn defaults_without_config() {
        let settings = Settings::from_config(&PreflightConfig::default(), Path::new("/opt/app"));
        assert_eq!(settings.base_dir, PathBuf::from("/opt/app"));
        assert_eq!(settings.title, DEFAULT_TITLE);
        assert!(settings.pause_before_launch);
        assert!(!settings.verify_after_install);
        assert!(!settings.dry_run);
        assert_eq!(settings.inventory_roots.len(), DEFAULT_INVENTORY_ROOTS.len());
        assert!(settings.app_executable.is_none());
    }

    #[test]
    fn config_values_are_used() {
        let config = PreflightConfig {
            app: AppConfig {
                executable: Some("App.exe".into()),
                title: Some("App - Runtime installer".into()),
            },
            base_dir: Some(PathBuf::from("/srv/app")),
            inventory_roots: Some(vec![r"SOFTWARE\Custom".into()]),
            ..Default::default()
        };
        let settings = Settings::from_config(&config, Path::new("/ignored"));
        assert_eq!(settings.base_dir, PathBuf::from("/srv/app"));
        assert_eq!(settings.title, "App - Runtime installer");
        assert_eq!(settings.app_executable.as_deref(), Some("App.exe"));
        assert_eq!(settings.inventory_roots, vec![r"SOFTWARE\Custom"]);
    }

    #[test]
    fn cli_flags_override_config() {
        let cli = Cli::try_parse_from(["preflight", "--no-pause", "--verify", "--dry-run"]).unwrap();
        let settings = Settings::default().with_cli(&cli);
        assert!(!settings.pause_before_launch);
        assert!(settings.verify_after_install);
        assert!(settings.dry_run);
    }

    #[test]
    fn absent_flags_keep_config() {
        let config = PreflightConfig {
            verify_after_install: true,
            ..Default::default()
        };
        let cli = Cli::try_parse_from(["preflight"]).unwrap();
        let settings = Settings::from_config(&config, Path::new(".")).with_cli(&cli);
        assert!(settings.verify_after_install);
        assert!(settings.pause_before_launch);
    }
}
