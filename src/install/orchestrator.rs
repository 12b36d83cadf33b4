//! Remediation of unmet dependencies.
//!
//! For each unmet kind, in catalog order: download the installer, run it
//! with its silent arguments and wait. A failure is reported and the next
//! dependency is attempted; nothing is retried.

use std::fs;

use crate::error::{PreflightError, Result};
use crate::platform::Arch;
use crate::requirements::{Catalog, DependencyKind, DependencySpec};
use crate::ui::UserInterface;

use super::downloader::Downloader;
use super::runner::{is_installer_success, ProcessRunner};

/// One planned installer run.
#[derive(Debug, Clone)]
pub struct InstallAction<'a> {
    /// Catalog entry being installed.
    pub spec: &'a DependencySpec,
    /// Architecture of the artifact to fetch.
    pub arch: Arch,
}

impl InstallAction<'_> {
    /// URL the installer will be fetched from.
    pub fn url(&self) -> Option<&str> {
        self.spec.installer.url_for(self.arch)
    }

    /// Arguments passed to the installer.
    pub fn args(&self) -> &[String] {
        &self.spec.installer.args
    }
}

/// Result of attempting one dependency.
#[derive(Debug)]
pub enum InstallOutcome {
    /// The installer ran and exited with a success code.
    Installed { exit_code: i32 },
    /// Download or installation failed.
    Failed(PreflightError),
}

impl InstallOutcome {
    /// Check if the dependency was installed.
    pub fn is_installed(&self) -> bool {
        matches!(self, Self::Installed { .. })
    }
}

/// Per-dependency outcomes of one remediation pass.
#[derive(Debug, Default)]
pub struct RemediationReport {
    outcomes: Vec<(DependencyKind, InstallOutcome)>,
}

impl RemediationReport {
    /// All outcomes, in the order they were attempted.
    pub fn outcomes(&self) -> &[(DependencyKind, InstallOutcome)] {
        &self.outcomes
    }

    /// Kinds whose installer succeeded.
    pub fn installed(&self) -> Vec<DependencyKind> {
        self.outcomes
            .iter()
            .filter(|(_, o)| o.is_installed())
            .map(|(k, _)| *k)
            .collect()
    }

    /// Kinds that could not be installed, with the reason.
    pub fn failures(&self) -> Vec<(DependencyKind, &PreflightError)> {
        self.outcomes
            .iter()
            .filter_map(|(k, o)| match o {
                InstallOutcome::Failed(e) => Some((*k, e)),
                InstallOutcome::Installed { .. } => None,
            })
            .collect()
    }

    /// Check if every attempted dependency was installed.
    pub fn all_installed(&self) -> bool {
        self.outcomes.iter().all(|(_, o)| o.is_installed())
    }

    /// Check if nothing was attempted.
    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }
}

/// Downloads and runs installers for unmet dependencies.
pub struct InstallOrchestrator<'a> {
    catalog: &'a Catalog,
    downloader: &'a dyn Downloader,
    runner: &'a dyn ProcessRunner,
    arch: Arch,
}

impl<'a> InstallOrchestrator<'a> {
    /// Create an orchestrator for the running architecture.
    pub fn new(
        catalog: &'a Catalog,
        downloader: &'a dyn Downloader,
        runner: &'a dyn ProcessRunner,
    ) -> Self {
        Self {
            catalog,
            downloader,
            runner,
            arch: Arch::current(),
        }
    }

    /// Fetch artifacts for another architecture.
    pub fn with_arch(mut self, arch: Arch) -> Self {
        self.arch = arch;
        self
    }

    /// Order `unmet` into installer runs.
    ///
    /// Actions follow catalog order regardless of input order, duplicates
    /// collapse, and kinds without a catalog entry are dropped with a warning.
    pub fn plan(&self, unmet: &[DependencyKind]) -> Vec<InstallAction<'a>> {
        let mut kinds = unmet.to_vec();
        kinds.sort();
        kinds.dedup();

        kinds
            .into_iter()
            .filter_map(|kind| match self.catalog.get(kind) {
                Some(spec) => Some(InstallAction {
                    spec,
                    arch: self.arch,
                }),
                None => {
                    tracing::warn!("No installer known for {}", kind);
                    None
                }
            })
            .collect()
    }

    /// Install every dependency in `unmet`.
    pub fn remediate(
        &self,
        unmet: &[DependencyKind],
        ui: &mut dyn UserInterface,
    ) -> RemediationReport {
        let mut report = RemediationReport::default();

        for action in self.plan(unmet) {
            let outcome = self.execute(&action, ui);
            match &outcome {
                InstallOutcome::Installed { exit_code } => tracing::info!(
                    "{} installed (exit code {})",
                    action.spec.display_name,
                    exit_code
                ),
                InstallOutcome::Failed(e) => tracing::warn!("{}", e),
            }
            report.outcomes.push((action.spec.kind, outcome));
        }

        report
    }

    /// Download and run one installer.
    pub fn execute(&self, action: &InstallAction<'_>, ui: &mut dyn UserInterface) -> InstallOutcome {
        let name = &action.spec.display_name;
        let mut spinner = ui.start_spinner(&format!("Downloading {}...", name));

        match self.download_and_run(action, spinner.as_mut()) {
            Ok(exit_code) => {
                spinner.finish_success(&format!("{} installed", name));
                InstallOutcome::Installed { exit_code }
            }
            Err(e) => {
                spinner.finish_error(&e.to_string());
                InstallOutcome::Failed(e)
            }
        }
    }

    fn download_and_run(
        &self,
        action: &InstallAction<'_>,
        spinner: &mut dyn crate::ui::SpinnerHandle,
    ) -> Result<i32> {
        let spec = action.spec;
        let artifact = self.downloader.fetch(spec, action.arch)?;

        spinner.set_message(&format!("Installing {}...", spec.display_name));
        let result = self.runner.run_and_wait(&artifact, action.args());

        if let Err(e) = fs::remove_file(&artifact) {
            tracing::debug!("Could not remove {}: {}", artifact.display(), e);
        }

        let result = result?;
        tracing::debug!(
            "{} installer finished in {:?}",
            spec.display_name,
            result.duration
        );

        match result.exit_code {
            Some(code) if is_installer_success(code) => Ok(code),
            code => Err(PreflightError::InstallFailed {
                dependency: spec.display_name.clone(),
                code,
            }),
        }
    }
}
