//! Single-category check, and the scan/remediate step shared by every flow.

use crate::error::Result;
use crate::requirements::{Category, DependencyKind, RequirementSet, ScanReport};
use crate::ui::UserInterface;

use crate::cli::context::PreflightContext;
use super::dispatcher::{Command, CommandResult};

/// Print the matched inventory entries.
pub fn show_installed(report: &ScanReport, ui: &mut dyn UserInterface) {
    if report.matches.is_empty() {
        ui.message("  (none found)");
        return;
    }
    let details = ui.output_mode().shows_details();
    for entry in &report.matches {
        if details && !entry.meets_minimum {
            ui.message(&format!(
                " - {} [{}] (below minimum)",
                entry.display_name, entry.version
            ));
        } else {
            ui.message(&format!(" - {} [{}]", entry.display_name, entry.version));
        }
    }
}

/// Scan `kinds`, install whatever is missing, and return the final status.
///
/// Installed kinds count as met unless re-verification is on, in which
/// case only a second scan can mark them met. With `dry_run` the planned
/// installs are listed and nothing changes.
pub fn verify_and_remediate(
    ctx: &PreflightContext<'_>,
    kinds: &[DependencyKind],
    list_installed: bool,
    ui: &mut dyn UserInterface,
) -> RequirementSet {
    let scanner = ctx.scanner();
    let report = scanner.scan(kinds);

    if list_installed {
        ui.message("Currently installed runtimes:");
        show_installed(&report, ui);
        ui.message("");
    }

    let unmet = report.requirements.unmet_kinds();
    if unmet.is_empty() {
        ui.success("All required runtimes are installed");
        return report.requirements;
    }

    for kind in &unmet {
        if let Some(spec) = ctx.catalog.get(*kind) {
            ui.warning(&format!(
                "Missing: {} (requires {} or newer)",
                spec.display_name, spec.min_version
            ));
        } else {
            ui.warning(&format!("Missing: {}", kind));
        }
    }

    let orchestrator = ctx.orchestrator();
    if ctx.settings.dry_run {
        for action in orchestrator.plan(&unmet) {
            ui.message(&format!(
                "Would install {} from {} {}",
                action.spec.display_name,
                action.url().unwrap_or("<no url>"),
                action.args().join(" ")
            ));
        }
        return report.requirements;
    }

    let remediation = orchestrator.remediate(&unmet, ui);
    for (kind, err) in remediation.failures() {
        tracing::debug!("{} remained unmet", kind);
        ui.error(&err.to_string());
    }

    let mut status = report.requirements.clone();
    if ctx.settings.verify_after_install {
        let rescan = scanner.scan(&unmet);
        for kind in rescan.requirements.unmet_kinds() {
            let name = ctx
                .catalog
                .get(kind)
                .map(|s| s.display_name.clone())
                .unwrap_or_else(|| kind.to_string());
            ui.warning(&format!("{} is still not detected after installing", name));
        }
        status.merge(&rescan.requirements);
    } else {
        for kind in remediation.installed() {
            status.mark_met(kind);
        }
    }
    status
}

/// Check and remediate one category, then stop.
pub struct CheckCommand<'a> {
    ctx: &'a PreflightContext<'a>,
    category: Category,
}

impl<'a> CheckCommand<'a> {
    /// Create a check for `category`.
    pub fn new(ctx: &'a PreflightContext<'a>, category: Category) -> Self {
        Self { ctx, category }
    }
}

impl Command for CheckCommand<'_> {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        tracing::info!("Checking {}", self.category.label());
        let status = verify_and_remediate(self.ctx, &self.category.kinds(), true, ui);

        if status.all_met() {
            Ok(CommandResult::success())
        } else {
            Ok(CommandResult::failure(1))
        }
    }
}
