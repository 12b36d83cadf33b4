//! The default flow: check everything, install what is missing, relaunch.

use crate::error::Result;
use crate::launch::relaunch_main;
use crate::requirements::DependencyKind;
use crate::ui::UserInterface;

use crate::cli::context::{PreflightContext, PAUSE_PROMPT};
use super::check::verify_and_remediate;
use super::dispatcher::{Command, CommandResult};

/// Full scan, remediation and relaunch of the main application.
pub struct RunCommand<'a> {
    ctx: &'a PreflightContext<'a>,
}

impl<'a> RunCommand<'a> {
    /// Create the default flow.
    pub fn new(ctx: &'a PreflightContext<'a>) -> Self {
        Self { ctx }
    }
}

impl Command for RunCommand<'_> {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let settings = &self.ctx.settings;
        verify_and_remediate(self.ctx, &DependencyKind::ALL, true, ui);

        let Some(executable) = settings.app_executable.as_deref() else {
            tracing::info!(
                "Skipping relaunch: set app.executable in preflight.yml next to {}",
                settings.base_dir.display()
            );
            ui.warning("No application executable configured; nothing to launch");
            return Ok(CommandResult::success());
        };

        if settings.dry_run {
            ui.message(&format!(
                "Would launch {}",
                settings.base_dir.join(executable).display()
            ));
            return Ok(CommandResult::success());
        }

        if settings.pause_before_launch {
            ui.pause(PAUSE_PROMPT);
        }

        match relaunch_main(self.ctx.runner, &settings.base_dir, executable) {
            Ok(()) => Ok(CommandResult::success()),
            Err(e) => {
                ui.error(&e.to_string());
                Ok(CommandResult::failure(1))
            }
        }
    }
}
