//! Handoff to an auxiliary module, optionally after a .NET check.

use crate::error::Result;
use crate::requirements::Category;
use crate::ui::UserInterface;

use crate::cli::context::PreflightContext;
use super::check::verify_and_remediate;
use super::dispatcher::{Command, CommandResult};

/// Start a named module through the shared host.
pub struct LaunchCommand<'a> {
    ctx: &'a PreflightContext<'a>,
    module: String,
    verify: Option<Category>,
}

impl<'a> LaunchCommand<'a> {
    /// Create a handoff to `module`, checking `verify` first if given.
    pub fn new(ctx: &'a PreflightContext<'a>, module: &str, verify: Option<Category>) -> Self {
        Self {
            ctx,
            module: module.to_string(),
            verify,
        }
    }
}

impl Command for LaunchCommand<'_> {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        if let Some(category) = self.verify {
            verify_and_remediate(self.ctx, &category.kinds(), false, ui);
        }

        let launcher = self.ctx.launcher();
        if self.ctx.settings.dry_run {
            let (host, args) = launcher.command_for(&self.module);
            ui.message(&format!("Would launch {} {}", host.display(), args.join(" ")));
            return Ok(CommandResult::success());
        }

        match launcher.launch(&self.module) {
            Ok(()) => Ok(CommandResult::success()),
            Err(e) => {
                ui.error(&e.to_string());
                Ok(CommandResult::failure(1))
            }
        }
    }
}
