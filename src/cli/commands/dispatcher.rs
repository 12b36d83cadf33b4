//! Command dispatching.
//!
//! This module provides the core command infrastructure:
//! - [`Command`] trait for implementing commands
//! - [`CommandResult`] for uniform result reporting
//! - [`CommandDispatcher`] for routing a [`LaunchDecision`]

use crate::cli::context::PreflightContext;
use crate::error::Result;
use crate::launch::LaunchDecision;
use crate::ui::UserInterface;

use super::check::CheckCommand;
use super::launch::LaunchCommand;
use super::run::RunCommand;

/// Trait for command implementations.
pub trait Command {
    /// Execute the command.
    ///
    /// # Arguments
    ///
    /// * `ui` - User interface for displaying output
    ///
    /// # Returns
    ///
    /// A [`CommandResult`] indicating success/failure and exit code.
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult>;
}

/// Result of command execution.
#[derive(Debug, PartialEq, Eq)]
pub struct CommandResult {
    /// Whether the command succeeded.
    pub success: bool,

    /// Exit code to use (0 for success, non-zero for failure).
    pub exit_code: i32,
}

impl CommandResult {
    /// Create a successful result.
    pub fn success() -> Self {
        Self {
            success: true,
            exit_code: 0,
        }
    }

    /// Create a failure result.
    pub fn failure(exit_code: i32) -> Self {
        Self {
            success: false,
            exit_code,
        }
    }

    /// Exit status for the process; codes outside `0..=255` become 1.
    pub fn process_status(&self) -> u8 {
        u8::try_from(self.exit_code).unwrap_or(1)
    }
}

/// Routes an invocation to its command.
pub struct CommandDispatcher<'a> {
    ctx: &'a PreflightContext<'a>,
}

impl<'a> CommandDispatcher<'a> {
    /// Create a dispatcher over `ctx`.
    pub fn new(ctx: &'a PreflightContext<'a>) -> Self {
        Self { ctx }
    }

    /// Show the banner and execute the command `decision` selects.
    pub fn dispatch(
        &self,
        decision: &LaunchDecision,
        ui: &mut dyn UserInterface,
    ) -> Result<CommandResult> {
        tracing::debug!("Dispatching {:?}", decision);
        ui.show_header(&self.ctx.settings.title);

        match decision {
            LaunchDecision::Full => RunCommand::new(self.ctx).execute(ui),
            LaunchDecision::CheckOnly(category) => {
                CheckCommand::new(self.ctx, *category).execute(ui)
            }
            LaunchDecision::LaunchModule { module, verify } => {
                LaunchCommand::new(self.ctx, module, *verify).execute(ui)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::context::Settings;
    use crate::install::{HttpDownloader, ProcessRunner, RunResult};
    use crate::inventory::SnapshotInventory;
    use crate::platform::Arch;
    use crate::requirements::{Catalog, Category};
    use crate::ui::MockUI;
    use std::cell::RefCell;
    use std::path::{Path, PathBuf};

    #[derive(Default)]
    struct RecordingRunner {
        waited: RefCell<Vec<PathBuf>>,
        spawned: RefCell<Vec<PathBuf>>,
    }

    impl ProcessRunner for RecordingRunner {
        fn run_and_wait(&self, program: &Path, _: &[String]) -> Result<RunResult> {
            self.waited.borrow_mut().push(program.to_path_buf());
            Ok(RunResult {
                exit_code: Some(0),
                duration: std::time::Duration::ZERO,
            })
        }

        fn spawn_detached(&self, program: &Path, _: &[String], _: Option<&Path>, _: bool) -> Result<()> {
            self.spawned.borrow_mut().push(program.to_path_buf());
            Ok(())
        }
    }

    fn dispatch_without_http(decision: LaunchDecision) -> (CommandResult, RecordingRunner, MockUI) {
        let temp = tempfile::TempDir::new().unwrap();
        let downloader = HttpDownloader::without_client(temp.path(), "no TLS backend");
        let inventory = SnapshotInventory::new();
        let runner = RecordingRunner::default();
        let mut ui = MockUI::new();
        let ctx = PreflightContext {
            inventory: &inventory,
            downloader: &downloader,
            runner: &runner,
            catalog: Catalog::builtin(),
            settings: Settings {
                base_dir: PathBuf::from("/opt/switcher"),
                app_executable: Some("TcNo-Acc-Switcher.exe".into()),
                arch: Arch::X64,
                ..Settings::default()
            },
        };
        let result = CommandDispatcher::new(&ctx).dispatch(&decision, &mut ui).unwrap();
        (result, runner, ui)
    }

    #[test]
    fn unusable_http_client_still_relaunches_main() {
        let (result, runner, ui) = dispatch_without_http(LaunchDecision::Full);

        assert_eq!(result, CommandResult::success());
        assert!(runner.waited.borrow().is_empty());
        assert_eq!(
            runner.spawned.borrow().as_slice(),
            &[PathBuf::from("/opt/switcher/TcNo-Acc-Switcher.exe")]
        );
        assert!(ui.has_output("no TLS backend"));
    }

    #[test]
    fn unusable_http_client_still_launches_module() {
        let decision = LaunchDecision::LaunchModule {
            module: "TcNo-Acc-Switcher-Server".into(),
            verify: Some(Category::DotNet),
        };
        let (result, runner, _) = dispatch_without_http(decision);

        assert_eq!(result, CommandResult::success());
        assert_eq!(runner.spawned.borrow().len(), 1);
    }

    #[test]
    fn command_result_success() {
        let result = CommandResult::success();
        assert!(result.success);
        assert_eq!(result.exit_code, 0);
    }

    #[test]
    fn command_result_failure() {
        let result = CommandResult::failure(1);
        assert!(!result.success);
        assert_eq!(result.exit_code, 1);
    }

    #[test]
    fn process_status_does_not_truncate() {
        assert_eq!(CommandResult::success().process_status(), 0);
        assert_eq!(CommandResult::failure(2).process_status(), 2);
        assert_eq!(CommandResult::failure(256).process_status(), 1);
        assert_eq!(CommandResult::failure(-1).process_status(), 1);
    }
}
