//! Process launching.
//!
//! Installers are run synchronously so the next step sees the system
//! they leave behind. The main application and auxiliary modules are
//! started detached; this process exits right after.

use std::path::Path;
use std::process::{Command, Stdio};
use std::time::{Duration, Instant};

use crate::error::{PreflightError, Result};

/// Exit codes Windows installers use for success.
///
/// 1641 and 3010 mean a reboot was started or is pending; 1638 means a
/// newer version is already present.
pub const INSTALLER_SUCCESS_CODES: &[i32] = &[0, 1638, 1641, 3010];

/// Whether an installer exit code counts as installed.
pub fn is_installer_success(code: i32) -> bool {
    INSTALLER_SUCCESS_CODES.contains(&code)
}

/// Result of a process that was waited on.
#[derive(Debug, Clone)]
pub struct RunResult {
    /// Exit code (None if killed by signal).
    pub exit_code: Option<i32>,

    /// Execution duration.
    pub duration: Duration,
}

/// Starts external programs.
pub trait ProcessRunner {
    /// Run `program` with `args` and block until it exits.
    fn run_and_wait(&self, program: &Path, args: &[String]) -> Result<RunResult>;

    /// Start `program` and return immediately.
    ///
    /// `hidden` suppresses a console window where the platform has one.
    fn spawn_detached(
        &self,
        program: &Path,
        args: &[String],
        cwd: Option<&Path>,
        hidden: bool,
    ) -> Result<()>;
}

/// Runs programs with `std::process`.
#[derive(Debug, Default)]
pub struct SystemRunner;

impl SystemRunner {
    /// Create a new runner.
    pub fn new() -> Self {
        Self
    }
}

fn launch_error(program: &Path, e: std::io::Error) -> PreflightError {
    PreflightError::LaunchFailed {
        program: program.display().to_string(),
        message: e.to_string(),
    }
}

#[cfg(windows)]
fn hide_window(cmd: &mut Command, hidden: bool) {
    use std::os::windows::process::CommandExt;
    const CREATE_NO_WINDOW: u32 = 0x0800_0000;
    const DETACHED_PROCESS: u32 = 0x0000_0008;
    let flags = if hidden { CREATE_NO_WINDOW } else { DETACHED_PROCESS };
    cmd.creation_flags(flags);
}

#[cfg(not(windows))]
fn hide_window(_cmd: &mut Command, _hidden: bool) {}

impl ProcessRunner for SystemRunner {
    fn run_and_wait(&self, program: &Path, args: &[String]) -> Result<RunResult> {
        let start = Instant::now();
        tracing::debug!("Running {} {:?}", program.display(), args);

        let status = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .status()
            .map_err(|e| launch_error(program, e))?;

        Ok(RunResult {
            exit_code: status.code(),
            duration: start.elapsed(),
        })
    }

    fn spawn_detached(
        &self,
        program: &Path,
        args: &[String],
        cwd: Option<&Path>,
        hidden: bool,
    ) -> Result<()> {
        tracing::debug!("Starting {} {:?}", program.display(), args);

        let mut cmd = Command::new(program);
        cmd.args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null());
        if let Some(dir) = cwd {
            cmd.current_dir(dir);
        }
        hide_window(&mut cmd, hidden);

        cmd.spawn().map_err(|e| launch_error(program, e))?;
        Ok(())
    }
}
