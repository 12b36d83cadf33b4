//! CLI argument definitions.
//!
//! This module defines all CLI arguments using clap's derive macros.
//! The main entry point is the [`Cli`] struct. Behaviour selection is
//! left to the trailing arguments, see [`crate::launch::LaunchDecision`].
//!
//! The binary is started by other programs with arguments it may not know
//! about, so [`Cli::parse_lenient`] sets unknown options aside instead of
//! rejecting the whole command line.

use clap::{CommandFactory, Parser};
use std::ffi::OsString;
use std::path::PathBuf;

/// Verifies required runtimes, installs missing ones, then starts the application.
#[derive(Debug, Default, Parser)]
#[command(name = "preflight")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to config file (overrides preflight.yml next to the executable)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Read installed software from a YAML snapshot instead of the system
    #[arg(long, value_name = "YAML")]
    pub inventory: Option<PathBuf>,

    /// Do not wait for a key press before launching the application
    #[arg(long)]
    pub no_pause: bool,

    /// Re-scan after installing and report anything still missing
    #[arg(long)]
    pub verify: bool,

    /// Show what would be installed or launched without doing it
    #[arg(long)]
    pub dry_run: bool,

    /// Show verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Minimal output
    #[arg(short, long)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,

    /// `vc`, `net`, and/or the name of a module to launch
    #[arg(value_name = "ARGS")]
    pub args: Vec<String>,
}

impl Cli {
    /// Parse `args`, setting aside options this binary does not define.
    ///
    /// Returns the parsed arguments and the options that were set aside.
    /// Tokens after `--` are kept as trailing arguments. Errors are left for
    /// known options used wrongly, and for `--help` / `--version`.
    pub fn parse_lenient<I, T>(args: I) -> Result<(Self, Vec<String>), clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString>,
    {
        let options = KnownOptions::new();
        let mut args = args
            .into_iter()
            .map(|a| a.into().to_string_lossy().into_owned());

        let mut kept: Vec<String> = args.next().into_iter().collect();
        let mut ignored = Vec::new();
        let mut literal = false;
        for arg in args {
            if literal || !is_option(&arg) || options.recognizes(&arg) {
                literal |= arg == "--";
                kept.push(arg);
            } else {
                ignored.push(arg);
            }
        }

        Ok((Self::try_parse_from(kept)?, ignored))
    }
}

fn is_option(arg: &str) -> bool {
    arg.len() > 1 && arg.starts_with('-') && arg != "--"
}

/// Option names defined on [`Cli`], plus the ones clap adds.
struct KnownOptions {
    longs: Vec<String>,
    /// Short name and whether it takes a value.
    shorts: Vec<(char, bool)>,
}

impl KnownOptions {
    fn new() -> Self {
        let command = Cli::command();
        let mut longs: Vec<String> = command
            .get_arguments()
            .filter_map(|a| a.get_long())
            .map(str::to_string)
            .collect();
        longs.extend(["help".to_string(), "version".to_string()]);

        let mut shorts: Vec<(char, bool)> = command
            .get_arguments()
            .filter_map(|a| a.get_short().map(|c| (c, a.get_action().takes_values())))
            .collect();
        shorts.extend([('h', false), ('V', false)]);

        Self { longs, shorts }
    }

    fn recognizes(&self, arg: &str) -> bool {
        if let Some(long) = arg.strip_prefix("--") {
            let name = long.split('=').next().unwrap_or(long);
            return self.longs.iter().any(|l| l == name);
        }

        // A short cluster such as `-vq`, or `-cfile.yml` for a value-taking short
        for c in arg[1..].chars() {
            match self.shorts.iter().find(|(s, _)| *s == c) {
                Some((_, true)) => return true,
                Some((_, false)) => {}
                None => return false,
            }
        }
        true
    }
}
