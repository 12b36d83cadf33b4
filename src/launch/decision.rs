//! Choosing what an invocation does.
//!
//! The same binary is started as a first-run installer (no arguments), as
//! a single-category check (`vc` or `net`), and as a shim in front of an
//! auxiliary module that needs its host runtime verified first.

use crate::requirements::Category;

/// Token selecting the native runtime check.
pub const NATIVE_TOKEN: &str = "vc";

/// Token selecting the .NET check.
pub const DOTNET_TOKEN: &str = "net";

/// What this invocation should do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LaunchDecision {
    /// Scan everything, remediate, pause, relaunch the main application.
    Full,
    /// Scan and remediate one category, then exit without relaunching.
    CheckOnly(Category),
    /// Hand off to an auxiliary module.
    ///
    /// With `verify` set, that category is checked and remediated first.
    /// The native runtime is never scanned on this path.
    LaunchModule {
        module: String,
        verify: Option<Category>,
    },
}

fn is_token(arg: &str, token: &str) -> bool {
    arg.trim().eq_ignore_ascii_case(token)
}

impl LaunchDecision {
    /// Decide from the trailing invocation arguments.
    ///
    /// `vc` and `net` are recognized anywhere in the list, in any case;
    /// `vc` wins when both are present. The module name is the last
    /// argument that is neither. Blank arguments and option-shaped ones
    /// (`-x`, `--name`) are ignored, so an unrecognized option falls
    /// through to the full flow.
    pub fn from_args<S: AsRef<str>>(args: &[S]) -> Self {
        let args: Vec<&str> = args
            .iter()
            .map(|a| a.as_ref())
            .filter(|a| {
                let a = a.trim();
                !a.is_empty() && !a.starts_with('-')
            })
            .collect();

        if args.iter().any(|a| is_token(a, NATIVE_TOKEN)) {
            return Self::CheckOnly(Category::NativeRuntime);
        }

        let wants_dotnet = args.iter().any(|a| is_token(a, DOTNET_TOKEN));
        let module = args
            .iter()
            .rev()
            .find(|a| !is_token(a, DOTNET_TOKEN))
            .map(|a| a.trim().to_string());

        match (module, wants_dotnet) {
            (Some(module), true) => Self::LaunchModule {
                module,
                verify: Some(Category::DotNet),
            },
            (Some(module), false) => Self::LaunchModule {
                module,
                verify: None,
            },
            (None, true) => Self::CheckOnly(Category::DotNet),
            (None, false) => Self::Full,
        }
    }

    /// Whether the main application is relaunched at the end.
    pub fn relaunches_main(&self) -> bool {
        matches!(self, Self::Full)
    }
}
