//! Invocation routing and process handoff.

pub mod decision;
pub mod handoff;

pub use decision::{LaunchDecision, DOTNET_TOKEN, NATIVE_TOKEN};
pub use handoff::{host_key, module_path, relaunch_main, resolve_host, ModuleLauncher};
