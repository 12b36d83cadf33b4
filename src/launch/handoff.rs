//! Handing off to the main application or an auxiliary module.
//!
//! Modules are framework-dependent assemblies started through the .NET
//! shared host: `<host> <base>/[updater/]<module>.dll`.

use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::install::ProcessRunner;
use crate::inventory::Inventory;
use crate::platform::Arch;

/// Parent of the per-architecture shared host keys.
pub const HOST_KEY_ROOT: &str = r"SOFTWARE\dotnet\Setup\InstalledVersions";

/// Value holding the shared host install directory.
pub const HOST_PATH_VALUE: &str = "Path";

/// Shared host executable inside that directory.
pub const HOST_EXECUTABLE: &str = "dotnet.exe";

/// Host looked up on `PATH` when the inventory has none.
pub const HOST_FALLBACK: &str = "dotnet";

/// Subdirectory holding updater modules.
pub const UPDATER_DIR: &str = "updater";

/// Inventory key describing the shared host for `arch`.
pub fn host_key(arch: Arch) -> String {
    format!(r"{}\{}\sharedhost", HOST_KEY_ROOT, arch)
}

/// Locate the .NET shared host executable.
pub fn resolve_host(inventory: &dyn Inventory, arch: Arch) -> PathBuf {
    let key = host_key(arch);
    match inventory.value(&key, HOST_PATH_VALUE) {
        Ok(Some(dir)) => {
            let dir = dir.trim_end_matches('\0').trim();
            if !dir.is_empty() {
                return PathBuf::from(dir).join(HOST_EXECUTABLE);
            }
            tracing::debug!("Empty {} under {}", HOST_PATH_VALUE, key);
        }
        Ok(None) => tracing::debug!("No {} under {}", HOST_PATH_VALUE, key),
        Err(e) => tracing::debug!("{}", e),
    }
    PathBuf::from(HOST_FALLBACK)
}

/// Path of the assembly for `module` below `base_dir`.
pub fn module_path(base_dir: &Path, module: &str) -> PathBuf {
    let mut path = base_dir.to_path_buf();
    if module.to_lowercase().contains(UPDATER_DIR) {
        path.push(UPDATER_DIR);
    }
    path.push(format!("{}.dll", module));
    path
}

/// Starts auxiliary modules through the shared host.
pub struct ModuleLauncher<'a> {
    inventory: &'a dyn Inventory,
    runner: &'a dyn ProcessRunner,
    base_dir: PathBuf,
    arch: Arch,
}

impl<'a> ModuleLauncher<'a> {
    /// Create a launcher resolving modules below `base_dir`.
    pub fn new(inventory: &'a dyn Inventory, runner: &'a dyn ProcessRunner, base_dir: &Path) -> Self {
        Self {
            inventory,
            runner,
            base_dir: base_dir.to_path_buf(),
            arch: Arch::current(),
        }
    }

    /// Resolve the host for another architecture.
    pub fn with_arch(mut self, arch: Arch) -> Self {
        self.arch = arch;
        self
    }

    /// The host and arguments `launch` would use.
    pub fn command_for(&self, module: &str) -> (PathBuf, Vec<String>) {
        let host = resolve_host(self.inventory, self.arch);
        let target = module_path(&self.base_dir, module);
        (host, vec![target.display().to_string()])
    }

    /// Start `module` without waiting for it.
    pub fn launch(&self, module: &str) -> Result<()> {
        let (host, args) = self.command_for(module);
        tracing::info!("Launching module {} via {}", module, host.display());
        self.runner
            .spawn_detached(&host, &args, Some(&self.base_dir), true)
    }
}

/// Start the main application from `base_dir` without waiting for it.
pub fn relaunch_main(runner: &dyn ProcessRunner, base_dir: &Path, executable: &str) -> Result<()> {
    let program = base_dir.join(executable);
    tracing::info!("Relaunching {}", program.display());
    runner.spawn_detached(&program, &[], Some(base_dir), false)
}
