//! End-to-end flows with a snapshot inventory and fake collaborators.

use std::cell::RefCell;
use std::path::{Path, PathBuf};
use std::time::Duration;

use preflight::cli::{CommandDispatcher, CommandResult, PreflightContext, Settings, PAUSE_PROMPT};
use preflight::install::{Downloader, ProcessRunner, RunResult};
use preflight::inventory::SnapshotInventory;
use preflight::launch::{host_key, LaunchDecision};
use preflight::platform::Arch;
use preflight::requirements::{Catalog, DependencyKind, DependencySpec};
use preflight::ui::MockUI;
use preflight::{PreflightError, Result};

const UNINSTALL: &str = r"SOFTWARE\Microsoft\Windows\CurrentVersion\Uninstall";
const UNINSTALL_WOW: &str = r"SOFTWARE\Wow6432Node\Microsoft\Windows\CurrentVersion\Uninstall";
const VC_KEY: &str = r"SOFTWARE\Microsoft\DevDiv\VC\Servicing\14.0\RuntimeMinimum";

#[derive(Default)]
struct FakeDownloader {
    failing: Vec<DependencyKind>,
    fetched: RefCell<Vec<DependencyKind>>,
}

impl Downloader for FakeDownloader {
    fn fetch(&self, spec: &DependencySpec, arch: Arch) -> Result<PathBuf> {
        self.fetched.borrow_mut().push(spec.kind);
        if self.failing.contains(&spec.kind) {
            return Err(PreflightError::DownloadFailed {
                dependency: spec.display_name.clone(),
                message: "HTTP 503".into(),
            });
        }
        Ok(std::env::temp_dir().join(format!("fake-{}-{}.exe", spec.kind.key(), arch)))
    }
}

#[derive(Default)]
struct FakeRunner {
    waited: RefCell<Vec<PathBuf>>,
    spawned: RefCell<Vec<(PathBuf, Vec<String>)>>,
}

impl ProcessRunner for FakeRunner {
    fn run_and_wait(&self, program: &Path, _args: &[String]) -> Result<RunResult> {
        self.waited.borrow_mut().push(program.to_path_buf());
        Ok(RunResult {
            exit_code: Some(0),
            duration: Duration::from_millis(5),
        })
    }

    fn spawn_detached(
        &self,
        program: &Path,
        args: &[String],
        _cwd: Option<&Path>,
        _hidden: bool,
    ) -> Result<()> {
        self.spawned
            .borrow_mut()
            .push((program.to_path_buf(), args.to_vec()));
        Ok(())
    }
}

fn with_vc(inv: SnapshotInventory) -> SnapshotInventory {
    inv.with_key(VC_KEY, &[("Version", "14.38.33135")])
}

fn with_dotnet(inv: SnapshotInventory) -> SnapshotInventory {
    inv.with_key(
        &format!(r"{}\{{F3017226}}", UNINSTALL_WOW),
        &[
            ("DisplayName", "Microsoft Edge WebView2 Runtime"),
            ("DisplayVersion", "120.0.2210.91"),
        ],
    )
    .with_key(
        &format!(r"{}\{{A1B2}}", UNINSTALL),
        &[
            ("DisplayName", "Microsoft Windows Desktop Runtime - 6.0.25 (x64)"),
            ("DisplayVersion", "6.0.25.33020"),
        ],
    )
    .with_key(
        &format!(r"{}\{{C3D4}}", UNINSTALL),
        &[
            ("DisplayName", "Microsoft ASP.NET Core 6.0.25 - Shared Framework (x64)"),
            ("DisplayVersion", "6.0.25.23574"),
        ],
    )
}

fn settings() -> Settings {
    Settings {
        base_dir: PathBuf::from("/opt/switcher"),
        app_executable: Some("TcNo-Acc-Switcher.exe".into()),
        arch: Arch::X64,
        ..Settings::default()
    }
}

fn run(
    decision: LaunchDecision,
    inventory: &SnapshotInventory,
    downloader: &FakeDownloader,
    runner: &FakeRunner,
    settings: Settings,
    ui: &mut MockUI,
) -> CommandResult {
    let ctx = PreflightContext {
        inventory,
        downloader,
        runner,
        catalog: Catalog::builtin(),
        settings,
    };
    CommandDispatcher::new(&ctx).dispatch(&decision, ui).unwrap()
}

#[test]
fn everything_installed_relaunches_without_downloads() {
    let inventory = with_dotnet(with_vc(SnapshotInventory::new()));
    let (downloader, runner) = (FakeDownloader::default(), FakeRunner::default());
    let mut ui = MockUI::new();

    let result = run(LaunchDecision::Full, &inventory, &downloader, &runner, settings(), &mut ui);

    assert_eq!(result, CommandResult::success());
    assert!(downloader.fetched.borrow().is_empty());
    assert!(runner.waited.borrow().is_empty());
    assert_eq!(
        runner.spawned.borrow()[0].0,
        Path::new("/opt/switcher/TcNo-Acc-Switcher.exe")
    );
    assert_eq!(ui.pauses(), &[PAUSE_PROMPT]);
    assert!(ui.has_output("Currently installed runtimes:"));
    assert!(ui.has_output("Microsoft Edge WebView2 Runtime [120.0.2210.91]"));
}

#[test]
fn full_flow_installs_missing_in_catalog_order() {
    let inventory = SnapshotInventory::new();
    let (downloader, runner) = (FakeDownloader::default(), FakeRunner::default());
    let mut ui = MockUI::new();

    run(LaunchDecision::Full, &inventory, &downloader, &runner, settings(), &mut ui);

    assert_eq!(*downloader.fetched.borrow(), DependencyKind::ALL.to_vec());
    assert_eq!(runner.waited.borrow().len(), 4);
    assert_eq!(runner.spawned.borrow().len(), 1);
}

#[test]
fn failed_download_does_not_stop_other_installs_or_relaunch() {
    let inventory = with_vc(SnapshotInventory::new()).with_key(
        &format!(r"{}\{{A1B2}}", UNINSTALL),
        &[
            ("DisplayName", "Microsoft Windows Desktop Runtime - 6.0.25 (x64)"),
            ("DisplayVersion", "6.0.25"),
        ],
    );
    let downloader = FakeDownloader {
        failing: vec![DependencyKind::WebViewRuntime],
        ..Default::default()
    };
    let runner = FakeRunner::default();
    let mut ui = MockUI::new();

    let result = run(LaunchDecision::Full, &inventory, &downloader, &runner, settings(), &mut ui);

    assert_eq!(
        *downloader.fetched.borrow(),
        vec![DependencyKind::WebViewRuntime, DependencyKind::AspCoreRuntime]
    );
    assert_eq!(runner.waited.borrow().len(), 1);
    assert!(ui.errors().iter().any(|e| e.contains("HTTP 503")));
    assert_eq!(runner.spawned.borrow().len(), 1);
    assert!(result.success);
}

#[test]
fn native_check_ignores_dotnet_and_does_not_relaunch() {
    let inventory = with_vc(SnapshotInventory::new());
    let (downloader, runner) = (FakeDownloader::default(), FakeRunner::default());
    let mut ui = MockUI::new();

    let result = run(
        LaunchDecision::from_args(&["vc"]),
        &inventory,
        &downloader,
        &runner,
        settings(),
        &mut ui,
    );

    assert_eq!(result, CommandResult::success());
    assert!(downloader.fetched.borrow().is_empty());
    assert!(runner.spawned.borrow().is_empty());
    assert!(ui.pauses().is_empty());
    assert!(!ui.has_output("WebView2"));
}

#[test]
fn native_check_installs_only_native_runtime() {
    let inventory = SnapshotInventory::new();
    let (downloader, runner) = (FakeDownloader::default(), FakeRunner::default());
    let mut ui = MockUI::new();

    let result = run(
        LaunchDecision::from_args(&["VC"]),
        &inventory,
        &downloader,
        &runner,
        settings(),
        &mut ui,
    );

    assert_eq!(*downloader.fetched.borrow(), vec![DependencyKind::NativeRuntime]);
    assert!(runner.spawned.borrow().is_empty());
    assert_eq!(result, CommandResult::success());
}

#[test]
fn failed_check_exits_nonzero() {
    let inventory = SnapshotInventory::new();
    let downloader = FakeDownloader {
        failing: vec![DependencyKind::NativeRuntime],
        ..Default::default()
    };
    let runner = FakeRunner::default();
    let mut ui = MockUI::new();

    let result = run(
        LaunchDecision::CheckOnly(preflight::requirements::Category::NativeRuntime),
        &inventory,
        &downloader,
        &runner,
        settings(),
        &mut ui,
    );

    assert_eq!(result, CommandResult::failure(1));
}

#[test]
fn net_with_module_skips_native_runtime_and_launches_through_host() {
    let inventory = with_dotnet(SnapshotInventory::new())
        .with_key(&host_key(Arch::X64), &[("Path", r"C:\Program Files\dotnet\")]);
    let (downloader, runner) = (FakeDownloader::default(), FakeRunner::default());
    let mut ui = MockUI::new();

    let result = run(
        LaunchDecision::from_args(&["net", "TcNo-Acc-Switcher-Updater"]),
        &inventory,
        &downloader,
        &runner,
        settings(),
        &mut ui,
    );

    assert!(result.success);
    // VC is absent from the inventory but never installed on this path
    assert!(downloader.fetched.borrow().is_empty());
    let spawned = runner.spawned.borrow();
    assert_eq!(spawned.len(), 1);
    assert!(spawned[0].0.ends_with("dotnet.exe"));
    assert!(spawned[0].1[0].ends_with("TcNo-Acc-Switcher-Updater.dll"));
    assert!(spawned[0].1[0].contains("updater"));
}

#[test]
fn bare_module_launches_without_scanning() {
    let inventory = SnapshotInventory::new();
    let (downloader, runner) = (FakeDownloader::default(), FakeRunner::default());
    let mut ui = MockUI::new();

    run(
        LaunchDecision::from_args(&["TcNo-Acc-Switcher-Server"]),
        &inventory,
        &downloader,
        &runner,
        settings(),
        &mut ui,
    );

    assert!(downloader.fetched.borrow().is_empty());
    assert!(!ui.has_output("Currently installed runtimes:"));
    assert_eq!(runner.spawned.borrow()[0].0, PathBuf::from("dotnet"));
}

#[test]
fn unreadable_roots_install_every_dotnet_component() {
    let inventory = with_dotnet(with_vc(SnapshotInventory::new()))
        .with_denied(UNINSTALL)
        .with_denied(UNINSTALL_WOW);
    let (downloader, runner) = (FakeDownloader::default(), FakeRunner::default());
    let mut ui = MockUI::new();

    run(LaunchDecision::Full, &inventory, &downloader, &runner, settings(), &mut ui);

    assert_eq!(
        *downloader.fetched.borrow(),
        vec![
            DependencyKind::WebViewRuntime,
            DependencyKind::DesktopRuntime,
            DependencyKind::AspCoreRuntime,
        ]
    );
}

#[test]
fn verification_reports_installs_that_did_not_register() {
    let inventory = SnapshotInventory::new();
    let (downloader, runner) = (FakeDownloader::default(), FakeRunner::default());
    let mut ui = MockUI::new();
    let settings = Settings {
        verify_after_install: true,
        ..settings()
    };

    let result = run(
        LaunchDecision::from_args(&["net"]),
        &inventory,
        &downloader,
        &runner,
        settings,
        &mut ui,
    );

    assert_eq!(result, CommandResult::failure(1));
    assert!(ui
        .warnings()
        .iter()
        .any(|w| w.contains("still not detected")));
}

#[test]
fn dry_run_changes_nothing() {
    let inventory = SnapshotInventory::new();
    let (downloader, runner) = (FakeDownloader::default(), FakeRunner::default());
    let mut ui = MockUI::new();
    let settings = Settings {
        dry_run: true,
        ..settings()
    };

    let result = run(LaunchDecision::Full, &inventory, &downloader, &runner, settings, &mut ui);

    assert!(result.success);
    assert!(downloader.fetched.borrow().is_empty());
    assert!(runner.spawned.borrow().is_empty());
    assert!(ui.has_output("Would install C++ Redistributable 2015-2022"));
    assert!(ui.has_output("Would launch"));
    assert!(ui.pauses().is_empty());
}

#[test]
fn missing_executable_skips_relaunch() {
    let inventory = with_dotnet(with_vc(SnapshotInventory::new()));
    let (downloader, runner) = (FakeDownloader::default(), FakeRunner::default());
    let mut ui = MockUI::new();
    let settings = Settings {
        app_executable: None,
        ..settings()
    };

    let result = run(LaunchDecision::Full, &inventory, &downloader, &runner, settings, &mut ui);

    assert!(result.success);
    assert!(runner.spawned.borrow().is_empty());
    assert!(ui.has_output("nothing to launch"));
}

#[test]
fn banner_uses_configured_title() {
    let inventory = with_dotnet(with_vc(SnapshotInventory::new()));
    let (downloader, runner) = (FakeDownloader::default(), FakeRunner::default());
    let mut ui = MockUI::new();
    let settings = Settings {
        title: "TcNo Account Switcher - Runtime installer".into(),
        ..settings()
    };

    run(LaunchDecision::Full, &inventory, &downloader, &runner, settings, &mut ui);

    assert_eq!(ui.headers(), &["TcNo Account Switcher - Runtime installer"]);
}
