//! Preflight CLI entry point.

use std::process::ExitCode;

use preflight::cli::{Cli, CommandDispatcher, CommandResult, PreflightContext, Settings};
use preflight::config::load_config;
use preflight::install::{default_download_dir, HttpDownloader, SystemRunner};
use preflight::inventory::{system_inventory, Inventory, SnapshotInventory};
use preflight::launch::LaunchDecision;
use preflight::platform::{is_ci, operating_dir};
use preflight::requirements::Catalog;
use preflight::ui::{create_ui, should_use_colors, OutputMode, UserInterface};
use preflight::Result;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Initialize the tracing subscriber for logging.
///
/// Log level is controlled by:
/// 1. `--debug` flag sets level to DEBUG
/// 2. `RUST_LOG` environment variable (if set)
/// 3. Default is INFO
fn init_tracing(debug: bool) {
    let filter = if debug {
        EnvFilter::new("preflight=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("preflight=info"))
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn run(cli: &Cli, ui: &mut dyn UserInterface) -> Result<CommandResult> {
    let operating = operating_dir();
    let config = load_config(&operating, cli.config.as_deref())?;
    let settings = Settings::from_config(&config, &operating).with_cli(cli);

    let mut catalog = Catalog::builtin();
    catalog.apply_overrides(&config.dependencies)?;

    let inventory: Box<dyn Inventory> = match &cli.inventory {
        Some(path) => Box::new(SnapshotInventory::load(path)?),
        None => system_inventory(),
    };
    let download_dir = config
        .download_dir
        .clone()
        .unwrap_or_else(default_download_dir);
    let downloader = HttpDownloader::new(&download_dir);
    let runner = SystemRunner::new();

    let ctx = PreflightContext {
        inventory: inventory.as_ref(),
        downloader: &downloader,
        runner: &runner,
        catalog,
        settings,
    };

    let decision = LaunchDecision::from_args(cli.args.as_slice());
    CommandDispatcher::new(&ctx).dispatch(&decision, ui)
}

fn main() -> ExitCode {
    let mut rejected = None;
    let (cli, ignored) = match Cli::parse_lenient(std::env::args_os()) {
        Ok(parsed) => parsed,
        Err(e) if !e.use_stderr() => e.exit(),
        Err(e) => {
            rejected = Some(e.render().to_string());
            (Cli::default(), Vec::new())
        }
    };
    init_tracing(cli.debug);

    if let Some(message) = rejected {
        tracing::warn!("Ignoring command line: {}", message.trim());
    }
    for arg in &ignored {
        tracing::warn!("Ignoring unknown option '{}'", arg);
    }

    tracing::debug!("Preflight starting with args: {:?}", cli);

    let output_mode = OutputMode::from_flags(cli.verbose, cli.quiet);
    let colors = !cli.no_color && should_use_colors();
    let mut ui = create_ui(!is_ci(), output_mode, colors);

    match run(&cli, ui.as_mut()) {
        Ok(result) => ExitCode::from(result.process_status()),
        Err(e) => {
            ui.error(&format!("Error: {}", e));
            ExitCode::from(1)
        }
    }
}
