//! Qlik Sense Printing patch upgrade entry point.
//!
//! # Usage
//!
//! ```text
//! qlik-printing-patch [-h] [-f <folder>] [-c <file>]
//!
//! Options:
//!   -h, --help            Print usage and exit
//!   -f, --folder <folder> Folder where Qlik Sense is installed [default: %ProgramFiles%]
//!   -c, --config <file>   Settings file (service name, timeouts, log level)
//! ```
//!
//! # Flow
//!
//! ```text
//! main()
//!  └─ resolve_printing_folder()   -- <root>/Qlik/Sense/Printing must exist
//!  └─ ConfigPatcher::patch_all()  -- Printing.exe.config, Qlik.Sense.Printing.dll.config
//!  └─ RestartServiceUseCase::run() -- only if a file changed
//! ```
//!
//! # Exit codes
//!
//! | Code | Meaning                                                        |
//! |------|----------------------------------------------------------------|
//! | 0    | Done, nothing to do, usage shown, or service needs a manual look |
//! | 1    | A config file is missing, or an I/O, settings or service error |

use std::io::IsTerminal;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Context;
use clap::{CommandFactory, Parser};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use patch_core::TARGET_FILES;
use patch_upgrade::application::patch_config::{restart_required, ConfigPatcher};
use patch_upgrade::application::restart_service::RestartServiceUseCase;
use patch_upgrade::infrastructure::install_root::resolve_printing_folder;
use patch_upgrade::infrastructure::reporting::TracingReporter;
use patch_upgrade::infrastructure::service_control::platform_service_control;
use patch_upgrade::infrastructure::storage::{load_settings, Settings};

// ── CLI argument definitions ──────────────────────────────────────────────────

/// Updates the Qlik Sense Printing binding redirects and restarts the
/// printing service.
#[derive(Debug, Parser)]
#[command(name = "qlik-printing-patch", version)]
struct Cli {
    /// Path to folder where Qlik Sense is installed. Default is %ProgramFiles%.
    #[arg(short = 'f', long = "folder", value_name = "folder")]
    folder: Option<PathBuf>,

    /// Settings file with the service name and restart timeouts.
    #[arg(
        short = 'c',
        long = "config",
        value_name = "file",
        env = "QLIK_PRINTING_PATCH_CONFIG"
    )]
    config: Option<PathBuf>,
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() -> ExitCode {
    // Bad arguments print usage and exit 0, like `-h`.
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            if !matches!(
                e.kind(),
                clap::error::ErrorKind::DisplayHelp | clap::error::ErrorKind::DisplayVersion
            ) {
                print_usage();
            }
            return ExitCode::SUCCESS;
        }
    };

    let settings = load_settings(cli.config.as_deref());
    let log_level = settings
        .as_ref()
        .map(|s| s.logging.log_level.clone())
        .unwrap_or_else(|_| "info".to_string());
    init_logging(&log_level);

    let settings = match settings {
        Ok(settings) => settings,
        Err(e) => {
            error!("{e}");
            return ExitCode::FAILURE;
        }
    };

    let folder = match resolve_printing_folder(cli.folder.as_deref()) {
        Ok(folder) => folder,
        Err(e) => {
            error!("Error: {e}");
            print_usage();
            return ExitCode::SUCCESS;
        }
    };

    match run(&folder, &settings) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e:#}");
            ExitCode::FAILURE
        }
    }
}

/// Patches the config files in `folder` and restarts the service if needed.
fn run(folder: &std::path::Path, settings: &Settings) -> anyhow::Result<()> {
    let patcher = ConfigPatcher::new(Arc::new(TracingReporter));
    let outcomes = patcher
        .patch_all(folder, &TARGET_FILES)
        .context("patching stopped")?;

    if !restart_required(&outcomes) {
        info!("No config file changes required.");
        return Ok(());
    }

    info!("Config file change has been performed. Service restart required.");
    let control = platform_service_control(&settings.service.name)
        .context("cannot restart the printing service")?;
    let outcome = RestartServiceUseCase::new(control, settings.service.restart_policy())
        .run()
        .with_context(|| format!("failed to restart {:?}", settings.service.name))?;

    if outcome.needs_manual_action() {
        info!("Config files are patched; check the service state by hand.");
    }
    Ok(())
}

/// Initialises structured logging.  `RUST_LOG` overrides `default_level`.
///
/// Operator messages are read line by line, so no timestamps and no colour
/// codes unless stdout is a terminal.
fn init_logging(default_level: &str) {
    tracing_subscriber::fmt()
        .with_ansi(std::io::stdout().is_terminal())
        .with_target(false)
        .without_time()
        .compact()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .init();
}

fn print_usage() {
    let _ = Cli::command().print_help();
}
