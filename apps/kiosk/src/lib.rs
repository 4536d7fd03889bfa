//! # Price-Check Kiosk Library
//!
//! Core library for the price-check kiosk terminal application.
//! This is the main entry point that wires configuration, the catalog
//! backend, the controller task and the terminal UI together.
//!
//! ## Module Organization
//! ```text
//! pricecheck_kiosk/
//! ├── lib.rs            ◄─── You are here (startup & run)
//! ├── state/
//! │   ├── mod.rs        ◄─── State type exports
//! │   ├── config.rs     ◄─── kiosk.toml + env overrides
//! │   ├── catalog.rs    ◄─── Backend selection (REST / SQLite)
//! │   └── controller.rs ◄─── Session owner, lookup + dwell tasks
//! ├── ui/
//! │   ├── mod.rs        ◄─── Terminal setup & event loop
//! │   ├── app.rs        ◄─── Screen state, key handling
//! │   ├── input.rs      ◄─── Scanner input line, focus policy
//! │   └── view.rs       ◄─── ratatui rendering
//! └── error.rs          ◄─── Kiosk error type
//! ```
//!
//! ## Logging
//! The UI owns the terminal, so logs go to a file instead of stdout:
//! `PRICECHECK_LOG_FILE` if set, otherwise `pricecheck.log` in the
//! platform data directory.

pub mod error;
pub mod state;
pub mod ui;

use directories::ProjectDirs;
use std::fs::{self, File, OpenOptions};
use std::path::PathBuf;
use std::sync::Mutex;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use error::{KioskError, KioskResult};
use state::{catalog, KioskConfig, KioskController};

/// Environment variable that overrides the log file location.
pub const LOG_FILE_ENV: &str = "PRICECHECK_LOG_FILE";

/// Runs the kiosk until the operator quits.
///
/// ## Startup Sequence
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │                         Kiosk Startup                                   │
/// │                                                                         │
/// │  1. Initialize Logging ───────────────────────────────────────────────► │
/// │     • tracing-subscriber with env filter, written to the log file      │
/// │     • Default: info, pricecheck crates at debug                         │
/// │                                                                         │
/// │  2. Load Configuration ───────────────────────────────────────────────► │
/// │     • --config path, PRICECHECK_CONFIG, or the platform config dir      │
/// │     • PRICECHECK_* env overrides, then validation                       │
/// │                                                                         │
/// │  3. Connect Catalog ──────────────────────────────────────────────────► │
/// │     • REST endpoint or local SQLite mirror                              │
/// │                                                                         │
/// │  4. Spawn Controller ─────────────────────────────────────────────────► │
/// │     • Session state, lookup task, dwell timer                           │
/// │                                                                         │
/// │  5. Run Terminal UI ──────────────────────────────────────────────────► │
/// │     • Until Esc / Ctrl+C, then shut the controller down                 │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
pub async fn run(config_path: Option<PathBuf>) -> KioskResult<()> {
    init_tracing()?;

    info!("Starting price-check kiosk");

    let config = KioskConfig::load(config_path)?;
    info!(
        backend = %config.catalog.backend,
        table = %config.catalog.table,
        dwell_secs = config.kiosk.dwell_secs,
        "Configuration loaded"
    );

    let lookup = catalog::connect(&config.catalog).await?;
    info!(backend = lookup.backend(), "Catalog ready");

    let (handle, controller) = KioskController::spawn(lookup, config.kiosk.dwell());

    let result = ui::run(&config.kiosk, &handle).await;
    if let Err(e) = &result {
        error!(error = %e, "Kiosk screen failed");
    }

    // The controller may already be gone if the UI failed on a closed channel
    if handle.shutdown().await.is_err() {
        info!("Controller already stopped");
    }
    controller
        .await
        .map_err(|e| KioskError::Controller(e.to_string()))?;

    info!("Kiosk stopped");
    result
}

/// Platform directories for config and log files.
///
/// ## Platform-Specific Paths
/// - **macOS**: `~/Library/Application Support/com.pricecheck.kiosk/`
/// - **Windows**: `%APPDATA%\pricecheck\kiosk\`
/// - **Linux**: `~/.config/kiosk/` and `~/.local/share/kiosk/`
pub(crate) fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("com", "pricecheck", "kiosk")
}

/// Initializes the tracing subscriber for structured logging.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=pricecheck=trace` - Show trace for pricecheck crates only
/// - Default: `info,pricecheck=debug,sqlx=warn`
fn init_tracing() -> KioskResult<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,pricecheck=debug,sqlx=warn"));

    let log_file = open_log_file()?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(log_file))
        .with_ansi(false)
        .with_target(true)
        .try_init()
        .map_err(|e| KioskError::Logging(e.to_string()))
}

fn open_log_file() -> KioskResult<File> {
    let path = log_file_path()?;
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .map_err(|e| KioskError::Logging(format!("{}: {}", path.display(), e)))
}

fn log_file_path() -> KioskResult<PathBuf> {
    if let Ok(path) = std::env::var(LOG_FILE_ENV) {
        return Ok(PathBuf::from(path));
    }

    let dirs = project_dirs()
        .ok_or_else(|| KioskError::Logging("Could not determine app data directory".into()))?;
    Ok(dirs.data_dir().join("pricecheck.log"))
}
