//! Process logging bootstrap.
//!
//! # Responsibility
//! - Start rolling file logs exactly once per process.
//! - Capture panics into the log before the default hook runs.
//!
//! # Invariants
//! - Re-initialization with the same level and directory is a no-op.
//! - Re-initialization with a different level or directory is rejected.
//! - Initialization never panics.

use flexi_logger::{Cleanup, Criterion, FileSpec, Logger, LoggerHandle, Naming, WriteMode};
use log::error;
use once_cell::sync::OnceCell;
use std::path::{Path, PathBuf};

const LOG_BASENAME: &str = "daylog";
const MAX_LOG_BYTES: u64 = 5 * 1024 * 1024;
const KEPT_LOG_FILES: usize = 3;

static ACTIVE: OnceCell<ActiveLogging> = OnceCell::new();

struct ActiveLogging {
    level: String,
    dir: PathBuf,
    _handle: LoggerHandle,
}

/// Starts file logging at `level` under `dir`.
///
/// # Errors
/// Returns a human-readable message when the level is unknown, the
/// directory cannot be created, the backend fails to start, or logging is
/// already active with a different configuration.
pub fn init_logging(level: &str, dir: &Path) -> Result<(), String> {
    let level = match level.trim().to_ascii_lowercase().as_str() {
        l @ ("trace" | "debug" | "info" | "warn" | "error") => l.to_string(),
        other => {
            return Err(format!(
                "unknown log level `{other}`; expected trace|debug|info|warn|error"
            ))
        }
    };

    let state = ACTIVE.get_or_try_init(|| -> Result<ActiveLogging, String> {
        std::fs::create_dir_all(dir)
            .map_err(|err| format!("cannot create log directory `{}`: {err}", dir.display()))?;

        let handle = Logger::try_with_str(&level)
            .map_err(|err| format!("cannot configure log level `{level}`: {err}"))?
            .log_to_file(FileSpec::default().directory(dir).basename(LOG_BASENAME))
            .rotate(
                Criterion::Size(MAX_LOG_BYTES),
                Naming::Numbers,
                Cleanup::KeepLogFiles(KEPT_LOG_FILES),
            )
            .write_mode(WriteMode::BufferAndFlush)
            .append()
            .format_for_files(flexi_logger::detailed_format)
            .start()
            .map_err(|err| format!("cannot start logger: {err}"))?;

        install_panic_hook();

        log::info!(
            "event=logging_init module=core status=ok level={} dir={} version={}",
            level,
            dir.display(),
            env!("CARGO_PKG_VERSION")
        );

        Ok(ActiveLogging {
            level: level.clone(),
            dir: dir.to_path_buf(),
            _handle: handle,
        })
    })?;

    if state.level != level || state.dir != dir {
        return Err(format!(
            "logging already active at level `{}` under `{}`; refusing to reconfigure",
            state.level,
            state.dir.display()
        ));
    }
    Ok(())
}

/// The active `(level, directory)` pair, if logging has been initialized.
pub fn logging_status() -> Option<(String, PathBuf)> {
    ACTIVE
        .get()
        .map(|state| (state.level.clone(), state.dir.clone()))
}

fn install_panic_hook() {
    let previous = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let location = info
            .location()
            .map(|loc| format!("{}:{}", loc.file(), loc.line()))
            .unwrap_or_else(|| "unknown".to_string());
        let payload = if let Some(text) = info.payload().downcast_ref::<&str>() {
            (*text).to_string()
        } else if let Some(text) = info.payload().downcast_ref::<String>() {
            text.clone()
        } else {
            "non-string payload".to_string()
        };
        error!(
            "event=panic module=core status=error location={location} payload={}",
            payload.replace(['\n', '\r'], " ")
        );
        previous(info);
    }));
}
