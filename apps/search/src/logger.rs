//! Logging for the search binaries.
//!
//! Provides dual output (stderr with colors + file) with thread-safe initialization.
//! Console output goes to stderr so it never mixes with search results on stdout.
//!
//! The level defaults to Debug in debug builds and Info in release builds;
//! `SEARCH_LOG_LEVEL` (`off`, `error`, `warn`, `info`, `debug`, `trace`)
//! overrides it. An unrecognised value keeps the default and is reported once
//! the logger is up.

use crate::error::SearchAppError;
use crate::settings::LOG_LEVEL_VAR;

use common::ErrorLocation;

use std::env;
use std::io::stderr;
use std::panic::Location;
use std::path::Path;
use std::sync::Once;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::SystemTime;

use fern::Dispatch;
use fern::colors::Color::{Blue, Green, Magenta, Red, Yellow};
use fern::colors::ColoredLevelConfig;
use humantime::format_rfc3339;
use log::{LevelFilter, info, warn};

/// Thread-safe initialization guard.
static INIT_LOGGER_ONCE: Once = Once::new();

/// Tracks if logger initialization was already attempted.
static LOGGER_ALREADY_CALLED: AtomicBool = AtomicBool::new(false);

/// Log file name.
pub const LOG_FILE_NAME: &str = "songsearch.log";

const LOGGER_INITIALIZED_MESSAGE_PREFIX: &str = "Logger initialized with level: ";

const LOGGER_ALREADY_INITIALIZED_MESSAGE: &str = "Logger already initialized";

/// Default log level for debug builds.
#[cfg(debug_assertions)]
pub const DEFAULT_LOG_LEVEL: LevelFilter = LevelFilter::Debug;

/// Default log level for release builds.
#[cfg(not(debug_assertions))]
pub const DEFAULT_LOG_LEVEL: LevelFilter = LevelFilter::Info;

/// Level requested by a `SEARCH_LOG_LEVEL` value. Unset or blank means the
/// build default.
///
/// # Errors
///
/// Returns [`SearchAppError::Environment`] if the value is not a level name.
pub fn level_from(value: Option<&str>) -> Result<LevelFilter, SearchAppError> {
    match value.map(str::trim) {
        None | Some("") => Ok(DEFAULT_LOG_LEVEL),
        Some(name) => name
            .parse::<LevelFilter>()
            .map_err(|e| SearchAppError::Environment {
                variable: LOG_LEVEL_VAR.to_string(),
                message: format!("Invalid log level {name:?}: {e}"),
                location: ErrorLocation::from(Location::caller()),
            }),
    }
}

/// Initialize the logger with dual output (stderr + file).
///
/// Safe to call multiple times: later calls log a warning and return Ok.
///
/// # Errors
///
/// Returns an error if:
/// - Log file cannot be created
/// - Logger dispatch configuration fails
pub fn initialize(log_dir: &Path) -> Result<(), SearchAppError> {
    if LOGGER_ALREADY_CALLED.swap(true, Ordering::SeqCst) {
        warn!("{LOGGER_ALREADY_INITIALIZED_MESSAGE}");
        return Ok(());
    }

    let requested = env::var(LOG_LEVEL_VAR).ok();
    let (level, rejected) = match level_from(requested.as_deref()) {
        Ok(level) => (level, None),
        Err(e) => (DEFAULT_LOG_LEVEL, Some(e)),
    };

    let mut result = Ok(());

    INIT_LOGGER_ONCE.call_once(|| {
        result = initialize_internal(log_dir, level);
        if result.is_ok() {
            info!("{LOGGER_INITIALIZED_MESSAGE_PREFIX}{level:?}");
            if let Some(e) = rejected {
                warn!("Keeping default log level: {e}");
            }
        }
    });

    result
}

#[track_caller]
fn initialize_internal(log_dir: &Path, level: LevelFilter) -> Result<(), SearchAppError> {
    let log_file_path = log_dir.join(LOG_FILE_NAME);

    let color_configuration = ColoredLevelConfig::new()
        .debug(Blue)
        .info(Green)
        .warn(Yellow)
        .error(Red)
        .trace(Magenta);

    let base_dispatch = Dispatch::new().level(level);

    let console_dispatch = Dispatch::new()
        .format(move |out, message, record| {
            out.finish(format_args!(
                "[{date} - {level}] {message} [{file}:{line}]",
                date = format_rfc3339(SystemTime::now()),
                level = color_configuration.color(record.level()),
                message = message,
                file = record.file().unwrap_or("unknown"),
                line = record.line().unwrap_or(0),
            ))
        })
        .chain(stderr());

    // Plain text, no colors
    let file_dispatch = Dispatch::new()
        .format(move |out, message, record| {
            out.finish(format_args!(
                "[{date} - {level}] {message} [{file}:{line}]",
                date = format_rfc3339(SystemTime::now()),
                level = record.level(),
                message = message,
                file = record.file().unwrap_or("unknown"),
                line = record.line().unwrap_or(0)
            ))
        })
        .chain(
            fern::log_file(&log_file_path).map_err(|e| SearchAppError::Search {
                message: format!("Failed to create log file: {e}"),
                location: ErrorLocation::from(Location::caller()),
            })?,
        );

    base_dispatch
        .chain(console_dispatch)
        .chain(file_dispatch)
        .apply()
        .map_err(|e| SearchAppError::Search {
            message: format!("Failed to initialize logger: {e}"),
            location: ErrorLocation::from(Location::caller()),
        })?;

    Ok(())
}
