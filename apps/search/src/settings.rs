//! Environment-driven settings for the search binaries.
//!
//! `.env` is loaded by the binaries first, before the logger and before any
//! of these are read.

use crate::error::SearchAppError;

use common::ErrorLocation;

use search_server::Catalog;
use socket_client::SEARCH_SERVER_PORT;

use std::env::{self, VarError};
use std::fs::create_dir_all;
use std::panic::Location;
use std::path::PathBuf;

use log::{info, warn};

pub const ENDPOINT_VAR: &str = "SEARCH_ENDPOINT";
pub const PORT_VAR: &str = "SEARCH_SERVER_PORT";
pub const CATALOG_VAR: &str = "SEARCH_CATALOG";
pub const LOG_LEVEL_VAR: &str = "SEARCH_LOG_LEVEL";

const LOG_DIR_NAME: &str = "songsearch";

/// Served when `SEARCH_CATALOG` is not set.
pub const DEFAULT_SONGS: [&str; 8] = [
    "Bohemian Rhapsody",
    "Blackbird",
    "Blue Monday",
    "Hey Jude",
    "Heroes",
    "Imagine",
    "Yesterday",
    "Yellow Submarine",
];

/// Outcome of looking for a `.env` file.
///
/// `.env` is loaded before the logger exists (it may set `SEARCH_LOG_LEVEL`),
/// so the outcome is kept and logged once logging is up.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct EnvLoadResult {
    pub path: Option<PathBuf>,
    pub error: Option<String>,
}

impl EnvLoadResult {
    pub fn log(&self) {
        match (&self.path, &self.error) {
            (Some(path), None) => info!("Loaded .env from: {}", path.display()),
            (Some(path), Some(error)) => warn!("Failed to parse .env at {}: {error}", path.display()),
            (None, _) => info!("No .env file found"),
        }
    }
}

/// Loads `.env` from the working directory, then from next to the executable.
///
/// Variables already set in the process environment win over the file.
pub fn load_dotenv() -> EnvLoadResult {
    if let Ok(path) = dotenvy::dotenv() {
        return EnvLoadResult {
            path: Some(path),
            error: None,
        };
    }

    let Some(env_path) = env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(|dir| dir.join(".env")))
    else {
        return EnvLoadResult::default();
    };
    if !env_path.exists() {
        return EnvLoadResult::default();
    }

    let error = dotenvy::from_path(&env_path).err().map(|e| e.to_string());
    EnvLoadResult {
        path: Some(env_path),
        error,
    }
}

/// Endpoint override from `SEARCH_ENDPOINT`. Unset or blank means no override.
///
/// # Errors
///
/// Returns [`SearchAppError::Environment`] if the value is not valid unicode.
pub fn endpoint_override() -> Result<Option<String>, SearchAppError> {
    read_var(ENDPOINT_VAR)
}

/// Port from `SEARCH_SERVER_PORT`, [`SEARCH_SERVER_PORT`] when unset.
///
/// # Errors
///
/// Returns [`SearchAppError::Environment`] if the value is not a port number.
pub fn server_port() -> Result<u16, SearchAppError> {
    match read_var(PORT_VAR)? {
        None => Ok(SEARCH_SERVER_PORT),
        Some(value) => value.parse().map_err(|e| SearchAppError::Environment {
            variable: PORT_VAR.to_string(),
            message: format!("Invalid port {value:?}: {e}"),
            location: ErrorLocation::from(Location::caller()),
        }),
    }
}

/// Catalog from the file named by `SEARCH_CATALOG`, or [`DEFAULT_SONGS`].
///
/// # Errors
///
/// Returns [`SearchAppError::Server`] if the catalog file cannot be read.
pub fn server_catalog() -> Result<Catalog, SearchAppError> {
    match read_var(CATALOG_VAR)? {
        Some(path) => Ok(Catalog::load(&PathBuf::from(path))?),
        None => Ok(Catalog::from_names(DEFAULT_SONGS)),
    }
}

/// Directory for the log file, created if missing.
///
/// # Errors
///
/// Returns [`SearchAppError::Search`] if the directory cannot be created.
pub fn log_dir() -> Result<PathBuf, SearchAppError> {
    let log_dir = dirs::data_local_dir()
        .unwrap_or_else(env::temp_dir)
        .join(LOG_DIR_NAME);

    create_dir_all(&log_dir).map_err(|e| SearchAppError::Search {
        message: format!("Failed to create log directory {}: {e}", log_dir.display()),
        location: ErrorLocation::from(Location::caller()),
    })?;

    Ok(log_dir)
}

#[track_caller]
fn read_var(variable: &str) -> Result<Option<String>, SearchAppError> {
    match env::var(variable) {
        Ok(value) if value.trim().is_empty() => Ok(None),
        Ok(value) => Ok(Some(value.trim().to_string())),
        Err(VarError::NotPresent) => Ok(None),
        Err(e @ VarError::NotUnicode(_)) => Err(SearchAppError::Environment {
            variable: variable.to_string(),
            message: e.to_string(),
            location: ErrorLocation::from(Location::caller()),
        }),
    }
}
