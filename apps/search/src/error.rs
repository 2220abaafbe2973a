use common::ErrorLocation;

use search_server::ServerError;
use socket_client::error::ConfigError;

use std::panic::Location;

use thiserror::Error;

/// Errors that stop one of the search binaries.
///
/// Everything the socket reports at runtime goes through its lifecycle
/// handlers instead; only startup failures end up here.
#[derive(Debug, Error)]
pub enum SearchAppError {
    /// Error from this App
    #[error("Search Error: {message} {location}")]
    Search {
        message: String,
        location: ErrorLocation,
    },

    /// Client configuration could not be loaded or is invalid
    #[error("Config Error: {message} {location}")]
    Config {
        message: String,
        location: ErrorLocation,
    },

    /// Search server failed to start or its catalog could not be read
    #[error("Server Error: {message} {location}")]
    Server {
        message: String,
        location: ErrorLocation,
    },

    /// Environment variable present but unusable
    #[error("Environment Error: {variable}: {message} {location}")]
    Environment {
        variable: String,
        message: String,
        location: ErrorLocation,
    },
}

impl From<ConfigError> for SearchAppError {
    #[track_caller]
    fn from(error: ConfigError) -> Self {
        SearchAppError::Config {
            message: error.to_string(),
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

impl From<ServerError> for SearchAppError {
    #[track_caller]
    fn from(error: ServerError) -> Self {
        SearchAppError::Server {
            message: error.to_string(),
            location: ErrorLocation::from(Location::caller()),
        }
    }
}
