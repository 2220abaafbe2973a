//! `search-server`: serves song prefix searches until Ctrl-C.

use search::error::SearchAppError;
use search::logger::initialize as LoggerInitialize;
use search::settings::{load_dotenv, log_dir, server_catalog, server_port};

use search_server::start_search_server;

use common::ErrorLocation;

use std::panic::Location;
use std::process::ExitCode;

use log::{error, info};

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            eprintln!("{e}");
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<(), SearchAppError> {
    let dotenv = load_dotenv();
    let log_dir = log_dir()?;
    LoggerInitialize(&log_dir)?;
    info!("Search server starting, logging to {}", log_dir.display());
    dotenv.log();

    let port = server_port()?;
    let catalog = server_catalog()?;

    let server = start_search_server(port, catalog).await?;
    info!("Serving searches on {}", server.endpoint());

    tokio::signal::ctrl_c()
        .await
        .map_err(|e| SearchAppError::Search {
            message: format!("Failed to listen for Ctrl-C: {e}"),
            location: ErrorLocation::from(Location::caller()),
        })?;

    info!("Ctrl-C received, shutting down");
    server.shutdown();
    Ok(())
}
