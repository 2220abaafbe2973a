//! `search-client`: type a prefix, get matching songs.
//!
//! Reads one query per line from stdin. `:reconnect` cycles the connection,
//! `:quit` (or end of input) disconnects and exits.

use search::console::{Command, render_disconnect, render_results};
use search::error::SearchAppError;
use search::logger::initialize as LoggerInitialize;
use search::settings::{endpoint_override, load_dotenv, log_dir};

use socket_client::config::ClientConfig;
use socket_client::socket::{ConnectionState, OnConnect, OnDisconnect, OnError, SocketHandler};

use common::ErrorLocation;

use models::{ClientMessage, SearchResults};

use std::panic::Location;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use log::{error, info};
use tokio::io::{AsyncBufReadExt, BufReader, stdin};
use tokio::sync::Notify;
use tokio::time::timeout;

/// How long `:quit` waits for the server to acknowledge the close.
const CLOSE_TIMEOUT: Duration = Duration::from_secs(2);

#[tokio::main(flavor = "current_thread")]
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
    info!("Search client starting, logging to {}", log_dir.display());
    dotenv.log();

    let config_dir = ClientConfig::default_dir()?;
    let config = ClientConfig::load(&config_dir)?.with_endpoint_override(endpoint_override()?)?;

    let closed = Arc::new(Notify::new());
    let socket = SocketHandler::builder().build();
    register_handlers(&socket, Arc::clone(&closed));
    socket.connect(config.endpoint);

    let mut lines = BufReader::new(stdin()).lines();
    loop {
        let line = lines
            .next_line()
            .await
            .map_err(|e| SearchAppError::Search {
                message: format!("Failed to read stdin: {e}"),
                location: ErrorLocation::from(Location::caller()),
            })?;

        let Some(line) = line else { break };

        match Command::parse(&line) {
            None => {}
            Some(Command::Search(term)) => {
                if let Err(e) = socket.send(&ClientMessage::Search(term)) {
                    eprintln!("Search not sent: {e}");
                }
            }
            Some(Command::Reconnect) => socket.reconnect(false),
            Some(Command::Quit) => break,
        }
    }

    if socket.state() != ConnectionState::Closed {
        let disconnected = closed.notified();
        socket.disconnect();
        if timeout(CLOSE_TIMEOUT, disconnected).await.is_err() {
            info!("Server did not acknowledge close within {CLOSE_TIMEOUT:?}");
        }
    }

    info!("Search client exiting");
    Ok(())
}

fn register_handlers(socket: &SocketHandler, closed: Arc<Notify>) {
    socket
        .register::<SearchResults>(|songs| println!("{}", render_results(&songs)))
        .register_lifecycle::<OnConnect>(|()| println!("Connected"))
        .register_lifecycle::<OnDisconnect>(move |close| {
            println!("{}", render_disconnect(&close));
            closed.notify_waiters();
        })
        .register_lifecycle::<OnError>(|e| eprintln!("Socket error: {e}"));
}
