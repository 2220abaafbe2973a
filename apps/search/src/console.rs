//! Line-oriented console for the search client.
//!
//! Every non-empty line is a search term, except the two commands below.

use socket_client::socket::{CloseInfo, close_code};

pub const RECONNECT_COMMAND: &str = ":reconnect";
pub const QUIT_COMMAND: &str = ":quit";

/// What a line typed at the prompt asks for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Search(String),
    Reconnect,
    Quit,
}

impl Command {
    /// Parses one input line. Blank lines yield `None`.
    pub fn parse(line: &str) -> Option<Self> {
        let line = line.trim();
        match line {
            "" => None,
            RECONNECT_COMMAND => Some(Command::Reconnect),
            QUIT_COMMAND => Some(Command::Quit),
            term => Some(Command::Search(term.to_string())),
        }
    }
}

/// Search results as printed to stdout, one song per line.
pub fn render_results(songs: &[String]) -> String {
    if songs.is_empty() {
        return "(no matches)".to_string();
    }

    songs
        .iter()
        .map(|song| format!("  {song}"))
        .collect::<Vec<_>>()
        .join("\n")
}

/// One-line summary of a closed connection.
pub fn render_disconnect(close: &CloseInfo) -> String {
    let mut line = format!(
        "Disconnected: {} ({})",
        close.code,
        close_code::describe(close.code)
    );
    if !close.reason.is_empty() {
        line.push_str(&format!(": {}", close.reason));
    }
    line
}
