pub mod config;
pub mod error;
pub mod socket;

#[cfg(test)]
mod tests;

pub const SEARCH_SERVER_HOSTNAME: &str = "127.0.0.1";
pub const SEARCH_SERVER_PORT: u16 = 8080;
pub const DEFAULT_ENDPOINT: &str = const_format::concatcp!(
    "ws://",
    SEARCH_SERVER_HOSTNAME,
    ":",
    SEARCH_SERVER_PORT,
    models::SEARCH_PATH
);
