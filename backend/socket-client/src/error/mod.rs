pub mod config;
pub mod socket;

pub use config::ConfigError;
pub use socket::SocketError;
