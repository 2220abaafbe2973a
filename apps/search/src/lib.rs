// Library exports for testing
// Both binaries import these as well

pub mod console;
pub mod error;
pub mod logger;
pub mod settings;
