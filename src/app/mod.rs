//! Application module
//!
//! Process-level setup for the binary: configuration and logging.

pub mod config;
pub mod logging;

pub use config::AppConfig;
pub use logging::init_logging;
