//! Configuration module
//!
//! Settings file handling for the backend address, startup behaviour,
//! display options and logging.

#[allow(clippy::module_inception)]
pub mod config;

pub use config::{BehaviorConfig, Config, DisplayConfig, LoggingConfig, ServerConfig};
