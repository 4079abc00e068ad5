//! # slimdiff-core
//!
//! Shared configuration and logging for the slimdiff crates.
//!
//! ## Modules
//!
//! - `config`: layered TOML configuration with a `[diff]` section
//! - `logging`: tracing subscriber initialisation

pub mod config;
pub mod error;
pub mod logging;

pub use config::{get_config_home, Config, DiffConfig, CURRENT_CONFIG_VERSION};
pub use error::{ConfigError, ConfigResult};
