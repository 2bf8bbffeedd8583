//! winsign core - configuration and shared error types
//!
//! The signing engine itself lives in `winsign-signing`; this crate only
//! knows how to find, parse, and validate the run configuration.

pub mod config;
pub mod error;

pub use config::{load_config, load_config_or_default, Config};
pub use error::{ConfigError, Result, WinsignError};
