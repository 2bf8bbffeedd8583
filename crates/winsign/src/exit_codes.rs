//! Exit codes for the CLI

use winsign_core::{ConfigError, WinsignError};
use winsign_signing::SigningError;

/// General error
pub const ERROR: i32 = 1;

/// Configuration error
pub const CONFIG_ERROR: i32 = 2;

/// An artifact could not be signed within its retry budget
pub const SIGNING_FAILED: i32 = 3;

/// Map a command failure to its exit code
pub fn for_error(error: &anyhow::Error) -> i32 {
    if let Some(e) = error.downcast_ref::<SigningError>() {
        return if e.is_exhaustion() { SIGNING_FAILED } else { ERROR };
    }
    if let Some(e) = error.downcast_ref::<WinsignError>() {
        return if e.is_config() { CONFIG_ERROR } else { ERROR };
    }
    if error.downcast_ref::<ConfigError>().is_some() {
        return CONFIG_ERROR;
    }
    ERROR
}
