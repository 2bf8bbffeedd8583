//! Error types for winsign

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using WinsignError
pub type Result<T> = std::result::Result<T, WinsignError>;

/// Main error type for winsign configuration and setup
#[derive(Debug, Error)]
pub enum WinsignError {
    /// Configuration-related errors
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

}

/// Configuration-related errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Configuration file not found
    #[error("Configuration file not found at {0}")]
    NotFound(PathBuf),

    /// Configuration file already exists
    #[error("Configuration file already exists at {0}")]
    AlreadyExists(PathBuf),

    /// Invalid configuration value
    #[error("Invalid configuration: {field} - {message}")]
    InvalidValue { field: String, message: String },

    /// YAML parsing error
    #[error("YAML parsing error: {0}")]
    YamlError(#[from] serde_yaml::Error),

    /// TOML parsing error
    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    /// TOML serialization error
    #[error("TOML serialization error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    /// IO error
    #[error("IO error reading config: {0}")]
    Io(#[from] std::io::Error),
}

impl WinsignError {
    /// Whether this error came from configuration loading or validation
    pub fn is_config(&self) -> bool {
        matches!(self, Self::Config(_))
    }
}
