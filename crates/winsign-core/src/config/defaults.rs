//! Default configuration values

use super::types::Config;
use crate::error::ConfigError;

/// Default configuration file name (TOML)
pub const DEFAULT_CONFIG_TOML: &str = "winsign.toml";

/// Default configuration file name (YAML)
pub const DEFAULT_CONFIG_YAML: &str = "winsign.yaml";

/// signtool shipped with the Windows 10 SDK on hosted runners
pub const DEFAULT_SIGNTOOL_PATH: &str =
    "C:/Program Files (x86)/Windows Kits/10/bin/10.0.17763.0/x86/signtool.exe";

/// Timestamp authority
pub const DEFAULT_TIMESTAMP_URL: &str = "http://timestamp.digicert.com";

/// Digest algorithm for `/fd`
pub const DEFAULT_DIGEST_ALGORITHM: &str = "sha256";

/// nuget.exe download location
pub const DEFAULT_NUGET_URL: &str = "https://dist.nuget.org/win-x86-commandline/latest/nuget.exe";

/// File name of the cached nuget executable
pub const DEFAULT_NUGET_FILE_NAME: &str = "nuget.exe";

/// File name of the decoded certificate
pub const DEFAULT_CERTIFICATE_FILE_NAME: &str = "certificate.pfx";

/// Attempts per artifact
pub const DEFAULT_MAX_ATTEMPTS: u32 = 10;

/// Linear backoff step in seconds
pub const DEFAULT_BACKOFF_STEP_SECS: u64 = 1;

/// Get list of config file names to search for, in priority order
pub fn config_file_names() -> Vec<&'static str> {
    vec![
        DEFAULT_CONFIG_TOML,
        DEFAULT_CONFIG_YAML,
        ".winsign.toml",
        ".winsign.yaml",
    ]
}

/// Header written above the rendered default configuration
const DEFAULT_CONFIG_HEADER: &str = "# winsign configuration\n\n";

/// Render the default configuration as TOML
pub fn default_config_toml() -> Result<String, ConfigError> {
    let body = toml::to_string_pretty(&Config::default())?;
    Ok(format!("{DEFAULT_CONFIG_HEADER}{body}"))
}
