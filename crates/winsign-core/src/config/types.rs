//! Configuration types

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::defaults::{
    DEFAULT_BACKOFF_STEP_SECS, DEFAULT_CERTIFICATE_FILE_NAME, DEFAULT_DIGEST_ALGORITHM,
    DEFAULT_MAX_ATTEMPTS, DEFAULT_NUGET_FILE_NAME, DEFAULT_NUGET_URL, DEFAULT_SIGNTOOL_PATH,
    DEFAULT_TIMESTAMP_URL,
};

/// Root configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Binary signing tool (signtool) settings
    pub signtool: SigntoolConfig,

    /// Package signing tool (nuget) settings
    pub nuget: NugetConfig,

    /// Retry policy for each signing invocation
    pub retry: RetryConfig,

    /// Where the decoded certificate is written
    pub certificate: CertificateConfig,
}

/// signtool configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SigntoolConfig {
    /// Path to signtool.exe
    pub path: String,

    /// RFC 3161 timestamp server
    pub timestamp_url: String,

    /// File digest algorithm passed with `/fd`
    pub digest_algorithm: String,
}

impl Default for SigntoolConfig {
    fn default() -> Self {
        Self {
            path: DEFAULT_SIGNTOOL_PATH.to_string(),
            timestamp_url: DEFAULT_TIMESTAMP_URL.to_string(),
            digest_algorithm: DEFAULT_DIGEST_ALGORITHM.to_string(),
        }
    }
}

/// nuget configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NugetConfig {
    /// Local path of nuget.exe. Defaults to the system temp directory.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,

    /// Where nuget.exe is downloaded from when it is not present locally
    pub download_url: String,
}

impl Default for NugetConfig {
    fn default() -> Self {
        Self {
            path: None,
            download_url: DEFAULT_NUGET_URL.to_string(),
        }
    }
}

impl NugetConfig {
    /// Local tool path, falling back to `<temp>/nuget.exe`
    pub fn resolved_path(&self) -> PathBuf {
        self.path
            .clone()
            .unwrap_or_else(|| std::env::temp_dir().join(DEFAULT_NUGET_FILE_NAME))
    }
}

/// Retry configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
    /// Attempts per artifact before the run is failed
    pub max_attempts: u32,

    /// Linear backoff step; attempt `i` waits `i * step` seconds
    pub backoff_step_secs: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            backoff_step_secs: DEFAULT_BACKOFF_STEP_SECS,
        }
    }
}

impl RetryConfig {
    /// Backoff step as a duration
    pub fn backoff_step(&self) -> Duration {
        Duration::from_secs(self.backoff_step_secs)
    }
}

/// Certificate output configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CertificateConfig {
    /// Where the decoded PFX is written. Defaults to the system temp directory.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
}

impl CertificateConfig {
    /// Certificate path, falling back to `<temp>/certificate.pfx`
    pub fn resolved_path(&self) -> PathBuf {
        self.path
            .clone()
            .unwrap_or_else(|| std::env::temp_dir().join(DEFAULT_CERTIFICATE_FILE_NAME))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_retry_policy() {
        let retry = RetryConfig::default();
        assert_eq!(retry.max_attempts, 10);
        assert_eq!(retry.backoff_step(), Duration::from_secs(1));
    }

    #[test]
    fn test_resolved_paths_fall_back_to_temp_dir() {
        let config = Config::default();
        let temp = std::env::temp_dir();
        assert_eq!(config.nuget.resolved_path(), temp.join("nuget.exe"));
        assert_eq!(config.certificate.resolved_path(), temp.join("certificate.pfx"));
    }

    #[test]
    fn test_explicit_paths_win() {
        let config = Config {
            nuget: NugetConfig {
                path: Some(PathBuf::from("/opt/tools/nuget.exe")),
                ..Default::default()
            },
            certificate: CertificateConfig {
                path: Some(PathBuf::from("/secure/cert.pfx")),
            },
            ..Default::default()
        };
        assert_eq!(
            config.nuget.resolved_path(),
            PathBuf::from("/opt/tools/nuget.exe")
        );
        assert_eq!(
            config.certificate.resolved_path(),
            PathBuf::from("/secure/cert.pfx")
        );
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config: Config = toml::from_str("[retry]\nmax_attempts = 3\n").unwrap();
        assert_eq!(config.retry.max_attempts, 3);
        assert_eq!(config.retry.backoff_step_secs, 1);
        assert_eq!(config.signtool, SigntoolConfig::default());
    }
}
