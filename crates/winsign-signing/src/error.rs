//! Error types for signing operations

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for signing operations
pub type Result<T> = std::result::Result<T, SigningError>;

/// Fatal signing errors.
///
/// A single failed signtool or nuget invocation is not an error; it is a
/// failed attempt that the orchestrator retries. Everything here ends the run.
#[derive(Debug, Error)]
pub enum SigningError {
    /// Every attempt for one artifact failed
    #[error("Failed to sign '{}' after {attempts} attempts", path.display())]
    RetriesExhausted { path: PathBuf, attempts: u32 },

    /// A directory in the target tree could not be read
    #[error("Failed to scan {}: {source}", path.display())]
    ScanFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// No signer is registered for this artifact's backend
    #[error("Cannot sign {}: unsupported file type", path.display())]
    UnsupportedArtifact { path: PathBuf },

    /// The certificate input is not valid base64
    #[error("Certificate is not valid base64: {0}")]
    InvalidCertificate(#[from] base64::DecodeError),

    /// Downloading an external tool failed
    #[error("Failed to download {tool} from {url}: {reason}")]
    ToolDownload {
        tool: String,
        url: String,
        reason: String,
    },

    /// HTTP error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl SigningError {
    /// Whether the run failed because an artifact exhausted its retries
    pub fn is_exhaustion(&self) -> bool {
        matches!(self, Self::RetriesExhausted { .. })
    }
}
