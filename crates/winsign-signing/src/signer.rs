//! Signer trait and request/outcome types

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::artifact::Artifact;
use crate::error::Result;

/// Run-wide parameters every request carries
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SigningContext {
    /// Decoded certificate on disk
    pub certificate_path: PathBuf,

    /// Timestamp server URL
    pub timestamp_url: String,

    /// Caller-supplied signtool flags that replace the defaults
    pub extra_args: Option<String>,
}

/// One artifact to sign with the run's certificate
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SigningRequest {
    pub artifact: Artifact,
    pub certificate_path: PathBuf,
    pub timestamp_url: String,
    pub extra_args: Option<String>,
}

impl SigningRequest {
    /// Build the request for `artifact` under `context`
    pub fn new(artifact: Artifact, context: &SigningContext) -> Self {
        Self {
            artifact,
            certificate_path: context.certificate_path.clone(),
            timestamp_url: context.timestamp_url.clone(),
            extra_args: context.extra_args.clone(),
        }
    }
}

/// Whether one invocation of a signing tool succeeded
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttemptOutcome {
    Succeeded,
    Failed,
}

/// Result of one tool invocation with its captured output
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignOutcome {
    pub outcome: AttemptOutcome,
    pub stdout: String,
    pub stderr: String,
}

impl SignOutcome {
    /// A successful invocation
    pub fn succeeded(stdout: impl Into<String>, stderr: impl Into<String>) -> Self {
        Self {
            outcome: AttemptOutcome::Succeeded,
            stdout: stdout.into(),
            stderr: stderr.into(),
        }
    }

    /// A failed invocation
    pub fn failed(stdout: impl Into<String>, stderr: impl Into<String>) -> Self {
        Self {
            outcome: AttemptOutcome::Failed,
            stdout: stdout.into(),
            stderr: stderr.into(),
        }
    }

    /// Whether the tool reported success
    pub fn is_success(&self) -> bool {
        self.outcome == AttemptOutcome::Succeeded
    }
}

/// A signing backend.
///
/// `sign` runs one external tool invocation. A tool that fails to launch or
/// exits non-zero is reported as [`AttemptOutcome::Failed`], never as `Err`;
/// `Err` is reserved for failures that should end the run immediately.
#[async_trait::async_trait]
pub trait Signer: Send + Sync {
    /// Get the name of this signer
    fn name(&self) -> &str;

    /// Sign one artifact once
    async fn sign(&self, request: &SigningRequest) -> Result<SignOutcome>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_copies_context() {
        let context = SigningContext {
            certificate_path: PathBuf::from("/tmp/certificate.pfx"),
            timestamp_url: "http://timestamp.digicert.com".to_string(),
            extra_args: Some("/a".to_string()),
        };
        let request = SigningRequest::new(Artifact::from_path("a.dll"), &context);

        assert_eq!(request.certificate_path, context.certificate_path);
        assert_eq!(request.timestamp_url, context.timestamp_url);
        assert_eq!(request.extra_args.as_deref(), Some("/a"));
        assert_eq!(request.artifact.extension, ".dll");
    }

    #[test]
    fn test_outcome_constructors() {
        assert!(SignOutcome::succeeded("ok", "").is_success());
        assert!(!SignOutcome::failed("", "boom").is_success());
    }
}
