//! Sequential signing with bounded linear backoff
//!
//! Each artifact gets up to `max_attempts` invocations of its signer. Attempt
//! `i` is preceded by a wait of `i * backoff_step`, so the default policy
//! waits 0, 1, 2, ... 9 seconds. The first success ends the loop. If every
//! attempt fails the whole run fails and later artifacts are not attempted.

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tracing::{info, warn};

use winsign_core::config::RetryConfig;

use crate::artifact::{Artifact, BackendTag};
use crate::error::{Result, SigningError};
use crate::signer::{AttemptOutcome, Signer, SigningContext, SigningRequest};

/// Retry policy for one artifact
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Invocations before giving up
    pub max_attempts: u32,

    /// Added to the wait before each subsequent attempt
    pub backoff_step: Duration,
}

impl RetryPolicy {
    /// Wait before attempt `index`
    pub fn backoff_for(&self, index: u32) -> Duration {
        self.backoff_step * index
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from(&RetryConfig::default())
    }
}

impl From<&RetryConfig> for RetryPolicy {
    fn from(config: &RetryConfig) -> Self {
        Self {
            max_attempts: config.max_attempts,
            backoff_step: config.backoff_step(),
        }
    }
}

/// One invocation of a signer
#[derive(Debug, Clone, Serialize)]
pub struct SigningAttempt {
    pub index: u32,
    pub backoff: Duration,
    pub outcome: AttemptOutcome,
    pub stdout: String,
    pub stderr: String,
}

/// An artifact that was signed, with the attempts it took
#[derive(Debug, Clone, Serialize)]
pub struct SignedArtifact {
    pub artifact: Artifact,
    pub signer: String,
    pub attempts: Vec<SigningAttempt>,
}

/// Everything signed during a run, in signing order
#[derive(Debug, Clone, Default, Serialize)]
pub struct SigningReport {
    pub signed: Vec<SignedArtifact>,
}

impl SigningReport {
    /// Total signer invocations across all artifacts
    pub fn total_attempts(&self) -> usize {
        self.signed.iter().map(|s| s.attempts.len()).sum()
    }
}

/// The signer for each backend
#[derive(Clone)]
pub struct SignerSet {
    binary: Arc<dyn Signer>,
    package: Arc<dyn Signer>,
}

impl SignerSet {
    /// Create a set from the two backends
    pub fn new(binary: Arc<dyn Signer>, package: Arc<dyn Signer>) -> Self {
        Self { binary, package }
    }

    /// Signer for `backend`, if it is signed at all
    pub fn select(&self, backend: BackendTag) -> Option<&Arc<dyn Signer>> {
        match backend {
            BackendTag::Binary => Some(&self.binary),
            BackendTag::Package => Some(&self.package),
            BackendTag::Unsigned => None,
        }
    }
}

/// Drives each artifact through its signer
pub struct SigningOrchestrator {
    signers: SignerSet,
    context: SigningContext,
    policy: RetryPolicy,
}

impl SigningOrchestrator {
    /// Create an orchestrator with the default retry policy
    pub fn new(signers: SignerSet, context: SigningContext) -> Self {
        Self {
            signers,
            context,
            policy: RetryPolicy::default(),
        }
    }

    /// Set the retry policy
    pub fn with_policy(mut self, policy: RetryPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Sign every artifact in order, stopping at the first fatal error
    pub async fn sign_all<I>(&self, artifacts: I) -> Result<SigningReport>
    where
        I: IntoIterator<Item = Result<Artifact>>,
    {
        let mut report = SigningReport::default();
        // Pulling the next scanner item blocks on directory reads.
        for artifact in artifacts {
            let signed = self.sign_artifact(artifact?).await?;
            report.signed.push(signed);
        }

        info!(
            artifacts = report.signed.len(),
            attempts = report.total_attempts(),
            "signing complete"
        );
        Ok(report)
    }

    /// Sign one artifact, retrying with backoff
    pub async fn sign_artifact(&self, artifact: Artifact) -> Result<SignedArtifact> {
        let signer = self
            .signers
            .select(artifact.backend)
            .ok_or_else(|| SigningError::UnsupportedArtifact {
                path: artifact.path.clone(),
            })?;

        info!("Signing {}.", artifact.path.display());
        let request = SigningRequest::new(artifact, &self.context);
        let mut attempts = Vec::new();

        for index in 0..self.policy.max_attempts {
            let backoff = self.policy.backoff_for(index);
            if !backoff.is_zero() {
                info!("Waiting for {} seconds.", backoff.as_secs_f64());
                tokio::time::sleep(backoff).await;
            }

            let result = signer.sign(&request).await?;
            let succeeded = result.is_success();
            attempts.push(SigningAttempt {
                index,
                backoff,
                outcome: result.outcome,
                stdout: result.stdout,
                stderr: result.stderr,
            });

            if succeeded {
                info!(
                    path = %request.artifact.path.display(),
                    signer = signer.name(),
                    attempts = attempts.len(),
                    "signed"
                );
                return Ok(SignedArtifact {
                    artifact: request.artifact,
                    signer: signer.name().to_string(),
                    attempts,
                });
            }

            warn!(
                path = %request.artifact.path.display(),
                attempt = index + 1,
                max_attempts = self.policy.max_attempts,
                "signing attempt failed"
            );
        }

        Err(SigningError::RetriesExhausted {
            path: request.artifact.path,
            attempts: self.policy.max_attempts,
        })
    }
}
