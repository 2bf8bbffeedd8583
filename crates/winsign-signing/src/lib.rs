//! Winsign Signing - Artifact signing for CI pipelines
//!
//! This crate finds signable artifacts in a build output directory and signs
//! each one with the matching backend:
//! - Windows binaries and installers: signtool (Authenticode)
//! - NuGet packages: nuget sign, with nuget.exe downloaded on first use
//!
//! Failed signing attempts are retried with a linearly growing wait. The
//! first artifact that cannot be signed aborts the run.

pub mod artifact;
pub mod backends;
pub mod certificate;
pub mod error;
pub mod orchestrator;
pub mod provisioner;
pub mod publish;
pub mod run;
pub mod scanner;
pub mod signer;
pub mod template;

pub use artifact::{classify, Artifact, BackendTag};
pub use error::{Result, SigningError};
pub use orchestrator::{RetryPolicy, SignerSet, SigningOrchestrator, SigningReport};
pub use provisioner::{HttpToolSource, ToolProvisioner, ToolSource};
pub use publish::{GithubOutputPublisher, MemoryPublisher, OutputPublisher};
pub use run::{RunInputs, RunOutcome, SigningRun};
pub use scanner::ArtifactScanner;
pub use signer::{SignOutcome, Signer, SigningContext, SigningRequest};
pub use template::CommandTemplate;

// Re-export backends
pub use backends::{BinarySigner, PackageSigner};
