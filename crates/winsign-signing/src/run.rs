//! A complete signing run: certificate, outputs, then artifacts

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{info, instrument};

use winsign_core::Config;

use crate::backends::{BinarySigner, PackageSigner};
use crate::certificate::{decode_certificate, write_certificate};
use crate::error::Result;
use crate::orchestrator::{RetryPolicy, SignerSet, SigningOrchestrator, SigningReport};
use crate::provisioner::{HttpToolSource, ToolProvisioner, ToolSource};
use crate::publish::{
    OutputPublisher, OUTPUT_CERTIFICATE_PATH, OUTPUT_SIGNTOOL_CMD, OUTPUT_SIGN_ARGS,
};
use crate::scanner::ArtifactScanner;
use crate::signer::SigningContext;
use crate::template::CommandTemplate;

/// Caller-supplied inputs for one run
#[derive(Debug, Clone, Default)]
pub struct RunInputs {
    /// Base64 PFX; empty disables signing
    pub certificate: String,

    /// signtool flags replacing the defaults
    pub sign_args: Option<String>,

    /// Directory of artifacts; absent means template-only
    pub folder: Option<PathBuf>,

    /// Descend into subdirectories of `folder`
    pub recursive: bool,
}

impl RunInputs {
    fn target_folder(&self) -> Option<&Path> {
        self.folder
            .as_deref()
            .filter(|f| !f.as_os_str().is_empty())
    }

    fn sign_args_override(&self) -> Option<&str> {
        self.sign_args
            .as_deref()
            .map(str::trim)
            .filter(|a| !a.is_empty())
    }
}

/// How a run ended
#[derive(Debug)]
pub enum RunOutcome {
    /// No certificate was supplied; nothing was done
    Skipped,

    /// Outputs were published without signing anything
    TemplateOnly {
        template: CommandTemplate,
        certificate_path: PathBuf,
    },

    /// Every artifact under the folder was signed
    Signed {
        template: CommandTemplate,
        certificate_path: PathBuf,
        report: SigningReport,
    },
}

impl RunOutcome {
    /// Signing report, if artifacts were processed
    pub fn report(&self) -> Option<&SigningReport> {
        match self {
            Self::Signed { report, .. } => Some(report),
            _ => None,
        }
    }
}

/// Wires configuration, signers, and the orchestrator for one run
pub struct SigningRun {
    config: Config,
    tool_source: Arc<dyn ToolSource>,
    signers: Option<SignerSet>,
}

impl SigningRun {
    /// Create a run that downloads tools over HTTP
    pub fn new(config: Config) -> Self {
        Self {
            config,
            tool_source: Arc::new(HttpToolSource::new()),
            signers: None,
        }
    }

    /// Fetch missing tools from `source`
    pub fn with_tool_source(mut self, source: Arc<dyn ToolSource>) -> Self {
        self.tool_source = source;
        self
    }

    /// Use these signers instead of signtool and nuget
    pub fn with_signers(mut self, signers: SignerSet) -> Self {
        self.signers = Some(signers);
        self
    }

    fn signers(&self) -> SignerSet {
        if let Some(signers) = &self.signers {
            return signers.clone();
        }

        let provisioner = Arc::new(ToolProvisioner::nuget(
            &self.config.nuget,
            self.tool_source.clone(),
        ));
        SignerSet::new(
            Arc::new(BinarySigner::from_config(&self.config.signtool)),
            Arc::new(PackageSigner::new(provisioner)),
        )
    }

    /// Execute the run.
    ///
    /// Outputs are published once, before any artifact is signed. Any error
    /// returned here fails the whole run.
    #[instrument(skip_all, fields(folder = ?inputs.folder, recursive = inputs.recursive))]
    pub async fn execute(
        &self,
        inputs: &RunInputs,
        publisher: &dyn OutputPublisher,
    ) -> Result<RunOutcome> {
        let certificate = decode_certificate(&inputs.certificate)?;
        if certificate.is_empty() {
            info!("The value for \"certificate\" is not set.");
            return Ok(RunOutcome::Skipped);
        }

        let certificate_path = self.config.certificate.resolved_path();
        write_certificate(&certificate_path, &certificate).await?;

        let template = CommandTemplate::new(
            &self.config.signtool.path,
            &certificate_path,
            &self.config.signtool.timestamp_url,
            &self.config.signtool.digest_algorithm,
            inputs.sign_args_override(),
        );
        publish_outputs(publisher, &template, &certificate_path);

        let Some(folder) = inputs.target_folder() else {
            return Ok(RunOutcome::TemplateOnly {
                template,
                certificate_path,
            });
        };

        let context = SigningContext {
            certificate_path: certificate_path.clone(),
            timestamp_url: self.config.signtool.timestamp_url.clone(),
            extra_args: inputs.sign_args_override().map(str::to_string),
        };
        let orchestrator = SigningOrchestrator::new(self.signers(), context)
            .with_policy(RetryPolicy::from(&self.config.retry));

        let report = orchestrator
            .sign_all(ArtifactScanner::new(folder, inputs.recursive))
            .await?;

        Ok(RunOutcome::Signed {
            template,
            certificate_path,
            report,
        })
    }
}

fn publish_outputs(publisher: &dyn OutputPublisher, template: &CommandTemplate, certificate: &Path) {
    publisher.publish(OUTPUT_SIGNTOOL_CMD, &template.command());
    publisher.publish(OUTPUT_CERTIFICATE_PATH, &certificate.display().to_string());
    publisher.publish(OUTPUT_SIGN_ARGS, template.sign_args());
}
