//! nuget backend for .nupkg packages

use std::sync::Arc;

use tokio::process::Command;
use tracing::{debug, instrument};

use crate::error::Result;
use crate::provisioner::ToolProvisioner;
use crate::signer::{SignOutcome, Signer, SigningRequest};

use super::run_tool;

/// Signs NuGet packages with a provisioned nuget.exe
#[derive(Debug, Clone)]
pub struct PackageSigner {
    provisioner: Arc<ToolProvisioner>,
}

impl PackageSigner {
    /// Create a signer that resolves nuget through `provisioner`
    pub fn new(provisioner: Arc<ToolProvisioner>) -> Self {
        Self { provisioner }
    }
}

#[async_trait::async_trait]
impl Signer for PackageSigner {
    fn name(&self) -> &str {
        "nuget"
    }

    #[instrument(skip(self, request), fields(signer = "nuget", path = %request.artifact.path.display()))]
    async fn sign(&self, request: &SigningRequest) -> Result<SignOutcome> {
        let tool = self.provisioner.ensure().await?;

        let mut command = Command::new(&tool);
        command
            .arg("sign")
            .arg(&request.artifact.path)
            .arg("-CertificatePath")
            .arg(&request.certificate_path)
            .arg("-Timestamper")
            .arg(&request.timestamp_url);

        debug!(tool = %tool.display(), "running nuget sign");
        Ok(run_tool(self.name(), command).await)
    }
}
