//! signtool backend for executables, libraries, drivers, installers, and scripts

use tracing::{debug, instrument};

use winsign_core::config::SigntoolConfig;

use crate::error::Result;
use crate::signer::{SignOutcome, Signer, SigningRequest};
use crate::template::CommandTemplate;

use super::{run_tool, shell_command};

/// Signs binaries with a fixed local signtool.exe
#[derive(Debug, Clone)]
pub struct BinarySigner {
    tool_path: String,
    digest_algorithm: String,
}

impl BinarySigner {
    /// Create a signer for the signtool at `tool_path`
    pub fn new(tool_path: impl Into<String>, digest_algorithm: impl Into<String>) -> Self {
        Self {
            tool_path: tool_path.into(),
            digest_algorithm: digest_algorithm.into(),
        }
    }

    /// Create a signer from configuration
    pub fn from_config(config: &SigntoolConfig) -> Self {
        Self::new(&config.path, &config.digest_algorithm)
    }

    /// Template this signer uses for `request`
    pub fn template(&self, request: &SigningRequest) -> CommandTemplate {
        CommandTemplate::new(
            &self.tool_path,
            &request.certificate_path,
            &request.timestamp_url,
            &self.digest_algorithm,
            request.extra_args.as_deref(),
        )
    }
}

#[async_trait::async_trait]
impl Signer for BinarySigner {
    fn name(&self) -> &str {
        "signtool"
    }

    #[instrument(skip(self, request), fields(signer = "signtool", path = %request.artifact.path.display()))]
    async fn sign(&self, request: &SigningRequest) -> Result<SignOutcome> {
        let line = self.template(request).for_file(&request.artifact.path);
        debug!(command = %line, "running signtool");
        Ok(run_tool(self.name(), shell_command(&line)).await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artifact::Artifact;
    use crate::signer::SigningContext;
    use std::path::PathBuf;

    fn request(extra_args: Option<&str>) -> SigningRequest {
        let context = SigningContext {
            certificate_path: PathBuf::from("/tmp/certificate.pfx"),
            timestamp_url: "http://timestamp.digicert.com".to_string(),
            extra_args: extra_args.map(str::to_string),
        };
        SigningRequest::new(Artifact::from_path("/tmp/out/app.exe"), &context)
    }

    #[test]
    fn test_template_uses_request_certificate() {
        let signer = BinarySigner::new("signtool.exe", "sha256");
        let template = signer.template(&request(None));
        assert_eq!(
            template.sign_args(),
            "sign /f /tmp/certificate.pfx /tr http://timestamp.digicert.com /v /fd sha256 "
        );
    }

    #[test]
    fn test_template_honors_override() {
        let signer = BinarySigner::new("signtool.exe", "sha256");
        let template = signer.template(&request(Some("/a /fd sha384")));
        assert_eq!(template.sign_args(), "sign /f /tmp/certificate.pfx /a /fd sha384 ");
    }

    #[test]
    fn test_from_config() {
        let signer = BinarySigner::from_config(&SigntoolConfig::default());
        assert_eq!(signer.name(), "signtool");
        assert!(signer.tool_path.ends_with("signtool.exe"));
        assert_eq!(signer.digest_algorithm, "sha256");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_sign_succeeds_when_tool_exits_zero() {
        let signer = BinarySigner::new("true", "sha256");
        let outcome = signer.sign(&request(None)).await.unwrap();
        assert!(outcome.is_success());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_sign_fails_when_tool_exits_nonzero() {
        let signer = BinarySigner::new("false", "sha256");
        let outcome = signer.sign(&request(None)).await.unwrap();
        assert!(!outcome.is_success());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_missing_tool_is_a_failed_attempt_not_an_error() {
        let signer = BinarySigner::new("/no/such/signtool.exe", "sha256");
        let outcome = signer.sign(&request(None)).await.unwrap();
        assert!(!outcome.is_success());
    }
}
