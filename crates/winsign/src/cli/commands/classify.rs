//! Classify command

use std::path::PathBuf;

use clap::Args;
use serde::Serialize;

use winsign_signing::{Artifact, BackendTag};

use crate::cli::output;
use crate::cli::{Cli, OutputFormat};

/// Show which backend signs each file
#[derive(Debug, Args)]
pub struct ClassifyCommand {
    /// Files to classify; they need not exist
    #[arg(required = true)]
    pub paths: Vec<PathBuf>,
}

#[derive(Debug, Serialize)]
struct Classification {
    path: PathBuf,
    extension: String,
    backend: BackendTag,
    signable: bool,
}

impl From<Artifact> for Classification {
    fn from(artifact: Artifact) -> Self {
        let signable = artifact.is_signable();
        Self {
            path: artifact.path,
            extension: artifact.extension,
            backend: artifact.backend,
            signable,
        }
    }
}

impl ClassifyCommand {
    /// Execute the classify command
    pub fn execute(&self, cli: &Cli) -> anyhow::Result<()> {
        let results: Vec<Classification> = self
            .paths
            .iter()
            .map(|p| Artifact::from_path(p.clone()).into())
            .collect();

        if cli.format == OutputFormat::Json {
            println!("{}", serde_json::to_string_pretty(&results)?);
            return Ok(());
        }

        for result in &results {
            println!(
                "{:<8} {}",
                output::backend_style(result.backend).apply_to(result.backend),
                result.path.display()
            );
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classification_from_artifact() {
        let c = Classification::from(Artifact::from_path("setup.MSI"));
        assert_eq!(c.backend, BackendTag::Unsigned);
        assert!(!c.signable);

        let c = Classification::from(Artifact::from_path("pkg.1.0.0.nupkg"));
        assert_eq!(c.backend, BackendTag::Package);
        assert_eq!(c.extension, ".nupkg");
        assert!(c.signable);
    }
}
