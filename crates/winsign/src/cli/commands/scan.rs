//! Scan command

use std::path::PathBuf;

use clap::Args;
use tracing::info;

use winsign_signing::{Artifact, ArtifactScanner, BackendTag};

use crate::cli::output;
use crate::cli::{display_relative, Cli, OutputFormat};

/// List the signable artifacts in a folder
#[derive(Debug, Args)]
pub struct ScanCommand {
    /// Folder to scan
    #[arg(default_value = ".")]
    pub folder: PathBuf,

    /// Descend into subfolders
    #[arg(short, long)]
    pub recursive: bool,
}

impl ScanCommand {
    /// Execute the scan command
    pub fn execute(&self, cli: &Cli) -> anyhow::Result<()> {
        info!(folder = %self.folder.display(), recursive = self.recursive, "executing scan command");

        let artifacts: Vec<Artifact> =
            ArtifactScanner::new(&self.folder, self.recursive).collect::<Result<_, _>>()?;

        if cli.format == OutputFormat::Json {
            println!("{}", serde_json::to_string_pretty(&artifacts)?);
            return Ok(());
        }

        if artifacts.is_empty() {
            if !cli.quiet {
                output::info(&format!(
                    "No signable artifacts in {}",
                    self.folder.display()
                ));
            }
            return Ok(());
        }

        for artifact in &artifacts {
            println!(
                "{:<8} {}",
                output::backend_style(artifact.backend).apply_to(artifact.backend),
                output::path_style().apply_to(display_relative(&artifact.path, &self.folder))
            );
        }

        if !cli.quiet {
            let (binaries, packages) = count_by_backend(&artifacts);
            println!();
            println!(
                "{} artifact(s): {} binary, {} package",
                artifacts.len(),
                binaries,
                packages
            );
        }
        Ok(())
    }
}

fn count_by_backend(artifacts: &[Artifact]) -> (usize, usize) {
    let count = |tag| artifacts.iter().filter(|a| a.backend == tag).count();
    (count(BackendTag::Binary), count(BackendTag::Package))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_count_by_backend() {
        let artifacts = vec![
            Artifact::from_path("out/a.dll"),
            Artifact::from_path("out/b.exe"),
            Artifact::from_path("out/c.nupkg"),
        ];
        assert_eq!(count_by_backend(&artifacts), (2, 1));
        assert_eq!(count_by_backend(&[]), (0, 0));
    }
}
