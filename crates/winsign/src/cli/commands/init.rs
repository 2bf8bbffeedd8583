//! Init command

use std::path::PathBuf;

use clap::Args;
use console::style;
use tracing::info;

use winsign_core::config::write_default_config;

use crate::cli::Cli;

/// Write a default winsign.toml
#[derive(Debug, Args)]
pub struct InitCommand {
    /// Force overwrite existing configuration
    #[arg(short, long)]
    pub force: bool,

    /// Directory to write into (defaults to the working directory)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

impl InitCommand {
    /// Execute the init command
    pub fn execute(&self, cli: &Cli) -> anyhow::Result<()> {
        info!(force = self.force, "executing init command");
        let dir = match &self.output {
            Some(dir) => dir.clone(),
            None => std::env::current_dir()?,
        };

        let config_path = write_default_config(&dir, self.force)?;

        if !cli.quiet {
            println!(
                "{} Created configuration at {}",
                style("✓").green().bold(),
                style(config_path.display()).cyan()
            );
            println!();
            println!("Next steps:");
            println!(
                "  1. Edit {} to point at your signtool and timestamp server",
                config_path.display()
            );
            println!(
                "  2. Run {} to check which files will be signed",
                style("winsign scan <folder>").cyan()
            );
        }

        Ok(())
    }
}
