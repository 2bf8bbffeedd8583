//! CLI definition and command handling

pub mod commands;
pub mod output;

use std::path::Path;

use clap::{Parser, Subcommand};

use winsign_core::config::{load_config, load_config_or_default, Config};

use commands::{ClassifyCommand, CompletionsCommand, InitCommand, ScanCommand, SignCommand};

/// winsign - Code signing for Windows build artifacts in CI
#[derive(Debug, Parser)]
#[command(name = "winsign")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Output format
    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,

    /// Working directory
    #[arg(short = 'C', long, global = true)]
    pub directory: Option<std::path::PathBuf>,

    /// Configuration file (searched upward from the working directory if omitted)
    #[arg(short, long, global = true)]
    pub config: Option<std::path::PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Output format for CLI
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text output
    #[default]
    Text,
    /// JSON output
    Json,
}

/// Available commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Sign every artifact in a folder and publish the signtool command
    Sign(SignCommand),

    /// List the signable artifacts in a folder
    Scan(ScanCommand),

    /// Show which backend signs each file
    Classify(ClassifyCommand),

    /// Write a default winsign.toml
    Init(InitCommand),

    /// Generate shell completions
    Completions(CompletionsCommand),
}

impl Cli {
    /// Console log level implied by the verbosity flags
    pub fn log_level(&self) -> &'static str {
        if self.verbose {
            "debug"
        } else if self.quiet {
            "warn"
        } else {
            "info"
        }
    }

    /// Load the configuration named by `--config`, or search for one
    pub fn load_config(&self) -> anyhow::Result<Config> {
        match &self.config {
            Some(path) => Ok(load_config(path)?),
            None => {
                let cwd = std::env::current_dir()?;
                let (config, _) = load_config_or_default(&cwd)?;
                Ok(config)
            }
        }
    }

    /// Execute the CLI command
    pub fn execute(&self) -> anyhow::Result<()> {
        if let Some(dir) = &self.directory {
            std::env::set_current_dir(dir)?;
        }

        match &self.command {
            Commands::Sign(cmd) => cmd.execute(self),
            Commands::Scan(cmd) => cmd.execute(self),
            Commands::Classify(cmd) => cmd.execute(self),
            Commands::Init(cmd) => cmd.execute(self),
            Commands::Completions(cmd) => cmd.execute(self),
        }
    }
}

/// Display form of a path relative to `base` when possible
pub fn display_relative(path: &Path, base: &Path) -> String {
    path.strip_prefix(base)
        .unwrap_or(path)
        .display()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_log_level_from_flags() {
        let cli = Cli::try_parse_from(["winsign", "-v", "classify", "a.dll"]).unwrap();
        assert_eq!(cli.log_level(), "debug");

        let cli = Cli::try_parse_from(["winsign", "-q", "classify", "a.dll"]).unwrap();
        assert_eq!(cli.log_level(), "warn");

        let cli = Cli::try_parse_from(["winsign", "classify", "a.dll"]).unwrap();
        assert_eq!(cli.log_level(), "info");
    }

    #[test]
    fn test_verbose_and_quiet_conflict() {
        assert!(Cli::try_parse_from(["winsign", "-v", "-q", "classify", "a.dll"]).is_err());
    }

    #[test]
    fn test_display_relative() {
        let base = Path::new("/build/out");
        assert_eq!(
            display_relative(Path::new("/build/out/bin/app.exe"), base),
            Path::new("bin").join("app.exe").display().to_string()
        );
        assert_eq!(display_relative(Path::new("/other/x.dll"), base), "/other/x.dll");
    }
}
