//! Sign command

use std::path::PathBuf;

use clap::Args;
use console::style;
use serde_json::json;
use tracing::info;

use winsign_signing::publish::{
    OUTPUT_CERTIFICATE_PATH, OUTPUT_SIGNTOOL_CMD, OUTPUT_SIGN_ARGS,
};
use winsign_signing::{
    GithubOutputPublisher, MemoryPublisher, OutputPublisher, RunInputs, RunOutcome, SigningRun,
};

use crate::cli::output;
use crate::cli::{display_relative, Cli, OutputFormat};

/// Sign every artifact in a folder and publish the signtool command
#[derive(Debug, Args)]
pub struct SignCommand {
    /// Base64-encoded PFX certificate; empty disables signing
    #[arg(long, env = "INPUT_CERTIFICATE", hide_env_values = true, default_value = "")]
    pub certificate: String,

    /// signtool flags replacing the default /tr, /v and /fd flags
    #[arg(long, env = "INPUT_SIGN_ARGS", allow_hyphen_values = true)]
    pub sign_args: Option<String>,

    /// Folder of artifacts to sign; without it only the outputs are published
    #[arg(long, env = "INPUT_FOLDER")]
    pub folder: Option<PathBuf>,

    /// Also sign artifacts in subfolders
    #[arg(long, env = "INPUT_RECURSIVE", value_parser = parse_recursive)]
    pub recursive: bool,

    /// Print the outputs instead of publishing them and skip signing
    #[arg(long)]
    pub dry_run: bool,
}

impl SignCommand {
    /// Execute the sign command
    pub fn execute(&self, cli: &Cli) -> anyhow::Result<()> {
        let runtime = tokio::runtime::Runtime::new()?;
        runtime.block_on(self.execute_async(cli))
    }

    fn inputs(&self) -> RunInputs {
        RunInputs {
            certificate: self.certificate.clone(),
            sign_args: self.sign_args.clone(),
            folder: if self.dry_run { None } else { self.folder.clone() },
            recursive: self.recursive,
        }
    }

    async fn execute_async(&self, cli: &Cli) -> anyhow::Result<()> {
        info!(
            folder = ?self.folder,
            recursive = self.recursive,
            dry_run = self.dry_run,
            "executing sign command"
        );

        let config = cli.load_config()?;
        let run = SigningRun::new(config);

        if self.dry_run {
            let publisher = MemoryPublisher::new();
            let outcome = run.execute(&self.inputs(), &publisher).await?;
            return self.print_dry_run(cli, &outcome, &publisher);
        }

        let publisher = GithubOutputPublisher::from_env();
        let outcome = match run.execute(&self.inputs(), &publisher).await {
            Ok(outcome) => outcome,
            Err(e) => {
                publisher.fail(&e.to_string());
                return Err(e.into());
            }
        };

        self.print_outcome(cli, &outcome)
    }

    fn print_outcome(&self, cli: &Cli, outcome: &RunOutcome) -> anyhow::Result<()> {
        if cli.format == OutputFormat::Json {
            println!("{}", serde_json::to_string_pretty(&outcome_json(outcome))?);
            return Ok(());
        }
        if cli.quiet {
            return Ok(());
        }

        match outcome {
            RunOutcome::Skipped => {
                output::info("No certificate provided, nothing to sign");
            }
            RunOutcome::TemplateOnly {
                template,
                certificate_path,
            } => {
                output::success("Published signing outputs");
                println!("{}", output::key_value("Command", &template.command()));
                println!(
                    "{}",
                    output::key_value("Certificate", &certificate_path.display().to_string())
                );
            }
            RunOutcome::Signed { report, .. } => {
                let base = self.folder.clone().unwrap_or_default();
                println!("{}", output::header("Signed artifacts:"));
                for signed in &report.signed {
                    println!(
                        "  {} {} ({} attempt{})",
                        style("✓").green(),
                        output::path_style().apply_to(display_relative(&signed.artifact.path, &base)),
                        signed.attempts.len(),
                        if signed.attempts.len() == 1 { "" } else { "s" }
                    );
                }
                println!();
                output::success(&format!("Signed {} artifact(s)", report.signed.len()));
            }
        }
        Ok(())
    }

    fn print_dry_run(
        &self,
        cli: &Cli,
        outcome: &RunOutcome,
        publisher: &MemoryPublisher,
    ) -> anyhow::Result<()> {
        if cli.format == OutputFormat::Json {
            let outputs: serde_json::Map<String, serde_json::Value> = publisher
                .outputs()
                .into_iter()
                .map(|(k, v)| (k, serde_json::Value::String(v)))
                .collect();
            println!("{}", serde_json::to_string_pretty(&outputs)?);
            return Ok(());
        }

        if matches!(outcome, RunOutcome::Skipped) {
            output::info("No certificate provided, nothing would be published");
            return Ok(());
        }

        println!("{}", output::header("Outputs (dry run):"));
        for key in [OUTPUT_SIGNTOOL_CMD, OUTPUT_CERTIFICATE_PATH, OUTPUT_SIGN_ARGS] {
            if let Some(value) = publisher.get(key) {
                println!("{}", output::key_value(key, &value));
            }
        }
        Ok(())
    }
}

/// Only the exact value `true` enables recursion
fn parse_recursive(value: &str) -> Result<bool, std::convert::Infallible> {
    Ok(value == "true")
}

fn outcome_json(outcome: &RunOutcome) -> serde_json::Value {
    match outcome {
        RunOutcome::Skipped => json!({ "status": "skipped" }),
        RunOutcome::TemplateOnly {
            template,
            certificate_path,
        } => json!({
            "status": "template_only",
            OUTPUT_SIGNTOOL_CMD: template.command(),
            OUTPUT_CERTIFICATE_PATH: certificate_path,
            OUTPUT_SIGN_ARGS: template.sign_args(),
        }),
        RunOutcome::Signed {
            template,
            certificate_path,
            report,
        } => json!({
            "status": "signed",
            OUTPUT_SIGNTOOL_CMD: template.command(),
            OUTPUT_CERTIFICATE_PATH: certificate_path,
            OUTPUT_SIGN_ARGS: template.sign_args(),
            "report": report,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use std::path::Path;
    use winsign_signing::CommandTemplate;

    fn parse(args: &[&str]) -> SignCommand {
        let cli = Cli::try_parse_from(args).unwrap();
        match cli.command {
            crate::cli::Commands::Sign(cmd) => cmd,
            _ => panic!("expected sign command"),
        }
    }

    #[test]
    fn test_parse_sign_flags() {
        let cmd = parse(&[
            "winsign",
            "sign",
            "--certificate",
            "aGVsbG8=",
            "--sign-args",
            "/a /fd sha384",
            "--folder",
            "out",
            "--recursive",
        ]);
        assert_eq!(cmd.certificate, "aGVsbG8=");
        assert_eq!(cmd.sign_args.as_deref(), Some("/a /fd sha384"));
        assert_eq!(cmd.folder, Some(PathBuf::from("out")));
        assert!(cmd.recursive);
        assert!(!cmd.dry_run);
    }

    #[test]
    fn test_recursive_requires_exact_true() {
        assert!(parse_recursive("true").unwrap());
        for value in ["True", "TRUE", "yes", "1", "on", "false", ""] {
            assert!(!parse_recursive(value).unwrap(), "{value:?}");
        }

        assert!(!parse(&["winsign", "sign", "--folder", "out"]).recursive);
    }

    #[test]
    fn test_dry_run_never_signs_folder() {
        let cmd = parse(&["winsign", "sign", "--folder", "out", "--dry-run"]);
        assert!(cmd.inputs().folder.is_none());
    }

    #[test]
    fn test_outcome_json_shape() {
        let template = CommandTemplate::new(
            "signtool.exe",
            Path::new("cert.pfx"),
            "http://timestamp.digicert.com",
            "sha256",
            None,
        );
        let value = outcome_json(&RunOutcome::TemplateOnly {
            template,
            certificate_path: PathBuf::from("cert.pfx"),
        });
        assert_eq!(value["status"], "template_only");
        assert_eq!(value["certificate_pfx_filepath"], "cert.pfx");
        assert_eq!(
            value["signtool_cmd"],
            "\"signtool.exe\" sign /f cert.pfx /tr http://timestamp.digicert.com /v /fd sha256 "
        );

        assert_eq!(outcome_json(&RunOutcome::Skipped)["status"], "skipped");
    }
}
