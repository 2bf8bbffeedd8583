//! Signer implementations

pub mod binary;
pub mod package;

pub use binary::BinarySigner;
pub use package::PackageSigner;

use std::process::Stdio;

use tokio::process::Command;
use tracing::{debug, info, warn};

use crate::signer::SignOutcome;

/// Run a prepared tool command to completion.
///
/// Output is logged on both outcomes. A launch failure becomes a failed
/// outcome whose stderr carries the launch error.
pub(crate) async fn run_tool(tool: &str, mut command: Command) -> SignOutcome {
    command.stdout(Stdio::piped()).stderr(Stdio::piped());

    let output = match command.output().await {
        Ok(output) => output,
        Err(e) => {
            warn!(tool, error = %e, "failed to launch signing tool");
            return SignOutcome::failed(String::new(), e.to_string());
        }
    };

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();

    if output.status.success() {
        if !stdout.trim().is_empty() {
            info!(tool, "{}", stdout.trim_end());
        }
        debug!(tool, "signing tool exited successfully");
        SignOutcome::succeeded(stdout, stderr)
    } else {
        warn!(tool, status = ?output.status.code(), "signing tool failed");
        if !stdout.trim().is_empty() {
            warn!(tool, "{}", stdout.trim_end());
        }
        if !stderr.trim().is_empty() {
            warn!(tool, "{}", stderr.trim_end());
        }
        SignOutcome::failed(stdout, stderr)
    }
}

/// Command that runs `line` through the platform shell
pub(crate) fn shell_command(line: &str) -> Command {
    #[cfg(windows)]
    {
        // cmd strips the outer quotes with /s, leaving the line intact.
        let mut command = Command::new("cmd");
        command.args(["/d", "/s", "/c"]);
        command.raw_arg(format!("\"{line}\""));
        command
    }

    #[cfg(not(windows))]
    {
        let mut command = Command::new("sh");
        command.arg("-c").arg(line);
        command
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_run_tool_success_captures_stdout() {
        let outcome = run_tool("sh", shell_command("echo signed")).await;
        assert!(outcome.is_success());
        assert_eq!(outcome.stdout.trim(), "signed");
    }

    #[tokio::test]
    async fn test_run_tool_nonzero_exit_is_failure() {
        let outcome = run_tool("sh", shell_command("echo nope >&2; exit 3")).await;
        assert!(!outcome.is_success());
        assert_eq!(outcome.stderr.trim(), "nope");
    }

    #[tokio::test]
    async fn test_run_tool_launch_failure_is_failure() {
        let command = Command::new("/definitely/not/a/real/tool");
        let outcome = run_tool("missing", command).await;
        assert!(!outcome.is_success());
        assert!(!outcome.stderr.is_empty());
    }
}
