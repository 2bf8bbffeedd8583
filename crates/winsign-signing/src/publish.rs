//! Publishing run outputs back to the CI host

use std::io::Write;
use std::path::PathBuf;
use std::sync::Mutex;

use tracing::warn;

/// Output key for the signtool command template
pub const OUTPUT_SIGNTOOL_CMD: &str = "signtool_cmd";

/// Output key for the decoded certificate path
pub const OUTPUT_CERTIFICATE_PATH: &str = "certificate_pfx_filepath";

/// Output key for the resolved signtool arguments
pub const OUTPUT_SIGN_ARGS: &str = "sign_args";

/// Receives run outputs. Publishing is fire-and-forget.
pub trait OutputPublisher: Send + Sync {
    /// Publish one output value
    fn publish(&self, key: &str, value: &str);

    /// Report that the run failed
    fn fail(&self, message: &str);
}

/// Publishes outputs the way GitHub Actions expects them.
///
/// Values are appended to the `$GITHUB_OUTPUT` file when it is set, otherwise
/// emitted as `::set-output` workflow commands on stdout.
#[derive(Debug, Clone, Default)]
pub struct GithubOutputPublisher {
    output_file: Option<PathBuf>,
}

const HEREDOC_DELIMITER: &str = "WINSIGN_EOF";

impl GithubOutputPublisher {
    /// Publisher writing to `$GITHUB_OUTPUT` if present
    pub fn from_env() -> Self {
        Self {
            output_file: std::env::var_os("GITHUB_OUTPUT").map(PathBuf::from),
        }
    }

    /// Publisher writing to an explicit output file
    pub fn with_output_file(path: impl Into<PathBuf>) -> Self {
        Self {
            output_file: Some(path.into()),
        }
    }

    fn append(&self, path: &PathBuf, key: &str, value: &str) -> std::io::Result<()> {
        let mut file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)?;
        if value.contains('\n') {
            writeln!(file, "{key}<<{HEREDOC_DELIMITER}")?;
            writeln!(file, "{value}")?;
            writeln!(file, "{HEREDOC_DELIMITER}")?;
        } else {
            writeln!(file, "{key}={value}")?;
        }
        Ok(())
    }
}

impl OutputPublisher for GithubOutputPublisher {
    fn publish(&self, key: &str, value: &str) {
        match &self.output_file {
            Some(path) => {
                if let Err(e) = self.append(path, key, value) {
                    warn!(key, path = %path.display(), error = %e, "failed to write output");
                }
            }
            None => println!("::set-output name={}::{}", key, escape_data(value)),
        }
    }

    fn fail(&self, message: &str) {
        println!("::error::{}", escape_data(message));
    }
}

/// Escape a workflow command value
fn escape_data(value: &str) -> String {
    value
        .replace('%', "%25")
        .replace('\r', "%0D")
        .replace('\n', "%0A")
}

/// Collects outputs in memory
#[derive(Debug, Default)]
pub struct MemoryPublisher {
    outputs: Mutex<Vec<(String, String)>>,
    failures: Mutex<Vec<String>>,
}

impl MemoryPublisher {
    /// Create an empty publisher
    pub fn new() -> Self {
        Self::default()
    }

    /// Last value published under `key`
    pub fn get(&self, key: &str) -> Option<String> {
        self.outputs
            .lock()
            .ok()?
            .iter()
            .rev()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.clone())
    }

    /// All published values in order
    pub fn outputs(&self) -> Vec<(String, String)> {
        self.outputs.lock().map(|o| o.clone()).unwrap_or_default()
    }

    /// All failure messages in order
    pub fn failures(&self) -> Vec<String> {
        self.failures.lock().map(|f| f.clone()).unwrap_or_default()
    }
}

impl OutputPublisher for MemoryPublisher {
    fn publish(&self, key: &str, value: &str) {
        if let Ok(mut outputs) = self.outputs.lock() {
            outputs.push((key.to_string(), value.to_string()));
        }
    }

    fn fail(&self, message: &str) {
        if let Ok(mut failures) = self.failures.lock() {
            failures.push(message.to_string());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_github_output_file_single_line() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("output");
        let publisher = GithubOutputPublisher::with_output_file(&path);

        publisher.publish(OUTPUT_SIGN_ARGS, "sign /f cert.pfx /v ");
        publisher.publish(OUTPUT_CERTIFICATE_PATH, "C:/Temp/certificate.pfx");

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(
            content,
            "sign_args=sign /f cert.pfx /v \ncertificate_pfx_filepath=C:/Temp/certificate.pfx\n"
        );
    }

    #[test]
    fn test_github_output_file_multi_line() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("output");
        let publisher = GithubOutputPublisher::with_output_file(&path);

        publisher.publish("notes", "line one\nline two");

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content, "notes<<WINSIGN_EOF\nline one\nline two\nWINSIGN_EOF\n");
    }

    #[test]
    fn test_escape_data() {
        assert_eq!(escape_data("100%\r\nok"), "100%25%0D%0Aok");
    }

    #[test]
    fn test_memory_publisher_keeps_last_value() {
        let publisher = MemoryPublisher::new();
        publisher.publish("k", "first");
        publisher.publish("k", "second");
        publisher.fail("boom");

        assert_eq!(publisher.get("k").as_deref(), Some("second"));
        assert_eq!(publisher.outputs().len(), 2);
        assert_eq!(publisher.failures(), vec!["boom".to_string()]);
        assert!(publisher.get("missing").is_none());
    }
}
