//! signtool command line construction

use std::path::Path;

/// Fully-formed signtool command, minus the file to sign.
///
/// The default flag set is `/tr <url> /v /fd <digest>`. An override replaces
/// those flags entirely; `sign /f <certificate>` is always kept in front.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandTemplate {
    tool_path: String,
    sign_args: String,
}

impl CommandTemplate {
    /// Build the template for one certificate
    pub fn new(
        tool_path: &str,
        certificate_path: &Path,
        timestamp_url: &str,
        digest_algorithm: &str,
        args_override: Option<&str>,
    ) -> Self {
        let certificate = quote_if_needed(&certificate_path.display().to_string());
        let sign_args = match args_override.map(str::trim).filter(|a| !a.is_empty()) {
            Some(custom) => format!("sign /f {certificate} {custom} "),
            None => format!(
                "sign /f {certificate} /tr {timestamp_url} /v /fd {digest_algorithm} "
            ),
        };

        Self {
            tool_path: tool_path.to_string(),
            sign_args,
        }
    }

    /// The resolved signtool arguments, starting with `sign /f`
    pub fn sign_args(&self) -> &str {
        &self.sign_args
    }

    /// Path of the signing tool
    pub fn tool_path(&self) -> &str {
        &self.tool_path
    }

    /// Command line ready for a file path to be appended
    pub fn command(&self) -> String {
        format!("\"{}\" {}", self.tool_path, self.sign_args)
    }

    /// Command line that signs `file`
    pub fn for_file(&self, file: &Path) -> String {
        format!("{}\"{}\"", self.command(), file.display())
    }
}

impl std::fmt::Display for CommandTemplate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.command())
    }
}

fn quote_if_needed(value: &str) -> String {
    if value.contains(char::is_whitespace) {
        format!("\"{value}\"")
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOOL: &str = "C:/Program Files (x86)/Windows Kits/10/bin/10.0.17763.0/x86/signtool.exe";
    const TIMESTAMP: &str = "http://timestamp.digicert.com";

    #[test]
    fn test_default_template() {
        let template = CommandTemplate::new(
            TOOL,
            Path::new("C:/Temp/certificate.pfx"),
            TIMESTAMP,
            "sha256",
            None,
        );

        assert_eq!(
            template.sign_args(),
            "sign /f C:/Temp/certificate.pfx /tr http://timestamp.digicert.com /v /fd sha256 "
        );
        assert_eq!(
            template.command(),
            format!(
                "\"{TOOL}\" sign /f C:/Temp/certificate.pfx /tr http://timestamp.digicert.com /v /fd sha256 "
            )
        );
    }

    #[test]
    fn test_override_replaces_default_flags() {
        let template = CommandTemplate::new(
            TOOL,
            Path::new("C:/Temp/certificate.pfx"),
            TIMESTAMP,
            "sha256",
            Some("/p secret /t http://other.example.com"),
        );

        assert_eq!(
            template.sign_args(),
            "sign /f C:/Temp/certificate.pfx /p secret /t http://other.example.com "
        );
        assert!(!template.command().contains("/fd sha256"));
        assert!(!template.command().contains(TIMESTAMP));
        assert_eq!(template.command().matches("sign /f").count(), 1);
    }

    #[test]
    fn test_blank_override_uses_defaults() {
        let template = CommandTemplate::new(
            TOOL,
            Path::new("cert.pfx"),
            TIMESTAMP,
            "sha256",
            Some("   "),
        );
        assert!(template.sign_args().contains("/fd sha256"));
    }

    #[test]
    fn test_for_file_appends_quoted_path() {
        let template =
            CommandTemplate::new("signtool", Path::new("cert.pfx"), TIMESTAMP, "sha256", None);
        let line = template.for_file(Path::new("out dir/app.exe"));
        assert!(line.starts_with("\"signtool\" sign /f cert.pfx"));
        assert!(line.ends_with("/fd sha256 \"out dir/app.exe\""));
    }

    #[test]
    fn test_certificate_path_with_spaces_is_quoted() {
        let template = CommandTemplate::new(
            "signtool",
            Path::new("C:/My Temp/cert.pfx"),
            TIMESTAMP,
            "sha256",
            None,
        );
        assert!(template.sign_args().starts_with("sign /f \"C:/My Temp/cert.pfx\" "));
    }
}
