//! Configuration validation

use tracing::debug;

use crate::error::{ConfigError, Result};

use super::types::Config;

/// Validate configuration
pub fn validate_config(config: &Config) -> Result<()> {
    debug!("validating configuration");
    validate_signtool(config)?;
    validate_nuget(config)?;
    validate_retry(config)?;
    debug!("configuration validation passed");
    Ok(())
}

fn validate_signtool(config: &Config) -> Result<()> {
    if config.signtool.path.trim().is_empty() {
        return Err(invalid("signtool.path", "path cannot be empty"));
    }

    if !is_http_url(&config.signtool.timestamp_url) {
        return Err(invalid(
            "signtool.timestamp_url",
            "must be an http:// or https:// URL",
        ));
    }

    if config.signtool.digest_algorithm.trim().is_empty() {
        return Err(invalid("signtool.digest_algorithm", "cannot be empty"));
    }

    Ok(())
}

fn validate_nuget(config: &Config) -> Result<()> {
    if !is_http_url(&config.nuget.download_url) {
        return Err(invalid(
            "nuget.download_url",
            "must be an http:// or https:// URL",
        ));
    }

    Ok(())
}

fn validate_retry(config: &Config) -> Result<()> {
    if config.retry.max_attempts == 0 {
        return Err(invalid("retry.max_attempts", "must be at least 1"));
    }

    Ok(())
}

fn is_http_url(value: &str) -> bool {
    let rest = value
        .strip_prefix("https://")
        .or_else(|| value.strip_prefix("http://"));
    matches!(rest, Some(host) if !host.is_empty())
}

fn invalid(field: &str, message: &str) -> crate::error::WinsignError {
    ConfigError::InvalidValue {
        field: field.to_string(),
        message: message.to_string(),
    }
    .into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate_config(&Config::default()).is_ok());
    }

    #[test]
    fn test_zero_attempts_rejected() {
        let mut config = Config::default();
        config.retry.max_attempts = 0;
        let err = validate_config(&config).unwrap_err();
        assert!(err.to_string().contains("retry.max_attempts"));
    }

    #[test]
    fn test_timestamp_url_must_be_http() {
        let mut config = Config::default();
        config.signtool.timestamp_url = "timestamp.digicert.com".to_string();
        assert!(validate_config(&config).is_err());

        config.signtool.timestamp_url = "https://".to_string();
        assert!(validate_config(&config).is_err());

        config.signtool.timestamp_url = "https://ts.example.com".to_string();
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_empty_signtool_path_rejected() {
        let mut config = Config::default();
        config.signtool.path = "  ".to_string();
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_download_url_must_be_http() {
        let mut config = Config::default();
        config.nuget.download_url = "ftp://example.com/nuget.exe".to_string();
        let err = validate_config(&config).unwrap_err();
        assert!(err.to_string().contains("nuget.download_url"));
    }
}
