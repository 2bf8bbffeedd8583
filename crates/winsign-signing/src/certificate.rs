//! Certificate materialization

use std::path::Path;

use base64::alphabet;
use base64::engine::general_purpose::{GeneralPurpose, GeneralPurposeConfig};
use base64::engine::DecodePaddingMode;
use base64::Engine;
use tracing::info;

use crate::error::Result;

/// Standard alphabet, padding optional, non-zero trailing bits tolerated
const LENIENT: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new()
        .with_decode_padding_mode(DecodePaddingMode::Indifferent)
        .with_decode_allow_trailing_bits(true),
);

/// Decode a base64 certificate.
///
/// Whitespace is ignored so wrapped secrets decode, padding is optional, and
/// the URL-safe `-` and `_` are read as `+` and `/`. An empty input decodes
/// to no bytes, which callers treat as "signing disabled".
pub fn decode_certificate(encoded: &str) -> Result<Vec<u8>> {
    let normalized: String = encoded
        .chars()
        .filter(|c| !c.is_whitespace())
        .map(|c| match c {
            '-' => '+',
            '_' => '/',
            c => c,
        })
        .collect();
    Ok(LENIENT.decode(normalized)?)
}

/// Write the decoded certificate to `path`
pub async fn write_certificate(path: &Path, certificate: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }
    info!("Writing {} bytes to {}.", certificate.len(), path.display());
    tokio::fs::write(path, certificate).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SigningError;
    use tempfile::TempDir;

    #[test]
    fn test_decode_empty() {
        assert!(decode_certificate("").unwrap().is_empty());
        assert!(decode_certificate(" \n").unwrap().is_empty());
    }

    #[test]
    fn test_decode_wrapped_input() {
        let decoded = decode_certificate("aGVs\nbG8g\r\nd29y bGQ=").unwrap();
        assert_eq!(decoded, b"hello world");
    }

    #[test]
    fn test_decode_without_padding() {
        assert_eq!(decode_certificate("aGVsbG8").unwrap(), b"hello");
        assert_eq!(decode_certificate("aGVsbG8=").unwrap(), b"hello");
    }

    #[test]
    fn test_decode_url_safe_alphabet() {
        assert_eq!(decode_certificate("-_8=").unwrap(), vec![0xFB, 0xFF]);
        assert_eq!(decode_certificate("+/8=").unwrap(), vec![0xFB, 0xFF]);
    }

    #[test]
    fn test_decode_rejects_garbage() {
        let err = decode_certificate("not base64!").unwrap_err();
        assert!(matches!(err, SigningError::InvalidCertificate(_)));
    }

    #[tokio::test]
    async fn test_write_certificate_creates_parent() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("nested").join("certificate.pfx");
        write_certificate(&path, b"\x30\x82").await.unwrap();
        assert_eq!(std::fs::read(&path).unwrap(), b"\x30\x82");
    }
}
