//! Artifact classification
//!
//! An artifact's backend is decided by its extension alone. Extensions are
//! compared exactly as they appear on disk, so `APP.DLL` is not signed.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Extensions handled by signtool
pub const BINARY_EXTENSIONS: &[&str] = &[
    ".dll",
    ".exe",
    ".sys",
    ".vxd",
    ".msix",
    ".msixbundle",
    ".appx",
    ".appxbundle",
    ".msi",
    ".msp",
    ".msm",
    ".cab",
    ".ps1",
    ".psm1",
];

/// Extension handled by nuget
pub const PACKAGE_EXTENSION: &str = ".nupkg";

/// Which signing backend an artifact goes to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackendTag {
    /// signtool (executables, libraries, drivers, installers, scripts)
    Binary,
    /// nuget sign (.nupkg)
    Package,
    /// Not signed, never scanned
    Unsigned,
}

impl BackendTag {
    /// Get the tag name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Binary => "binary",
            Self::Package => "package",
            Self::Unsigned => "unsigned",
        }
    }
}

impl std::fmt::Display for BackendTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classify an extension (including the leading dot)
pub fn classify(extension: &str) -> BackendTag {
    if BINARY_EXTENSIONS.contains(&extension) {
        BackendTag::Binary
    } else if extension == PACKAGE_EXTENSION {
        BackendTag::Package
    } else {
        BackendTag::Unsigned
    }
}

/// Extension of a path with its leading dot, or empty when there is none.
///
/// Dotfiles such as `.ps1` on their own have no extension.
pub fn extension_of(path: &Path) -> String {
    path.extension()
        .map(|ext| format!(".{}", ext.to_string_lossy()))
        .unwrap_or_default()
}

/// A file eligible for signing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Artifact {
    /// Path to the file
    pub path: PathBuf,

    /// Extension with leading dot
    pub extension: String,

    /// Backend derived from the extension
    pub backend: BackendTag,
}

impl Artifact {
    /// Classify a path into an artifact
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let extension = extension_of(&path);
        let backend = classify(&extension);
        Self {
            path,
            extension,
            backend,
        }
    }

    /// Whether any backend signs this artifact
    pub fn is_signable(&self) -> bool {
        self.backend != BackendTag::Unsigned
    }
}
