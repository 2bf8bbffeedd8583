//! Lazy directory scan for signable artifacts

use std::path::{Path, PathBuf};

use tracing::debug;
use walkdir::WalkDir;

use crate::artifact::Artifact;
use crate::error::{Result, SigningError};

/// Walks a directory tree and yields signable artifacts as they are found.
///
/// Directories are opened only when the walk reaches them. Entries are
/// visited depth-first in file-name order and symlinks are followed. After
/// an error the scanner yields nothing further; artifacts already yielded
/// are unaffected.
pub struct ArtifactScanner {
    root: PathBuf,
    walker: Option<walkdir::IntoIter>,
}

impl ArtifactScanner {
    /// Create a scanner rooted at `root`
    pub fn new(root: impl Into<PathBuf>, recursive: bool) -> Self {
        let root = root.into();
        let walker = WalkDir::new(&root)
            .min_depth(1)
            .max_depth(if recursive { usize::MAX } else { 1 })
            .follow_links(true)
            .sort_by_file_name()
            .into_iter();

        Self {
            root,
            walker: Some(walker),
        }
    }

    fn scan_failed(&self, error: walkdir::Error) -> SigningError {
        let path = error
            .path()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| self.root.clone());
        SigningError::ScanFailed {
            path,
            source: error.into(),
        }
    }
}

impl Iterator for ArtifactScanner {
    type Item = Result<Artifact>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let entry = match self.walker.as_mut()?.next()? {
                Ok(entry) => entry,
                Err(e) => {
                    self.walker = None;
                    return Some(Err(self.scan_failed(e)));
                }
            };

            if !entry.file_type().is_file() {
                continue;
            }

            let artifact = Artifact::from_path(entry.into_path());
            if artifact.is_signable() {
                debug!(path = %artifact.path.display(), backend = %artifact.backend, "found artifact");
                return Some(Ok(artifact));
            }
        }
    }
}
