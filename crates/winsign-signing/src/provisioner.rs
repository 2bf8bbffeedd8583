//! One-shot provisioning of the nuget executable
//!
//! The tool is fetched at most once per run. A file already present at the
//! expected path is trusted as-is; there is no checksum or re-download.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::io::AsyncWriteExt;
use tokio::sync::OnceCell;
use tracing::{debug, info, instrument};

use winsign_core::config::NugetConfig;

use crate::error::{Result, SigningError};

/// Where a missing tool comes from
#[async_trait::async_trait]
pub trait ToolSource: Send + Sync {
    /// Fetch `url` into `destination`, returning the number of bytes written
    async fn fetch(&self, url: &str, destination: &Path) -> Result<u64>;
}

/// Downloads tools over HTTP(S)
#[derive(Debug, Clone, Default)]
pub struct HttpToolSource {
    client: reqwest::Client,
}

impl HttpToolSource {
    /// Create a source with a default client
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl ToolSource for HttpToolSource {
    async fn fetch(&self, url: &str, destination: &Path) -> Result<u64> {
        let mut response = self
            .client
            .get(url)
            .send()
            .await?
            .error_for_status()
            .map_err(|e| SigningError::ToolDownload {
                tool: file_label(destination),
                url: url.to_string(),
                reason: e.to_string(),
            })?;

        if let Some(parent) = destination.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        // Stream into a sibling file so an interrupted download never
        // leaves a truncated tool at the cached path.
        let partial = partial_path(destination);
        let mut file = tokio::fs::File::create(&partial).await?;
        let mut written = 0u64;
        while let Some(chunk) = response.chunk().await? {
            file.write_all(&chunk).await?;
            written += chunk.len() as u64;
        }
        file.flush().await?;
        drop(file);

        tokio::fs::rename(&partial, destination).await?;
        Ok(written)
    }
}

/// Resolves the local path of an external tool, fetching it on first use
pub struct ToolProvisioner {
    tool_path: PathBuf,
    download_url: String,
    source: Arc<dyn ToolSource>,
    resolved: OnceCell<PathBuf>,
}

impl ToolProvisioner {
    /// Create a provisioner for the tool at `tool_path`
    pub fn new(
        tool_path: impl Into<PathBuf>,
        download_url: impl Into<String>,
        source: Arc<dyn ToolSource>,
    ) -> Self {
        Self {
            tool_path: tool_path.into(),
            download_url: download_url.into(),
            source,
            resolved: OnceCell::new(),
        }
    }

    /// Create a provisioner for nuget from configuration
    pub fn nuget(config: &NugetConfig, source: Arc<dyn ToolSource>) -> Self {
        Self::new(config.resolved_path(), &config.download_url, source)
    }

    /// Expected local path of the tool
    pub fn tool_path(&self) -> &Path {
        &self.tool_path
    }

    /// Whether `ensure` has already resolved the tool this run
    pub fn is_resolved(&self) -> bool {
        self.resolved.initialized()
    }

    /// Make sure the tool exists locally and return its path.
    ///
    /// Download errors are fatal and not retried here.
    #[instrument(skip(self), fields(tool = %self.tool_path.display()))]
    pub async fn ensure(&self) -> Result<PathBuf> {
        self.resolved
            .get_or_try_init(|| async {
                if tokio::fs::try_exists(&self.tool_path).await? {
                    debug!("tool already present");
                    return Ok(self.tool_path.clone());
                }

                info!(url = %self.download_url, "Downloading {}", file_label(&self.tool_path));
                let bytes = self
                    .source
                    .fetch(&self.download_url, &self.tool_path)
                    .await?;
                info!(bytes, "download complete");
                Ok::<_, SigningError>(self.tool_path.clone())
            })
            .await
            .cloned()
    }
}

impl std::fmt::Debug for ToolProvisioner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolProvisioner")
            .field("tool_path", &self.tool_path)
            .field("download_url", &self.download_url)
            .field("resolved", &self.resolved.get())
            .finish()
    }
}

fn file_label(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}

fn partial_path(destination: &Path) -> PathBuf {
    let mut name = destination.as_os_str().to_owned();
    name.push(".part");
    PathBuf::from(name)
}
