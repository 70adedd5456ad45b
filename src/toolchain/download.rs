//! Archive downloads

use crate::error::{Error, Result};
use async_trait::async_trait;
use reqwest::Client;
use std::path::{Path, PathBuf};
use tokio::fs::File;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info};

/// Fetches a URL into a local file
#[async_trait]
pub trait Downloader: Send + Sync {
    /// Download `url` into a new file inside `dest_dir` and return its path
    async fn download(&self, url: &str, dest_dir: &Path) -> Result<PathBuf>;
}

/// [`Downloader`] over HTTP(S)
pub struct HttpDownloader {
    client: Client,
}

impl HttpDownloader {
    /// Create a downloader with its own HTTP client
    pub fn new() -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("pub-release/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| Error::Toolchain(format!("failed to create HTTP client: {e}")))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl Downloader for HttpDownloader {
    async fn download(&self, url: &str, dest_dir: &Path) -> Result<PathBuf> {
        let parsed = url::Url::parse(url)
            .map_err(|e| Error::Toolchain(format!("invalid download URL {url}: {e}")))?;
        let file_name = parsed
            .path_segments()
            .and_then(|mut segments| segments.next_back())
            .filter(|name| !name.is_empty())
            .unwrap_or("download");

        tokio::fs::create_dir_all(dest_dir).await?;
        let dest = dest_dir.join(format!("{}-{file_name}", uuid::Uuid::new_v4()));

        info!(url, "downloading");
        let mut response = self
            .client
            .get(parsed)
            .send()
            .await?
            .error_for_status()
            .map_err(|e| Error::Toolchain(format!("download of {url} failed: {e}")))?;

        let mut file = File::create(&dest).await?;
        let mut written: u64 = 0;
        while let Some(chunk) = response.chunk().await? {
            file.write_all(&chunk).await?;
            written += chunk.len() as u64;
        }
        file.flush().await?;

        debug!(url, bytes = written, dest = %dest.display(), "downloaded");
        Ok(dest)
    }
}
