use crate::{Error, Result};
use lazy_static::lazy_static;
use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

/// Fallback artifact name when the response carries no usable
/// Content-Disposition filename.
pub const DEFAULT_FILE_NAME: &str = "downloaded.ext";

lazy_static! {
    // Matches filename="example.vsix" or filename=example.vsix
    static ref CONTENT_DISPOSITION_FILENAME: Regex =
        Regex::new(r#"(?i)filename[^;=]*=(?:"([^"]*)"|([^;\s]*))"#).unwrap();
}

/// Extract the suggested filename from a Content-Disposition header value,
/// falling back to `default_name` when the header is absent or malformed.
pub fn filename_from_content_disposition(header: Option<&str>, default_name: &str) -> String {
    let Some(header) = header else {
        return default_name.to_string();
    };

    CONTENT_DISPOSITION_FILENAME
        .captures(header)
        .and_then(|caps| caps.get(1).or_else(|| caps.get(2)))
        .map(|m| m.as_str())
        .filter(|name| !name.is_empty())
        .map_or_else(|| default_name.to_string(), str::to_string)
}

/// Where downloaded bytes land. Injected into the [`Downloader`] so tests
/// can substitute an in-memory store.
pub trait FileStore: Send + Sync {
    /// Write `bytes` to `dir/file_name`, overwriting any existing file of
    /// the same name, and return the full path.
    fn write(&self, dir: &Path, file_name: &str, bytes: &[u8]) -> std::io::Result<PathBuf>;
}

/// The production [`FileStore`]: plain filesystem writes.
#[derive(Debug, Default)]
pub struct DiskStore;

impl FileStore for DiskStore {
    fn write(&self, dir: &Path, file_name: &str, bytes: &[u8]) -> std::io::Result<PathBuf> {
        let path = dir.join(file_name);
        std::fs::write(&path, bytes)?;
        Ok(path)
    }
}

/// Result of one download attempt for one extension. Produced once per
/// attempt and never mutated afterwards.
#[derive(Debug)]
pub struct DownloadOutcome {
    pub succeeded: bool,
    pub saved_path: Option<PathBuf>,
    pub http_status: Option<u16>,
    pub failure: Option<Error>,
}

impl DownloadOutcome {
    pub fn saved(path: PathBuf, http_status: u16) -> Self {
        Self {
            succeeded: true,
            saved_path: Some(path),
            http_status: Some(http_status),
            failure: None,
        }
    }

    pub fn failed(failure: Error) -> Self {
        let http_status = match &failure {
            Error::Http(status) => Some(*status),
            _ => None,
        };
        Self {
            succeeded: false,
            saved_path: None,
            http_status,
            failure: Some(failure),
        }
    }
}

/// Fetches a URL with a bounded wait and persists the body through a
/// [`FileStore`].
pub struct Downloader {
    client: reqwest::Client,
    store: Arc<dyn FileStore>,
    download_dir: PathBuf,
    timeout: Duration,
}

impl Downloader {
    pub fn new(download_dir: impl Into<PathBuf>, timeout: Duration) -> Self {
        Self::with_store(download_dir, timeout, Arc::new(DiskStore))
    }

    pub fn with_store(
        download_dir: impl Into<PathBuf>,
        timeout: Duration,
        store: Arc<dyn FileStore>,
    ) -> Self {
        Self {
            client: reqwest::Client::new(),
            store,
            download_dir: download_dir.into(),
            timeout,
        }
    }

    /// Fetch `url` and write the body to the download directory.
    ///
    /// The fetch (request + body) is raced against the download timeout;
    /// when the timer fires first the in-flight request is dropped and the
    /// attempt classified as [`Error::DownloadTimeout`]. A non-2xx status
    /// is [`Error::Http`]. Nothing is written on either failure.
    pub async fn fetch_and_save(&self, url: &str, default_name: &str) -> Result<DownloadOutcome> {
        let fetch = async {
            let response = self.client.get(url).send().await?;
            let status = response.status();
            if !status.is_success() {
                return Err(Error::Http(status.as_u16()));
            }

            let file_name = filename_from_content_disposition(
                response
                    .headers()
                    .get(reqwest::header::CONTENT_DISPOSITION)
                    .and_then(|value| value.to_str().ok()),
                default_name,
            );
            let bytes = response.bytes().await?;
            Ok((status.as_u16(), file_name, bytes))
        };

        let (status, file_name, bytes) = match tokio::time::timeout(self.timeout, fetch).await {
            Ok(result) => result?,
            Err(_) => return Err(Error::DownloadTimeout(self.timeout.as_millis() as u64)),
        };

        let path = self.store.write(&self.download_dir, &file_name, &bytes)?;
        tracing::debug!(
            "saved {} bytes to {} (HTTP {})",
            bytes.len(),
            path.display(),
            status
        );

        Ok(DownloadOutcome::saved(path, status))
    }
}
