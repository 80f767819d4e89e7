//! HTTP client wrapper shared by all pipeline stages.
//!
//! Provides the [`HttpClient`] struct: a single connection-pooled client with
//! explicit timeouts, used for page fetches, short-link normalization, and
//! streaming asset downloads. Asset downloads write to a `.part` temp path and
//! rename on completion so a concurrently reading process never observes a
//! partially written file.

use std::path::{Path, PathBuf};
use std::time::Duration;

use futures_util::StreamExt;
use reqwest::Client;
use tokio::fs::File;
use tokio::io::{AsyncWriteExt, BufWriter};
use tracing::{debug, info, instrument};
use url::Url;

use super::constants::{CONNECT_TIMEOUT_SECS, READ_TIMEOUT_SECS};
use super::error::DownloadError;
use crate::user_agent;

/// HTTP client for upstream page and asset requests.
///
/// Designed to be created once and cloned into each downloader, taking
/// advantage of connection pooling. Cloning is cheap (`reqwest::Client` is an
/// `Arc` internally).
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
}

impl Default for HttpClient {
    fn default() -> Self {
        Self::new()
    }
}

impl HttpClient {
    /// Creates a new HTTP client with default timeouts.
    ///
    /// # Panics
    ///
    /// Panics if the HTTP client builder fails to build with the static
    /// configuration. This should never happen in practice.
    #[must_use]
    pub fn new() -> Self {
        Self::new_with_timeouts(CONNECT_TIMEOUT_SECS, READ_TIMEOUT_SECS)
    }

    /// Creates a new HTTP client with explicit timeout values.
    ///
    /// # Panics
    ///
    /// Panics if the HTTP client builder fails to build with the supplied
    /// timeout configuration.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn new_with_timeouts(connect_timeout_secs: u64, read_timeout_secs: u64) -> Self {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(connect_timeout_secs))
            .timeout(Duration::from_secs(read_timeout_secs))
            .gzip(true)
            .user_agent(user_agent::BROWSER_USER_AGENT)
            .build()
            .expect("failed to build HTTP client with static configuration");
        Self { client }
    }

    /// Returns a reference to the underlying reqwest client.
    #[must_use]
    pub fn inner(&self) -> &Client {
        &self.client
    }

    /// Fetches a page body as text.
    ///
    /// # Errors
    ///
    /// Returns [`DownloadError`] on transport failure, timeout, or any
    /// non-success HTTP status.
    #[instrument(skip(self), fields(url = %url))]
    pub async fn get_text(&self, url: &str) -> Result<String, DownloadError> {
        let response = self.send_get(url).await?;
        response
            .text()
            .await
            .map_err(|e| DownloadError::from_reqwest(url, e))
    }

    /// Follows redirects on `url` and returns the final resolved URL.
    ///
    /// Used for short-link normalization. Redirects are followed by the
    /// underlying client; the response body is discarded.
    ///
    /// # Errors
    ///
    /// Returns [`DownloadError`] on transport failure or non-success status.
    /// Callers performing best-effort normalization fall back to the original
    /// URL on error.
    #[instrument(skip(self), fields(url = %url))]
    pub async fn resolve_final_url(&self, url: &str) -> Result<String, DownloadError> {
        let response = self.send_get(url).await?;
        let resolved = response.url().to_string();
        debug!(resolved = %resolved, "redirects resolved");
        Ok(resolved)
    }

    /// Downloads `url` to exactly `dest`, creating parent directories.
    ///
    /// The body is streamed to `<dest>.part` and renamed into place once the
    /// stream completes and is flushed; on any failure the temp file is
    /// removed and `dest` is never created.
    ///
    /// # Errors
    ///
    /// Returns `DownloadError` if:
    /// - The URL is invalid
    /// - The request fails (network error, timeout)
    /// - The server returns a non-success status
    /// - Writing to disk fails
    #[must_use = "download result contains the number of bytes written"]
    #[instrument(skip(self), fields(url = %url, dest = %dest.display()))]
    pub async fn download_to_path(&self, url: &str, dest: &Path) -> Result<u64, DownloadError> {
        Url::parse(url).map_err(|_| DownloadError::invalid_url(url))?;

        let response = self.send_get(url).await?;

        if let Some(parent) = dest.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent)
                    .await
                    .map_err(|e| DownloadError::io(parent, e))?;
            }
        }

        let temp = temp_path(dest);
        let file = File::create(&temp)
            .await
            .map_err(|e| DownloadError::io(temp.clone(), e))?;

        match stream_to_file(file, response, url, &temp).await {
            Ok(bytes_written) => {
                tokio::fs::rename(&temp, dest)
                    .await
                    .map_err(|e| DownloadError::io(dest, e))?;
                info!(bytes = bytes_written, "download complete");
                Ok(bytes_written)
            }
            Err(error) => {
                debug!(path = %temp.display(), "removing partial temp file after error");
                let _ = tokio::fs::remove_file(&temp).await;
                Err(error)
            }
        }
    }

    async fn send_get(&self, url: &str) -> Result<reqwest::Response, DownloadError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| DownloadError::from_reqwest(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(DownloadError::http_status(url, status.as_u16()));
        }

        Ok(response)
    }
}

/// Streams a response body to an open file, returning bytes written.
async fn stream_to_file(
    file: File,
    response: reqwest::Response,
    url: &str,
    file_path: &Path,
) -> Result<u64, DownloadError> {
    let mut writer = BufWriter::new(file);
    let mut stream = response.bytes_stream();
    let mut bytes_written: u64 = 0;

    while let Some(chunk_result) = stream.next().await {
        let chunk = chunk_result.map_err(|e| DownloadError::from_reqwest(url, e))?;
        writer
            .write_all(&chunk)
            .await
            .map_err(|e| DownloadError::io(file_path, e))?;
        bytes_written += chunk.len() as u64;
    }

    writer
        .flush()
        .await
        .map_err(|e| DownloadError::io(file_path, e))?;

    Ok(bytes_written)
}

/// Temp path used while the body is streaming: `<dest>.part` in the same
/// directory, so the final rename stays on one filesystem.
fn temp_path(dest: &Path) -> PathBuf {
    let mut name = dest
        .file_name()
        .map_or_else(|| std::ffi::OsString::from("download"), ToOwned::to_owned);
    name.push(".part");
    dest.with_file_name(name)
}
