//! Pinterest pin and board downloader.
//!
//! The pipeline has five stages, each a leaf utility composed here:
//! normalize (short-link resolution) → classify (pin vs. board) → fetch the
//! embedded structured-data payload → select the original-quality asset →
//! stream the asset to disk. Every stage returns a typed error; the two
//! public operations collapse any stage failure into a failure
//! [`DownloadResult`], so no error crosses the download boundary.

mod asset;
mod error;
mod payload;
mod url;

pub use asset::AssetReference;
pub use error::PinterestError;
pub use self::url::{PinUrl, classify};

use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use tracing::{debug, instrument, warn};

use crate::download::{HttpClient, RateLimiter};
use crate::platform::{
    CollectionDownloader, DownloadResult, Platform, PlatformDownloader, detect_platform,
};

const DEFAULT_BASE_URL: &str = "https://www.pinterest.com";
const DEFAULT_SHORT_LINK_HOST: &str = "pin.it";

/// Downloads Pinterest pins and boards to a local directory.
pub struct PinterestDownloader {
    client: HttpClient,
    rate_limiter: Arc<RateLimiter>,
    download_dir: PathBuf,
    base_url: String,
    short_link_host: String,
}

/// A fully downloaded pin, before collapsing into a [`DownloadResult`].
#[derive(Debug)]
struct PinDownload {
    id: String,
    title: Option<String>,
    description: Option<String>,
    path: PathBuf,
    bytes: u64,
}

impl PinterestDownloader {
    /// Creates a downloader writing under `download_dir`.
    ///
    /// The client and rate limiter are shared with the rest of the process;
    /// pass the same instances every downloader uses.
    #[must_use]
    pub fn new(
        client: HttpClient,
        rate_limiter: Arc<RateLimiter>,
        download_dir: impl Into<PathBuf>,
    ) -> Self {
        Self::with_base_urls(
            client,
            rate_limiter,
            download_dir,
            DEFAULT_BASE_URL,
            DEFAULT_SHORT_LINK_HOST,
        )
    }

    /// Creates a downloader with custom upstream hosts (for tests).
    #[must_use]
    pub fn with_base_urls(
        client: HttpClient,
        rate_limiter: Arc<RateLimiter>,
        download_dir: impl Into<PathBuf>,
        base_url: impl Into<String>,
        short_link_host: impl Into<String>,
    ) -> Self {
        Self {
            client,
            rate_limiter,
            download_dir: download_dir.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            short_link_host: short_link_host.into(),
        }
    }

    /// Downloads a single pin.
    ///
    /// Any stage failure short-circuits the rest and becomes a failure
    /// result carrying the stage's message and a timestamp.
    #[instrument(skip(self), fields(url = %url))]
    pub async fn download_pin(&self, url: &str) -> DownloadResult {
        match self.try_download_pin(url).await {
            Ok(pin) => {
                debug!(pin_id = %pin.id, path = %pin.path.display(), "pin downloaded");
                DownloadResult::completed(pin.id, pin.title, pin.description, pin.path, pin.bytes)
            }
            Err(error) => {
                warn!(error = %error, "pin download failed");
                DownloadResult::failed(&error)
            }
        }
    }

    /// Downloads every pin on a board, one at a time.
    ///
    /// Identifier enumeration failure aborts the whole batch and yields a
    /// single failure element; per-item failures are isolated and reported
    /// individually in the sequence. The pacing limiter enforces the delay
    /// between iterations.
    #[instrument(skip(self), fields(url = %url, limit))]
    pub async fn download_board(&self, url: &str, limit: Option<usize>) -> Vec<DownloadResult> {
        let mut pin_ids = match self.board_pin_ids(url).await {
            Ok(ids) => ids,
            Err(error) => {
                warn!(error = %error, "board enumeration failed, aborting batch");
                return vec![DownloadResult::failed(&error)];
            }
        };

        if let Some(limit) = limit {
            pin_ids.truncate(limit);
        }

        let mut results = Vec::with_capacity(pin_ids.len());
        for pin_id in pin_ids {
            let pin_url = self.pin_page_url(&pin_id);
            results.push(self.download_pin(&pin_url).await);
        }
        results
    }

    async fn try_download_pin(&self, url: &str) -> Result<PinDownload, PinterestError> {
        let canonical = self.normalize(url).await;

        let reference = classify(&canonical)?;
        let PinUrl::Pin { id } = reference else {
            return Err(PinterestError::NotAPin { url: canonical });
        };

        let pin = self.fetch_pin_data(&id).await?;

        let asset = asset::select_original_image(&id, &pin)?;
        let dest = self.download_dir.join(asset::pin_filename(&id, &asset));

        let bytes = self
            .client
            .download_to_path(&asset.url, &dest)
            .await
            .map_err(|source| PinterestError::AssetDownload {
                url: asset.url.clone(),
                source,
            })?;

        Ok(PinDownload {
            id,
            title: string_field(&pin, "title"),
            description: string_field(&pin, "description"),
            path: dest,
            bytes,
        })
    }

    /// Resolves short links to canonical form, best-effort.
    ///
    /// Normalization failure must not block classification: many inputs are
    /// already canonical, so on any transport failure or non-success status
    /// the original URL is returned unchanged.
    async fn normalize(&self, url: &str) -> String {
        if !url::is_short_link(url, &self.short_link_host) {
            return url.to_string();
        }
        match self.client.resolve_final_url(url).await {
            Ok(resolved) => resolved,
            Err(error) => {
                debug!(error = %error, "short link resolution failed, keeping original URL");
                url.to_string()
            }
        }
    }

    async fn fetch_pin_data(&self, pin_id: &str) -> Result<Value, PinterestError> {
        let page_url = self.pin_page_url(pin_id);
        self.rate_limiter.acquire(&page_url).await;

        let html =
            self.client
                .get_text(&page_url)
                .await
                .map_err(|source| PinterestError::PinFetch {
                    pin_id: pin_id.to_string(),
                    source,
                })?;

        payload::extract_pin_data(&html, pin_id).ok_or_else(|| PinterestError::PayloadNotFound {
            pin_id: pin_id.to_string(),
        })
    }

    async fn board_pin_ids(&self, url: &str) -> Result<Vec<String>, PinterestError> {
        let canonical = self.normalize(url).await;

        let reference = classify(&canonical)?;
        let PinUrl::Board { owner, name } = reference else {
            return Err(PinterestError::NotABoard { url: canonical });
        };

        // Board pages live at /<owner>/<name>/, not under the marker path.
        let board_url = format!("{}/{}/{}/", self.base_url, owner, name);
        let html = self.client.get_text(&board_url).await.map_err(|source| {
            PinterestError::BoardFetch {
                owner,
                name,
                source,
            }
        })?;

        Ok(payload::extract_board_pin_ids(&html))
    }

    fn pin_page_url(&self, pin_id: &str) -> String {
        format!("{}/pin/{}/", self.base_url, pin_id)
    }
}

impl std::fmt::Debug for PinterestDownloader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PinterestDownloader")
            .field("download_dir", &self.download_dir)
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl PlatformDownloader for PinterestDownloader {
    fn platform(&self) -> Platform {
        Platform::Pinterest
    }

    fn can_handle(&self, url: &str) -> bool {
        detect_platform(url) == Some(Platform::Pinterest)
    }

    async fn download(&self, url: &str) -> DownloadResult {
        self.download_pin(url).await
    }
}

#[async_trait]
impl CollectionDownloader for PinterestDownloader {
    async fn download_collection(&self, url: &str, limit: Option<usize>) -> Vec<DownloadResult> {
        self.download_board(url, limit).await
    }
}

fn string_field(pin: &Value, key: &str) -> Option<String> {
    pin.get(key).and_then(Value::as_str).map(ToString::to_string)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn test_downloader() -> PinterestDownloader {
        PinterestDownloader::new(
            HttpClient::new(),
            Arc::new(RateLimiter::disabled()),
            "/tmp/pinterest",
        )
    }

    #[test]
    fn test_pin_page_url() {
        let downloader = test_downloader();
        assert_eq!(
            downloader.pin_page_url("123"),
            "https://www.pinterest.com/pin/123/"
        );
    }

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let downloader = PinterestDownloader::with_base_urls(
            HttpClient::new(),
            Arc::new(RateLimiter::disabled()),
            "/tmp/pinterest",
            "http://127.0.0.1:9/",
            "pin.it",
        );
        assert_eq!(downloader.pin_page_url("1"), "http://127.0.0.1:9/pin/1/");
    }

    #[test]
    fn test_can_handle_pinterest_urls_only() {
        let downloader = test_downloader();
        assert!(downloader.can_handle("https://www.pinterest.com/pin/1/"));
        assert!(downloader.can_handle("https://pin.it/abc"));
        assert!(!downloader.can_handle("https://example.com/pin/1/"));
    }

    #[tokio::test]
    async fn test_normalize_is_idempotent_for_canonical_urls() {
        // A canonical URL never matches the short-link host, so no request
        // is made and the input comes back unchanged.
        let downloader = test_downloader();
        let url = "https://www.pinterest.com/pin/123/";
        assert_eq!(downloader.normalize(url).await, url);
    }

    #[tokio::test]
    async fn test_download_pin_rejects_board_url() {
        let downloader = test_downloader();
        let result = downloader
            .download_pin("https://www.pinterest.com/board/alice/sunsets/")
            .await;
        assert!(!result.success);
        assert_eq!(result.error.as_deref(), Some("URL must be a Pinterest pin"));
    }

    #[tokio::test]
    async fn test_download_pin_unsupported_url_is_distinct_from_network_errors() {
        let downloader = test_downloader();
        let result = downloader
            .download_pin("https://www.pinterest.com/ideas/travel/")
            .await;
        assert!(!result.success);
        let error = result.error.unwrap();
        assert!(
            error.contains("Unsupported Pinterest URL"),
            "unexpected message: {error}"
        );
    }

    #[tokio::test]
    async fn test_download_board_rejects_pin_url() {
        let downloader = test_downloader();
        let results = downloader
            .download_board("https://www.pinterest.com/pin/123/", None)
            .await;
        assert_eq!(results.len(), 1);
        assert_eq!(
            results[0].error.as_deref(),
            Some("URL must be a Pinterest board")
        );
    }
}
