//! Platform identification and the downloader trait seam.
//!
//! The bot layer hands every incoming URL to [`detect_platform`] and then
//! dispatches to the matching [`PlatformDownloader`]. This crate ships the
//! Pinterest implementation; the other platform downloaders live behind the
//! same trait.

use std::fmt;
use std::path::PathBuf;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use url::Url;

/// Supported media platforms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    /// YouTube videos and shorts.
    YouTube,
    /// Instagram posts, reels, stories.
    Instagram,
    /// Reddit posts.
    Reddit,
    /// Pinterest pins and boards.
    Pinterest,
    /// Spotify tracks and playlists.
    Spotify,
}

impl Platform {
    /// Returns the lowercase tag used in history rows and download paths.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::YouTube => "youtube",
            Self::Instagram => "instagram",
            Self::Reddit => "reddit",
            Self::Pinterest => "pinterest",
            Self::Spotify => "spotify",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Platform {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "youtube" => Ok(Self::YouTube),
            "instagram" => Ok(Self::Instagram),
            "reddit" => Ok(Self::Reddit),
            "pinterest" => Ok(Self::Pinterest),
            "spotify" => Ok(Self::Spotify),
            _ => Err(format!("unknown platform: {s}")),
        }
    }
}

/// Identifies which platform a URL belongs to from its host.
///
/// Returns `None` for unparseable URLs and unknown hosts; the bot surfaces
/// that as "unsupported platform" before any downloader runs.
#[must_use]
pub fn detect_platform(url: &str) -> Option<Platform> {
    let parsed = Url::parse(url).ok()?;
    let host = parsed.host_str()?.to_lowercase();
    let host = host.strip_prefix("www.").unwrap_or(&host);

    if host == "youtu.be" || host == "youtube.com" || host.ends_with(".youtube.com") {
        return Some(Platform::YouTube);
    }
    if host == "instagram.com" || host.ends_with(".instagram.com") {
        return Some(Platform::Instagram);
    }
    if host == "redd.it" || host == "reddit.com" || host.ends_with(".reddit.com") {
        return Some(Platform::Reddit);
    }
    if host == "pin.it" || host == "pinterest.com" || host.ends_with(".pinterest.com") {
        return Some(Platform::Pinterest);
    }
    if host == "spotify.com" || host.ends_with(".spotify.com") {
        return Some(Platform::Spotify);
    }
    None
}

/// Outcome of one top-level download attempt.
///
/// This is the sole unit returned across the download boundary: every stage
/// failure is collapsed into a failure result carrying a human-readable
/// message, and no error escapes a downloader as a raw `Err` or panic.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DownloadResult {
    /// Whether the download completed.
    pub success: bool,
    /// Platform-specific content identifier (set on success).
    pub id: Option<String>,
    /// Content title, when the upstream payload carried one.
    pub title: Option<String>,
    /// Content description, when the upstream payload carried one.
    pub description: Option<String>,
    /// Local path of the downloaded file (set on success).
    pub path: Option<PathBuf>,
    /// Size of the downloaded file in bytes (set on success).
    pub file_size: Option<u64>,
    /// Human-readable failure message (set on failure).
    pub error: Option<String>,
    /// When the attempt finished (ISO-8601 when serialized).
    pub timestamp: DateTime<Utc>,
}

impl DownloadResult {
    /// Builds a success result stamped with the current time.
    #[must_use]
    pub fn completed(
        id: impl Into<String>,
        title: Option<String>,
        description: Option<String>,
        path: PathBuf,
        file_size: u64,
    ) -> Self {
        Self {
            success: true,
            id: Some(id.into()),
            title,
            description,
            path: Some(path),
            file_size: Some(file_size),
            error: None,
            timestamp: Utc::now(),
        }
    }

    /// Builds a failure result from a stage error, stamped with the current time.
    #[must_use]
    pub fn failed(error: &dyn fmt::Display) -> Self {
        Self {
            success: false,
            id: None,
            title: None,
            description: None,
            path: None,
            file_size: None,
            error: Some(error.to_string()),
            timestamp: Utc::now(),
        }
    }
}

/// A single-item downloader for one platform.
///
/// `async_trait` keeps the trait object-safe so the bot can hold a
/// `Vec<Box<dyn PlatformDownloader>>` and dispatch on [`detect_platform`].
#[async_trait]
pub trait PlatformDownloader: Send + Sync {
    /// The platform this downloader serves.
    fn platform(&self) -> Platform;

    /// Returns true if this downloader accepts the given URL.
    fn can_handle(&self, url: &str) -> bool;

    /// Downloads the single item addressed by `url`.
    ///
    /// Never fails at the call boundary: all errors become failure results.
    async fn download(&self, url: &str) -> DownloadResult;
}

/// Extension for platforms whose content is grouped into named collections.
#[async_trait]
pub trait CollectionDownloader: PlatformDownloader {
    /// Downloads every item in the collection at `url`, item by item.
    ///
    /// `limit` truncates the enumerated item list before downloading.
    /// Per-item failures are reported individually in the returned sequence;
    /// a failure enumerating the collection aborts the batch and yields a
    /// single failure element.
    async fn download_collection(&self, url: &str, limit: Option<usize>) -> Vec<DownloadResult>;
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_youtube_hosts() {
        assert_eq!(
            detect_platform("https://www.youtube.com/watch?v=abc"),
            Some(Platform::YouTube)
        );
        assert_eq!(
            detect_platform("https://youtu.be/abc"),
            Some(Platform::YouTube)
        );
        assert_eq!(
            detect_platform("https://m.youtube.com/watch?v=abc"),
            Some(Platform::YouTube)
        );
    }

    #[test]
    fn test_detect_pinterest_hosts() {
        assert_eq!(
            detect_platform("https://www.pinterest.com/pin/123/"),
            Some(Platform::Pinterest)
        );
        assert_eq!(
            detect_platform("https://pin.it/abc"),
            Some(Platform::Pinterest)
        );
    }

    #[test]
    fn test_detect_other_platforms() {
        assert_eq!(
            detect_platform("https://www.instagram.com/p/abc/"),
            Some(Platform::Instagram)
        );
        assert_eq!(
            detect_platform("https://www.reddit.com/r/rust/comments/1/"),
            Some(Platform::Reddit)
        );
        assert_eq!(
            detect_platform("https://open.spotify.com/track/abc"),
            Some(Platform::Spotify)
        );
    }

    #[test]
    fn test_detect_unknown_host() {
        assert_eq!(detect_platform("https://example.com/whatever"), None);
    }

    #[test]
    fn test_detect_unparseable_url() {
        assert_eq!(detect_platform("not a url"), None);
    }

    #[test]
    fn test_detect_does_not_match_lookalike_host() {
        assert_eq!(detect_platform("https://notpinterest.com/pin/1/"), None);
        assert_eq!(detect_platform("https://pinterest.com.evil.example/pin/1/"), None);
    }

    #[test]
    fn test_platform_round_trips_through_str() {
        for platform in [
            Platform::YouTube,
            Platform::Instagram,
            Platform::Reddit,
            Platform::Pinterest,
            Platform::Spotify,
        ] {
            assert_eq!(platform.as_str().parse::<Platform>().unwrap(), platform);
        }
    }

    #[test]
    fn test_failed_result_carries_message_and_timestamp() {
        let result = DownloadResult::failed(&"Failed to download image");
        assert!(!result.success);
        assert_eq!(result.error.as_deref(), Some("Failed to download image"));
        assert!(result.path.is_none());
    }

    #[test]
    fn test_completed_result_fields() {
        let result = DownloadResult::completed(
            "123",
            Some("T".to_string()),
            None,
            PathBuf::from("/tmp/pin_123.jpg"),
            42,
        );
        assert!(result.success);
        assert_eq!(result.id.as_deref(), Some("123"));
        assert_eq!(result.file_size, Some(42));
        assert!(result.error.is_none());
    }
}
