//! Error types for the download module.
//!
//! Structured errors for all HTTP operations, carrying enough context (URL,
//! status, path) that the orchestration layer can turn them into a
//! human-readable failure message without losing the cause chain.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while talking to upstream hosts or writing files.
#[derive(Debug, Error)]
pub enum DownloadError {
    /// Network-level error (DNS resolution, connection refused, TLS errors, etc.)
    #[error("network error requesting {url}: {source}")]
    Network {
        /// The URL that failed.
        url: String,
        /// The underlying network error.
        #[source]
        source: reqwest::Error,
    },

    /// Request timed out before completion.
    #[error("timeout requesting {url}")]
    Timeout {
        /// The URL that timed out.
        url: String,
    },

    /// HTTP error response (4xx client errors, 5xx server errors).
    #[error("HTTP {status} requesting {url}")]
    HttpStatus {
        /// The URL that returned an error status.
        url: String,
        /// The HTTP status code.
        status: u16,
    },

    /// File system error during download (create file, write, rename).
    #[error("IO error writing to {path}: {source}")]
    Io {
        /// The file path where the error occurred.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// The provided URL is malformed or invalid.
    #[error("invalid URL: {url}")]
    InvalidUrl {
        /// The invalid URL string.
        url: String,
    },
}

impl DownloadError {
    /// Creates a network error from a reqwest error, classifying timeouts.
    pub fn from_reqwest(url: impl Into<String>, source: reqwest::Error) -> Self {
        if source.is_timeout() {
            Self::Timeout { url: url.into() }
        } else {
            Self::Network {
                url: url.into(),
                source,
            }
        }
    }

    /// Creates an HTTP status error.
    pub fn http_status(url: impl Into<String>, status: u16) -> Self {
        Self::HttpStatus {
            url: url.into(),
            status,
        }
    }

    /// Creates an IO error.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Creates an invalid URL error.
    pub fn invalid_url(url: impl Into<String>) -> Self {
        Self::InvalidUrl { url: url.into() }
    }

    /// Returns the HTTP status code, when this error carries one.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::HttpStatus { status, .. } => Some(*status),
            _ => None,
        }
    }
}

// No `From<reqwest::Error>`/`From<std::io::Error>` impls: the variants need
// context (url, path) the source errors do not carry, so callers go through
// the constructor helpers instead.

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_http_status_display() {
        let error = DownloadError::http_status("https://example.com/img.jpg", 404);
        let msg = error.to_string();
        assert!(msg.contains("404"), "Expected '404' in: {msg}");
        assert!(
            msg.contains("https://example.com/img.jpg"),
            "Expected URL in: {msg}"
        );
    }

    #[test]
    fn test_timeout_display() {
        let error = DownloadError::Timeout {
            url: "https://example.com/slow".to_string(),
        };
        assert!(error.to_string().contains("timeout"));
        assert!(error.to_string().contains("https://example.com/slow"));
    }

    #[test]
    fn test_io_display_includes_path() {
        let io_error = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "access denied");
        let error = DownloadError::io(PathBuf::from("/tmp/pin_1.jpg"), io_error);
        assert!(error.to_string().contains("/tmp/pin_1.jpg"));
    }

    #[test]
    fn test_invalid_url_display() {
        let error = DownloadError::invalid_url("not-a-url");
        let msg = error.to_string();
        assert!(msg.contains("invalid URL"), "Expected prefix in: {msg}");
        assert!(msg.contains("not-a-url"));
    }

    #[test]
    fn test_status_accessor() {
        assert_eq!(
            DownloadError::http_status("https://x/y", 500).status(),
            Some(500)
        );
        assert_eq!(DownloadError::invalid_url("x").status(), None);
    }
}
