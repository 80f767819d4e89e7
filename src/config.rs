//! Runtime configuration.
//!
//! Defaults are suitable for a local bot deployment and every field can be
//! overridden with a `MEDIAGRAB_*` environment variable. Values that fail to
//! parse fall back to the default rather than aborting startup.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::download::constants::{
    CONNECT_TIMEOUT_SECS, DEFAULT_REQUEST_DELAY, READ_TIMEOUT_SECS,
};
use crate::platform::Platform;

/// Runtime configuration for the download pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Root directory for downloaded files; each platform gets a subdirectory.
    pub download_root: PathBuf,
    /// Path of the SQLite history database.
    pub history_db: PathBuf,
    /// Minimum delay between successive requests to the same domain.
    pub request_delay_ms: u64,
    /// Connection establishment timeout.
    pub connect_timeout_secs: u64,
    /// Whole-request timeout, covering large asset bodies.
    pub read_timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            download_root: PathBuf::from("downloads"),
            history_db: PathBuf::from("downloads/history.db"),
            request_delay_ms: u64::try_from(DEFAULT_REQUEST_DELAY.as_millis()).unwrap_or(1000),
            connect_timeout_secs: CONNECT_TIMEOUT_SECS,
            read_timeout_secs: READ_TIMEOUT_SECS,
        }
    }
}

impl Config {
    /// Builds a configuration from defaults plus `MEDIAGRAB_*` overrides:
    /// `MEDIAGRAB_DOWNLOAD_ROOT`, `MEDIAGRAB_HISTORY_DB`,
    /// `MEDIAGRAB_REQUEST_DELAY_MS`, `MEDIAGRAB_CONNECT_TIMEOUT_SECS`,
    /// `MEDIAGRAB_READ_TIMEOUT_SECS`.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            download_root: get("MEDIAGRAB_DOWNLOAD_ROOT")
                .map_or(defaults.download_root, PathBuf::from),
            history_db: get("MEDIAGRAB_HISTORY_DB").map_or(defaults.history_db, PathBuf::from),
            request_delay_ms: parse_or(
                get("MEDIAGRAB_REQUEST_DELAY_MS"),
                "MEDIAGRAB_REQUEST_DELAY_MS",
                defaults.request_delay_ms,
            ),
            connect_timeout_secs: parse_or(
                get("MEDIAGRAB_CONNECT_TIMEOUT_SECS"),
                "MEDIAGRAB_CONNECT_TIMEOUT_SECS",
                defaults.connect_timeout_secs,
            ),
            read_timeout_secs: parse_or(
                get("MEDIAGRAB_READ_TIMEOUT_SECS"),
                "MEDIAGRAB_READ_TIMEOUT_SECS",
                defaults.read_timeout_secs,
            ),
        }
    }

    /// Download directory for one platform, e.g. `downloads/pinterest`.
    #[must_use]
    pub fn platform_dir(&self, platform: Platform) -> PathBuf {
        self.download_root.join(platform.as_str())
    }

    /// The per-domain pacing delay as a [`Duration`].
    #[must_use]
    pub fn request_delay(&self) -> Duration {
        Duration::from_millis(self.request_delay_ms)
    }

    /// Connection timeout as a [`Duration`].
    #[must_use]
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    /// Whole-request timeout as a [`Duration`].
    #[must_use]
    pub fn read_timeout(&self) -> Duration {
        Duration::from_secs(self.read_timeout_secs)
    }

    /// Path of the history database as a [`Path`].
    #[must_use]
    pub fn history_db_path(&self) -> &Path {
        &self.history_db
    }
}

fn parse_or(value: Option<String>, key: &str, default: u64) -> u64 {
    match value {
        Some(raw) => match raw.parse() {
            Ok(parsed) => parsed,
            Err(_) => {
                warn!(key, raw, "invalid value, using default");
                default
            }
        },
        None => default,
    }
}
