//! Mediagrab Core Library
//!
//! This library provides the download pipeline behind a multi-platform media
//! downloader bot: it identifies which platform an incoming URL belongs to,
//! runs the platform-specific downloader, and records every attempt in a
//! download-history store.
//!
//! # Architecture
//!
//! The library is organized into the following modules:
//! - [`platform`] - Platform identification and the downloader trait seam
//! - [`pinterest`] - Pinterest pin/board downloader (URL classification,
//!   embedded-payload extraction, asset selection)
//! - [`download`] - Shared HTTP plumbing: pooled client, streaming file
//!   fetcher with atomic writes, per-domain request pacing
//! - [`history`] - SQLite-backed download history and statistics
//! - [`config`] - Runtime configuration (download roots, pacing, timeouts)

// Clippy lints - strict for library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod download;
pub mod history;
pub mod pinterest;
pub mod platform;
pub(crate) mod user_agent;

// Re-export commonly used types
pub use config::Config;
pub use download::{DownloadError, HttpClient, RateLimiter};
pub use history::{Database, DbError, DownloadRecord, DownloadStats, HistoryError, HistoryStore};
pub use pinterest::{AssetReference, PinUrl, PinterestDownloader, PinterestError};
pub use platform::{
    CollectionDownloader, DownloadResult, Platform, PlatformDownloader, detect_platform,
};
