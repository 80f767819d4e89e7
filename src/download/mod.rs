//! Shared HTTP plumbing for platform downloaders.
//!
//! One pooled [`HttpClient`] is constructed at startup and handed to every
//! downloader; per-call client construction is deliberately avoided so
//! connections are reused across the pipeline stages.

mod client;
pub mod constants;
mod error;
pub mod rate_limiter;

pub use client::HttpClient;
pub use error::DownloadError;
pub use rate_limiter::RateLimiter;
