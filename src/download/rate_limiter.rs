//! Per-domain request pacing.
//!
//! A [`RateLimiter`] enforces a minimum delay between requests to the same
//! domain, while requests to different domains proceed independently. The
//! policy is injectable, so tests run with paused tokio time instead of real
//! delays.

use std::sync::Arc;
use std::time::Duration;

use dashmap::DashMap;
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::{debug, instrument};

/// Per-domain request pacer.
///
/// Wrap in `Arc` and share across downloaders. `DashMap` gives lock-free
/// access to per-domain slots; each slot's timestamp sits behind a
/// `tokio::sync::Mutex` so check-and-update is atomic across awaits.
#[derive(Debug)]
pub struct RateLimiter {
    /// Minimum delay between requests to the same domain.
    delay: Duration,

    /// Whether pacing is disabled entirely.
    disabled: bool,

    /// Last-request instant per domain. The `Arc` lets the `DashMap` shard
    /// lock be released before awaiting on the inner mutex.
    domains: DashMap<String, Arc<Mutex<Option<Instant>>>>,
}

impl RateLimiter {
    /// Creates a rate limiter enforcing `delay` between same-domain requests.
    #[must_use]
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            disabled: false,
            domains: DashMap::new(),
        }
    }

    /// Creates a disabled rate limiter that applies no delays.
    #[must_use]
    pub fn disabled() -> Self {
        Self {
            delay: Duration::ZERO,
            disabled: true,
            domains: DashMap::new(),
        }
    }

    /// Returns whether pacing is disabled.
    #[must_use]
    pub fn is_disabled(&self) -> bool {
        self.disabled
    }

    /// Returns the configured minimum delay.
    #[must_use]
    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Waits until a request to `url`'s domain is allowed, then records it.
    ///
    /// The first request to any domain proceeds immediately.
    #[instrument(skip(self), fields(domain))]
    pub async fn acquire(&self, url: &str) {
        if self.disabled {
            return;
        }

        let domain = extract_domain(url);
        tracing::Span::current().record("domain", domain.as_str());

        let slot = self
            .domains
            .entry(domain.clone())
            .or_insert_with(|| Arc::new(Mutex::new(None)))
            .clone();

        let mut last_request = slot.lock().await;

        if let Some(last) = *last_request {
            let elapsed = last.elapsed();
            if elapsed < self.delay {
                let wait = self.delay.saturating_sub(elapsed);
                debug!(domain = %domain, wait_ms = wait.as_millis(), "pacing delay");
                tokio::time::sleep(wait).await;
            }
        } else {
            debug!(domain = %domain, "first request to domain, no delay");
        }

        *last_request = Some(Instant::now());
    }
}

/// Extracts the domain from a URL.
///
/// Returns "unknown" for malformed URLs so even unparseable requests share a
/// pacing slot rather than bypassing the limiter.
#[must_use]
pub fn extract_domain(url: &str) -> String {
    url::Url::parse(url)
        .ok()
        .and_then(|u| u.host_str().map(str::to_lowercase))
        .unwrap_or_else(|| "unknown".to_string())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_new_keeps_delay() {
        let limiter = RateLimiter::new(Duration::from_millis(500));
        assert_eq!(limiter.delay(), Duration::from_millis(500));
        assert!(!limiter.is_disabled());
    }

    #[tokio::test]
    async fn test_disabled_applies_no_delay() {
        tokio::time::pause();

        let limiter = RateLimiter::disabled();
        let start = Instant::now();

        limiter.acquire("https://example.com/1").await;
        limiter.acquire("https://example.com/2").await;

        assert!(start.elapsed() < Duration::from_millis(10));
    }

    #[tokio::test]
    async fn test_first_request_is_immediate() {
        tokio::time::pause();

        let limiter = RateLimiter::new(Duration::from_secs(1));
        let start = Instant::now();

        limiter.acquire("https://example.com/pin/1/").await;

        assert!(start.elapsed() < Duration::from_millis(10));
    }

    #[tokio::test]
    async fn test_same_domain_requests_are_paced() {
        tokio::time::pause();

        let limiter = RateLimiter::new(Duration::from_secs(1));
        let start = Instant::now();

        limiter.acquire("https://example.com/pin/1/").await;
        limiter.acquire("https://example.com/pin/2/").await;
        assert!(start.elapsed() >= Duration::from_secs(1));

        limiter.acquire("https://example.com/pin/3/").await;
        assert!(start.elapsed() >= Duration::from_secs(2));
    }

    #[tokio::test]
    async fn test_different_domains_are_independent() {
        tokio::time::pause();

        let limiter = RateLimiter::new(Duration::from_secs(1));

        limiter.acquire("https://example.com/pin/1/").await;

        let start = Instant::now();
        limiter.acquire("https://other.com/pin/1/").await;
        assert!(start.elapsed() < Duration::from_millis(10));
    }

    #[tokio::test]
    async fn test_malformed_urls_share_a_slot() {
        tokio::time::pause();

        let limiter = RateLimiter::new(Duration::from_secs(1));

        limiter.acquire("not a url").await;
        let start = Instant::now();
        limiter.acquire("also not a url").await;
        assert!(start.elapsed() >= Duration::from_secs(1));
    }

    #[test]
    fn test_extract_domain_lowercases_host() {
        assert_eq!(extract_domain("https://Example.COM/Path"), "example.com");
    }

    #[test]
    fn test_extract_domain_with_port() {
        assert_eq!(extract_domain("http://127.0.0.1:8080/pin/1/"), "127.0.0.1");
    }

    #[test]
    fn test_extract_domain_malformed() {
        assert_eq!(extract_domain("not a valid url"), "unknown");
    }
}
