//! Timeout and pacing defaults for upstream HTTP traffic.

use std::time::Duration;

/// Default connect timeout for upstream requests.
///
/// Every client carries both timeouts so a request against an unresponsive
/// host cannot hang indefinitely.
pub const CONNECT_TIMEOUT_SECS: u64 = 15;

/// Default read timeout for upstream requests (covers large asset bodies).
pub const READ_TIMEOUT_SECS: u64 = 120;

/// Default minimum delay between requests to the same upstream domain.
pub const DEFAULT_REQUEST_DELAY: Duration = Duration::from_secs(1);
