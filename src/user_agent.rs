//! Shared User-Agent string for upstream page and asset requests.
//!
//! Upstream media hosts serve different markup (or none at all) to clients
//! that do not look like a browser, so all outbound traffic identifies as one.
//! No credentials are ever attached.

/// Browser-identifying User-Agent sent on every upstream request.
pub(crate) const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
    AppleWebKit/537.36 (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_agent_looks_like_a_browser() {
        assert!(BROWSER_USER_AGENT.starts_with("Mozilla/5.0"));
        assert!(BROWSER_USER_AGENT.contains("Chrome"));
    }
}
