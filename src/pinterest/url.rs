//! Pinterest URL normalization and classification.
//!
//! Normalization resolves `pin.it` short links to their canonical form by
//! following redirects; it is best-effort and never fails the caller, since
//! most inputs are already canonical. Classification inspects path segments
//! for the `pin` / `board` markers and produces a typed [`PinUrl`].

use url::Url;

use super::error::PinterestError;

/// Path segment marking a single pin: `/pin/<id>/`.
const PIN_MARKER: &str = "pin";

/// Path segment marking a board reference: `/board/<owner>/<name>/`.
const BOARD_MARKER: &str = "board";

/// A classified Pinterest URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PinUrl {
    /// A single pin, addressed by its numeric (usually) identifier.
    Pin {
        /// The identifier token following the `pin` path segment, verbatim.
        id: String,
    },
    /// A named board owned by a user.
    Board {
        /// The owner handle following the `board` marker.
        owner: String,
        /// The board name following the owner handle.
        name: String,
    },
}

/// Returns true if `url` is a short link that needs redirect resolution.
pub(crate) fn is_short_link(url: &str, short_host: &str) -> bool {
    Url::parse(url)
        .ok()
        .and_then(|u| u.host_str().map(|h| h.eq_ignore_ascii_case(short_host)))
        .unwrap_or(false)
}

/// Classifies a (possibly already normalized) Pinterest URL.
///
/// # Errors
///
/// Returns [`PinterestError::UnsupportedUrl`] when the URL is unparseable or
/// its path contains neither marker. This is deliberately a distinct error
/// from transport failures so the bot can tell the user the URL shape is
/// wrong rather than blaming the network.
pub fn classify(url: &str) -> Result<PinUrl, PinterestError> {
    let unsupported = || PinterestError::UnsupportedUrl {
        url: url.to_string(),
    };

    let parsed = Url::parse(url).map_err(|_| unsupported())?;
    let segments: Vec<&str> = parsed
        .path_segments()
        .map(Iterator::collect)
        .unwrap_or_default();

    if let Some(pos) = segments.iter().position(|s| *s == PIN_MARKER) {
        // The id is everything up to the next '/', taken verbatim.
        if let Some(id) = segments.get(pos + 1).filter(|s| !s.is_empty()) {
            return Ok(PinUrl::Pin {
                id: (*id).to_string(),
            });
        }
    }

    if let Some(pos) = segments.iter().position(|s| *s == BOARD_MARKER) {
        let owner = segments.get(pos + 1).filter(|s| !s.is_empty());
        let name = segments.get(pos + 2).filter(|s| !s.is_empty());
        if let (Some(owner), Some(name)) = (owner, name) {
            return Ok(PinUrl::Board {
                owner: (*owner).to_string(),
                name: (*name).to_string(),
            });
        }
    }

    Err(unsupported())
}
