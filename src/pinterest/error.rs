//! Error taxonomy for the Pinterest pipeline.
//!
//! Four families of failure, all collapsed into a failure `DownloadResult`
//! at the orchestration boundary:
//! - unsupported input (URL matches no known shape)
//! - transport (network/DNS/timeout/HTTP status, wrapped [`DownloadError`])
//! - upstream shape (page fetched but the expected embedded data is absent)
//! - local I/O (surfaces through the transport wrapper's `Io` variant)
//!
//! Display strings are the user-facing messages the bot relays in chat; the
//! `#[source]` chain keeps the technical cause for logs.

use thiserror::Error;

use crate::download::DownloadError;

/// Errors from the Pinterest download pipeline stages.
#[derive(Debug, Error)]
pub enum PinterestError {
    /// The URL matches neither the pin nor the board shape.
    #[error("Unsupported Pinterest URL: {url}")]
    UnsupportedUrl {
        /// The URL that could not be classified.
        url: String,
    },

    /// A pin operation was invoked with a board (or other) URL.
    #[error("URL must be a Pinterest pin")]
    NotAPin {
        /// The classified-but-wrong URL.
        url: String,
    },

    /// A board operation was invoked with a pin (or other) URL.
    #[error("URL must be a Pinterest board")]
    NotABoard {
        /// The classified-but-wrong URL.
        url: String,
    },

    /// The pin page could not be fetched (transport or HTTP status).
    #[error("Failed to fetch pin data")]
    PinFetch {
        /// The pin being fetched.
        pin_id: String,
        /// The underlying transport error.
        #[source]
        source: DownloadError,
    },

    /// The pin page was fetched but no embedded script block carried the
    /// pin's data.
    #[error("Pin data not found")]
    PayloadNotFound {
        /// The pin whose data was missing.
        pin_id: String,
    },

    /// The pin data lacks the expected asset path.
    #[error("No image URL found for pin {pin_id} (missing {path})")]
    MissingAssetUrl {
        /// The pin whose payload was incomplete.
        pin_id: String,
        /// The dotted JSON path that was absent.
        path: &'static str,
    },

    /// The asset itself failed to download (transport, status, or disk).
    #[error("Failed to download image")]
    AssetDownload {
        /// The asset URL that failed.
        url: String,
        /// The underlying transport or I/O error.
        #[source]
        source: DownloadError,
    },

    /// The board page could not be fetched for identifier enumeration.
    #[error("Failed to fetch board data")]
    BoardFetch {
        /// Owner handle of the board.
        owner: String,
        /// Board name.
        name: String,
        /// The underlying transport error.
        #[source]
        source: DownloadError,
    },
}
