//! Embedded structured-data extraction from Pinterest pages.
//!
//! Pin pages embed their client-side rendering state as JSON inside
//! `<script type="application/json">` blocks; there is no public API, so the
//! pipeline scrapes that state. A page carries several unrelated JSON
//! fragments, some of them malformed from our parser's point of view, so the
//! scan is fault tolerant: each block is tried in turn and skipped on any
//! parse failure or missing path, and only a fully exhausted scan is an error.

use std::sync::LazyLock;

use scraper::{Html, Selector};
use serde_json::Value;
use tracing::{debug, trace};

/// Nested path inside a qualifying script block that maps pin id to pin data.
const PINS_PATH: [&str; 3] = ["props", "initialReduxState", "pins"];

#[allow(clippy::expect_used)]
static SCRIPT_SELECTOR: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse(r#"script[type="application/json"]"#).expect("static selector is valid")
});

#[allow(clippy::expect_used)]
static PIN_MARKER_SELECTOR: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse(r#"div[data-test-id^="pin"]"#).expect("static selector is valid")
});

/// Scans the pin page HTML for the structured-data block carrying `pin_id`.
///
/// Returns the pin's data object from the first script block whose JSON
/// contains `props.initialReduxState.pins.<pin_id>`, or `None` when no block
/// qualifies.
#[must_use]
pub(crate) fn extract_pin_data(html: &str, pin_id: &str) -> Option<Value> {
    let document = Html::parse_document(html);

    for (index, script) in document.select(&SCRIPT_SELECTOR).enumerate() {
        let raw: String = script.text().collect();
        let data: Value = match serde_json::from_str(&raw) {
            Ok(data) => data,
            Err(error) => {
                trace!(block = index, %error, "skipping malformed script block");
                continue;
            }
        };

        let Some(pins) = lookup_path(&data, &PINS_PATH) else {
            trace!(block = index, "script block lacks pins mapping, skipping");
            continue;
        };

        if let Some(pin) = pins.get(pin_id) {
            debug!(block = index, pin_id, "found pin data");
            return Some(pin.clone());
        }
    }

    debug!(pin_id, "no script block carried the pin data");
    None
}

/// Scrapes a board page for embedded pin identifiers.
///
/// Pin-bearing elements carry a `data-test-id="pin<id>"` attribute; the
/// prefix is stripped and non-numeric remainders are discarded.
#[must_use]
pub(crate) fn extract_board_pin_ids(html: &str) -> Vec<String> {
    let document = Html::parse_document(html);
    let mut ids = Vec::new();

    for element in document.select(&PIN_MARKER_SELECTOR) {
        let Some(value) = element.value().attr("data-test-id") else {
            continue;
        };
        let id = value.trim_start_matches("pin");
        if !id.is_empty() && id.bytes().all(|b| b.is_ascii_digit()) {
            ids.push(id.to_string());
        }
    }

    debug!(count = ids.len(), "enumerated board pin ids");
    ids
}

/// Walks a dotted path through nested JSON objects.
fn lookup_path<'a>(value: &'a Value, path: &[&str]) -> Option<&'a Value> {
    path.iter().try_fold(value, |current, key| current.get(key))
}
