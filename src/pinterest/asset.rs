//! Best-quality asset selection and filename derivation.
//!
//! Pin data exposes image variants under `images`; the `orig` variant is the
//! highest quality one and its `url` field is the downloadable asset. The
//! local filename is `pin_<id><suffix>` with the suffix taken verbatim from
//! the asset URL's path; an extensionless asset URL yields an extensionless
//! filename rather than a forced default.

use serde_json::Value;
use url::Url;

use super::error::PinterestError;

/// Dotted path to the original-quality image URL inside pin data.
const ORIG_IMAGE_PATH: &str = "images.orig.url";

/// A resolved downloadable asset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetReference {
    /// Direct URL of the binary.
    pub url: String,
    /// File suffix inferred from the URL path, including the leading dot.
    /// Empty when the URL path has no suffix.
    pub extension: String,
}

/// Picks the original-quality image URL out of pin data.
///
/// # Errors
///
/// Returns [`PinterestError::MissingAssetUrl`] naming the absent path when
/// any link of the `images.orig.url` lookup is missing or not a string.
pub(crate) fn select_original_image(
    pin_id: &str,
    pin: &Value,
) -> Result<AssetReference, PinterestError> {
    let url = pin
        .get("images")
        .and_then(|v| v.get("orig"))
        .and_then(|v| v.get("url"))
        .and_then(Value::as_str)
        .ok_or(PinterestError::MissingAssetUrl {
            pin_id: pin_id.to_string(),
            path: ORIG_IMAGE_PATH,
        })?;

    Ok(AssetReference {
        extension: extension_from_url(url),
        url: url.to_string(),
    })
}

/// Derives the local filename for a pin's asset: `pin_<id><suffix>`.
#[must_use]
pub(crate) fn pin_filename(pin_id: &str, asset: &AssetReference) -> String {
    format!("pin_{pin_id}{}", asset.extension)
}

/// Extracts the suffix (including the leading dot) from a URL's final path
/// segment, verbatim. Returns an empty string when there is none.
fn extension_from_url(url: &str) -> String {
    let Ok(parsed) = Url::parse(url) else {
        return String::new();
    };
    let Some(last_segment) = parsed.path_segments().and_then(|mut s| s.next_back()) else {
        return String::new();
    };
    match last_segment.rfind('.') {
        // A leading dot makes the whole segment a "hidden" name, not a suffix.
        Some(index) if index > 0 => last_segment[index..].to_string(),
        _ => String::new(),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn pin_with_image(url: &str) -> Value {
        serde_json::json!({ "images": { "orig": { "url": url } }, "title": "T" })
    }

    #[test]
    fn test_select_original_image() {
        let pin = pin_with_image("https://i.example/img123.jpg");
        let asset = select_original_image("123", &pin).unwrap();
        assert_eq!(asset.url, "https://i.example/img123.jpg");
        assert_eq!(asset.extension, ".jpg");
    }

    #[test]
    fn test_select_missing_images_is_error() {
        let pin = serde_json::json!({ "title": "T" });
        let error = select_original_image("123", &pin).unwrap_err();
        assert!(matches!(error, PinterestError::MissingAssetUrl { .. }));
        assert!(error.to_string().contains("No image URL found"));
        assert!(error.to_string().contains("images.orig.url"));
    }

    #[test]
    fn test_select_missing_orig_variant_is_error() {
        let pin = serde_json::json!({ "images": { "236x": { "url": "https://x/y.jpg" } } });
        assert!(select_original_image("123", &pin).is_err());
    }

    #[test]
    fn test_select_non_string_url_is_error() {
        let pin = serde_json::json!({ "images": { "orig": { "url": 42 } } });
        assert!(select_original_image("123", &pin).is_err());
    }

    #[test]
    fn test_pin_filename_with_suffix() {
        let pin = pin_with_image("https://i.example/a/b/img123.jpg");
        let asset = select_original_image("123", &pin).unwrap();
        assert_eq!(pin_filename("123", &asset), "pin_123.jpg");
    }

    #[test]
    fn test_pin_filename_without_suffix_has_no_forced_extension() {
        // Extensionless asset URL: the filename must stay extensionless.
        let pin = pin_with_image("https://i.example/raw/img123");
        let asset = select_original_image("123", &pin).unwrap();
        assert_eq!(asset.extension, "");
        assert_eq!(pin_filename("123", &asset), "pin_123");
    }

    #[test]
    fn test_extension_ignores_query_string() {
        assert_eq!(extension_from_url("https://x/y/img.png?w=1200"), ".png");
    }

    #[test]
    fn test_extension_preserves_case_verbatim() {
        assert_eq!(extension_from_url("https://x/y/IMG.JPG"), ".JPG");
    }

    #[test]
    fn test_extension_hidden_file_segment() {
        assert_eq!(extension_from_url("https://x/y/.jpg"), "");
    }

    #[test]
    fn test_extension_unparseable_url() {
        assert_eq!(extension_from_url("not a url"), "");
    }
}
