//! Media asset records and per-asset attribution results.

use serde::{Deserialize, Serialize};

/// Label shown in tables and exports when no provider matched.
pub const UNKNOWN_SOURCE: &str = "Unknown";

/// One scannable media item as produced by an asset store.
///
/// Only the four text fields (filename, title, alt text, description) are
/// matched against provider rules. `media_url` is carried for display and
/// export.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct AssetRecord {
    /// Stable asset identifier
    #[cfg_attr(feature = "openapi", schema(example = 1042))]
    pub id: i64,

    /// URL of the media file
    #[serde(default)]
    #[cfg_attr(
        feature = "openapi",
        schema(example = "https://example.com/uploads/shutterstock_12345.jpg")
    )]
    pub media_url: String,

    /// Base name of the stored file
    #[serde(default)]
    #[cfg_attr(feature = "openapi", schema(example = "shutterstock_12345.jpg"))]
    pub filename: String,

    /// Title text
    #[serde(default)]
    pub title: String,

    /// Alternative text
    #[serde(default, rename = "alt")]
    pub alt_text: String,

    /// Long description
    #[serde(default)]
    pub description: String,
}

impl AssetRecord {
    pub fn new(id: i64) -> Self {
        Self {
            id,
            ..Self::default()
        }
    }

    pub fn with_filename(mut self, filename: impl Into<String>) -> Self {
        self.filename = filename.into();
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_alt_text(mut self, alt_text: impl Into<String>) -> Self {
        self.alt_text = alt_text.into();
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_media_url(mut self, media_url: impl Into<String>) -> Self {
        self.media_url = media_url.into();
        self
    }

    /// Text fields in match order: filename, title, alt text, description.
    pub fn text_fields(&self) -> [&str; 4] {
        [
            &self.filename,
            &self.title,
            &self.alt_text,
            &self.description,
        ]
    }
}

/// An asset together with the provider it was attributed to, if any.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct MatchResult {
    #[serde(flatten)]
    pub asset: AssetRecord,

    /// Matching provider name, `null` when no rule matched
    #[serde(default)]
    #[cfg_attr(feature = "openapi", schema(example = "Shutterstock"))]
    pub source: Option<String>,
}

impl MatchResult {
    pub fn new(asset: AssetRecord, source: Option<String>) -> Self {
        Self { asset, source }
    }

    pub fn is_match(&self) -> bool {
        self.source.is_some()
    }

    /// Provider name, or [`UNKNOWN_SOURCE`] for unmatched assets.
    pub fn source_label(&self) -> &str {
        self.source.as_deref().unwrap_or(UNKNOWN_SOURCE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_fields_order() {
        let asset = AssetRecord::new(1)
            .with_filename("a.jpg")
            .with_title("b")
            .with_alt_text("c")
            .with_description("d")
            .with_media_url("https://example.com/a.jpg");

        assert_eq!(asset.text_fields(), ["a.jpg", "b", "c", "d"]);
    }

    #[test]
    fn test_match_result_wire_fields() {
        let result = MatchResult::new(
            AssetRecord::new(7)
                .with_filename("pexels-photo-1.jpg")
                .with_alt_text("beach"),
            Some("Pexels".to_string()),
        );

        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["id"], 7);
        assert_eq!(json["filename"], "pexels-photo-1.jpg");
        assert_eq!(json["alt"], "beach");
        assert_eq!(json["source"], "Pexels");
        assert!(json.get("media_url").is_some());
        assert!(json.get("alt_text").is_none());
    }

    #[test]
    fn test_unmatched_source_label() {
        let result = MatchResult::new(AssetRecord::new(3), None);
        assert!(!result.is_match());
        assert_eq!(result.source_label(), "Unknown");

        let json = serde_json::to_value(&result).unwrap();
        assert!(json["source"].is_null());
    }

    #[test]
    fn test_asset_record_missing_fields_default() {
        let asset: AssetRecord = serde_json::from_str(r#"{"id": 12}"#).unwrap();
        assert_eq!(asset, AssetRecord::new(12));
    }
}
