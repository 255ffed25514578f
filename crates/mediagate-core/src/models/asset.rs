//! Asset model

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use crate::error::{Error, Result};

/// Identifier of an asset record in the asset store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AssetId(i64);

impl AssetId {
    /// Wrap a raw store identifier.
    #[must_use]
    pub const fn new(raw: i64) -> Self {
        Self(raw)
    }

    /// Raw integer value as stored.
    #[must_use]
    pub const fn get(self) -> i64 {
        self.0
    }
}

impl fmt::Display for AssetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for AssetId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(Self(s.trim().parse()?))
    }
}

/// A media record registered in the asset store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Asset {
    /// Store identifier.
    pub id: AssetId,
    /// Canonical public URL, the exact-match lookup key.
    pub url: String,
    /// Content MIME type recorded at registration, if known.
    pub mime_type: Option<String>,
    /// Creation timestamp (Unix ms).
    pub created_at: i64,
    /// Soft delete flag.
    pub is_deleted: bool,
}

/// Input for registering a new asset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAsset {
    pub url: String,
    pub mime_type: Option<String>,
}

impl NewAsset {
    /// Validate and normalize registration input.
    pub fn new(url: impl Into<String>, mime_type: Option<String>) -> Result<Self> {
        let url = url.into().trim().to_string();
        if url.is_empty() {
            return Err(Error::InvalidInput("Asset url cannot be empty".to_string()));
        }
        if !crate::util::is_http_url(&url) {
            return Err(Error::InvalidInput(format!(
                "Asset url must start with http:// or https://: {url}"
            )));
        }
        Ok(Self {
            url,
            mime_type: crate::util::normalize_text_option(mime_type),
        })
    }
}

/// Outcome of resolving a requested upload path.
///
/// `id` is `None` when neither the exact URL nor its de-variant-ized form is
/// registered. Consumers decide what an unresolved reference means.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AssetReference {
    pub id: Option<AssetId>,
    pub url: String,
    pub path: PathBuf,
    pub is_variant: bool,
}

impl AssetReference {
    /// Whether the reference matched a store record.
    pub const fn is_resolved(&self) -> bool {
        self.id.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn asset_id_parse_and_display() {
        let id: AssetId = " 42 ".parse().unwrap();
        assert_eq!(id, AssetId::new(42));
        assert_eq!(id.to_string(), "42");
        assert!("abc".parse::<AssetId>().is_err());
    }

    #[test]
    fn new_asset_validation() {
        assert!(NewAsset::new("", None).is_err());
        assert!(NewAsset::new("/2024/05/photo.jpg", None).is_err());

        let asset = NewAsset::new(
            " https://example.com/uploads/photo.jpg ",
            Some("  ".to_string()),
        )
        .unwrap();
        assert_eq!(asset.url, "https://example.com/uploads/photo.jpg");
        assert_eq!(asset.mime_type, None);
    }

    #[test]
    fn reference_serializes_missing_id_as_null() {
        let reference = AssetReference {
            id: None,
            url: "https://example.com/uploads/a.jpg".to_string(),
            path: PathBuf::from("/srv/uploads/a.jpg"),
            is_variant: false,
        };
        let json = serde_json::to_value(&reference).unwrap();
        assert!(json["id"].is_null());
        assert!(!reference.is_resolved());
    }
}
