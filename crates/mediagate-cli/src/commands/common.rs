use std::path::Path;

use chrono::Utc;
use mediagate_core::config::validate_requested_path;
use mediagate_core::db::SqliteAssetStore;
use mediagate_core::models::Asset;
use mediagate_core::{AssetId, UploadsConfig};
use serde::Serialize;

use crate::error::CliError;

#[derive(Debug, Serialize)]
pub struct AssetListItem {
    pub id: i64,
    pub url: String,
    pub mime_type: Option<String>,
    pub created_at: i64,
    pub relative_time: String,
}

pub fn open_store(db_path: &Path) -> Result<SqliteAssetStore, CliError> {
    Ok(SqliteAssetStore::open(db_path)?)
}

/// Accept either a requested path (`/2024/05/a.jpg`) or a file under the uploads dir.
pub fn requested_path(input: &str, uploads: &UploadsConfig) -> Result<String, CliError> {
    let input = input.trim();
    let requested = uploads
        .requested_path_for(Path::new(input))
        .unwrap_or_else(|| {
            if input.starts_with('/') {
                input.to_string()
            } else {
                format!("/{input}")
            }
        });
    validate_requested_path(&requested)?;
    Ok(requested)
}

pub fn parse_asset_id(raw: &str) -> Result<AssetId, CliError> {
    match raw.parse::<AssetId>() {
        Ok(id) if id.get() > 0 => Ok(id),
        _ => Err(CliError::InvalidAssetId(raw.trim().to_string())),
    }
}

pub fn asset_to_list_item(asset: &Asset, now_ms: i64) -> AssetListItem {
    AssetListItem {
        id: asset.id.get(),
        url: asset.url.clone(),
        mime_type: asset.mime_type.clone(),
        created_at: asset.created_at,
        relative_time: format_relative_time(asset.created_at, now_ms),
    }
}

pub fn format_asset_lines(assets: &[Asset]) -> Vec<String> {
    let now_ms = Utc::now().timestamp_millis();
    assets
        .iter()
        .map(|asset| {
            format!(
                "{:>6}  {}  [{}]  {}",
                asset.id.get(),
                asset.url,
                asset.mime_type.as_deref().unwrap_or("-"),
                format_relative_time(asset.created_at, now_ms)
            )
        })
        .collect()
}

pub fn format_relative_time(timestamp_ms: i64, now_ms: i64) -> String {
    let diff = now_ms.saturating_sub(timestamp_ms);
    let minute = 60_000;
    let hour = 60 * minute;
    let day = 24 * hour;
    let week = 7 * day;
    let month = 30 * day;
    let year = 365 * day;

    if diff < minute {
        "just now".to_string()
    } else if diff < hour {
        format!("{}m ago", diff / minute)
    } else if diff < day {
        format!("{}h ago", diff / hour)
    } else if diff < week {
        format!("{}d ago", diff / day)
    } else if diff < month {
        format!("{}w ago", diff / week)
    } else if diff < year {
        format!("{}mo ago", diff / month)
    } else {
        format!("{}y ago", diff / year)
    }
}
