use std::path::Path;

use chrono::Utc;
use mediagate_core::db::AssetRepository;
use mediagate_core::mime::mime_for_path;
use mediagate_core::models::NewAsset;

use crate::commands::common::{
    asset_to_list_item, format_asset_lines, open_store, parse_asset_id, requested_path,
    AssetListItem,
};
use crate::error::CliError;
use crate::settings::Settings;

pub fn run_assets_add(path: &str, mime: Option<&str>, settings: &Settings) -> Result<(), CliError> {
    let uploads = settings.uploads()?;
    let requested = requested_path(path, &uploads)?;
    let mime_type = match mime.map(str::trim).filter(|value| !value.is_empty()) {
        Some(mime) => mime.to_string(),
        None => mime_for_path(Path::new(&requested))?.to_string(),
    };

    let store = open_store(&settings.db_path)?;
    let asset = store.with_repository(|repo| {
        repo.register(&NewAsset::new(uploads.url_for(&requested), Some(mime_type))?)
    })?;
    tracing::debug!(id = %asset.id, requested = %requested, "Registered asset");

    println!("{}", asset.id);
    Ok(())
}

pub fn run_assets_list(limit: usize, as_json: bool, db_path: &Path) -> Result<(), CliError> {
    let store = open_store(db_path)?;
    let assets = store.with_repository(|repo| repo.list(limit, 0))?;

    if as_json {
        let now_ms = Utc::now().timestamp_millis();
        let items = assets
            .iter()
            .map(|asset| asset_to_list_item(asset, now_ms))
            .collect::<Vec<AssetListItem>>();
        println!("{}", serde_json::to_string_pretty(&items)?);
    } else {
        for line in format_asset_lines(&assets) {
            println!("{line}");
        }
    }

    Ok(())
}

pub fn run_assets_remove(id: &str, db_path: &Path) -> Result<(), CliError> {
    let id = parse_asset_id(id)?;
    let store = open_store(db_path)?;
    store.with_repository(|repo| repo.delete(id))?;
    tracing::debug!(id = %id, "Removed asset");
    println!("Removed asset {id}");
    Ok(())
}
