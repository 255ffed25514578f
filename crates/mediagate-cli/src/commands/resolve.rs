use std::sync::Arc;

use mediagate_core::{AccessHooks, AssetReference, MediaResolver};

use crate::commands::common::{open_store, requested_path};
use crate::error::CliError;
use crate::settings::Settings;

pub fn run_resolve(path: &str, as_json: bool, settings: &Settings) -> Result<(), CliError> {
    let uploads = settings.uploads()?;
    let requested = requested_path(path, &uploads)?;
    let store = open_store(&settings.db_path)?;

    let resolver = MediaResolver::new(uploads, Arc::new(store), AccessHooks::new());
    let asset = resolver.lookup(&requested)?;

    if as_json {
        println!("{}", serde_json::to_string_pretty(&asset)?);
    } else {
        for line in format_reference(&asset) {
            println!("{line}");
        }
    }
    Ok(())
}

pub fn format_reference(asset: &AssetReference) -> Vec<String> {
    vec![
        format!(
            "id:      {}",
            asset
                .id
                .map_or_else(|| "(unregistered)".to_string(), |id| id.to_string())
        ),
        format!("url:     {}", asset.url),
        format!("path:    {}", asset.path.display()),
        format!("variant: {}", if asset.is_variant { "yes" } else { "no" }),
    ]
}
