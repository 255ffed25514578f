use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, SystemTime};

use mediagate_core::db::AssetRepository;
use mediagate_core::{
    AssetId, AssetReference, ConditionalRequest, FileResponder, MediaResolver, AccessHooks,
};
use pretty_assertions::assert_eq;
use tempfile::TempDir;

use clap_complete::Shell;

use crate::cli::ServerKind;
use crate::commands::assets::{run_assets_add, run_assets_remove};
use crate::commands::common::{
    format_asset_lines, format_relative_time, open_store, parse_asset_id, requested_path,
};
use crate::commands::completions::run_completions;
use crate::commands::inspect::render_response;
use crate::commands::resolve::format_reference;
use crate::commands::rewrite_rules::run_rewrite_rules;
use crate::error::CliError;
use crate::settings::Settings;

const BASE: &str = "https://example.com/wp-content/uploads";

fn settings_for(dir: &TempDir) -> Settings {
    Settings::from_lookup(
        Some(dir.path().join("assets.db")),
        Some(BASE.to_string()),
        Some(dir.path().join("uploads")),
        |_| None,
    )
}

#[test]
fn settings_prefer_flags_over_environment() {
    let env: HashMap<&str, &str> = HashMap::from([
        ("MEDIAGATE_DB_PATH", "/var/lib/mediagate.db"),
        ("MEDIAGATE_UPLOADS_URL", "https://env.example.com/uploads"),
        ("MEDIAGATE_UPLOADS_DIR", "/srv/env-uploads"),
        ("MEDIAGATE_UPLOADS_PREFIX", "media"),
    ]);
    let lookup = |key: &str| env.get(key).map(|value| (*value).to_string());

    let from_env = Settings::from_lookup(None, None, None, lookup);
    assert_eq!(from_env.db_path, PathBuf::from("/var/lib/mediagate.db"));
    assert_eq!(
        from_env.uploads_url.as_deref(),
        Some("https://env.example.com/uploads")
    );
    assert_eq!(from_env.uploads_prefix, "media");

    let from_flags = Settings::from_lookup(
        Some(PathBuf::from("local.db")),
        Some(BASE.to_string()),
        Some(PathBuf::from("/srv/uploads")),
        lookup,
    );
    assert_eq!(from_flags.db_path, PathBuf::from("local.db"));
    assert_eq!(from_flags.uploads_url.as_deref(), Some(BASE));
    assert_eq!(from_flags.uploads_dir, Some(PathBuf::from("/srv/uploads")));
}

#[test]
fn settings_defaults_and_missing_uploads() {
    let settings = Settings::from_lookup(None, None, None, |_| None);
    assert_eq!(settings.db_path, PathBuf::from("mediagate.db"));
    assert_eq!(settings.uploads_prefix, "wp-content/uploads");
    assert!(matches!(settings.uploads(), Err(CliError::Config(_))));
}

#[test]
fn requested_path_accepts_both_forms() {
    let dir = tempfile::tempdir().unwrap();
    let uploads = settings_for(&dir).uploads().unwrap();

    let on_disk = dir.path().join("uploads").join("2024").join("05").join("a.jpg");
    assert_eq!(
        requested_path(on_disk.to_str().unwrap(), &uploads).unwrap(),
        "/2024/05/a.jpg"
    );
    assert_eq!(
        requested_path("2024/05/a.jpg", &uploads).unwrap(),
        "/2024/05/a.jpg"
    );
    assert_eq!(
        requested_path(" /2024/05/a.jpg ", &uploads).unwrap(),
        "/2024/05/a.jpg"
    );
    assert!(requested_path("/../secret.jpg", &uploads).is_err());
}

#[test]
fn parse_asset_id_requires_positive_integer() {
    assert_eq!(parse_asset_id(" 12 ").unwrap(), AssetId::new(12));
    assert!(matches!(parse_asset_id("0"), Err(CliError::InvalidAssetId(_))));
    assert!(matches!(parse_asset_id("abc"), Err(CliError::InvalidAssetId(_))));
}

#[test]
fn format_relative_time_units() {
    let now = 10_000_000_000;
    assert_eq!(format_relative_time(now - 30_000, now), "just now");
    assert_eq!(format_relative_time(now - 120_000, now), "2m ago");
    assert_eq!(format_relative_time(now - 2 * 60 * 60_000, now), "2h ago");
    assert_eq!(format_relative_time(now - 3 * 24 * 60 * 60_000, now), "3d ago");
}

#[test]
fn added_asset_resolves_with_variants() {
    let dir = tempfile::tempdir().unwrap();
    let settings = settings_for(&dir);

    run_assets_add("/2024/05/photo.jpg", None, &settings).unwrap();

    let store = open_store(&settings.db_path).unwrap();
    let assets = store.with_repository(|repo| repo.list(10, 0)).unwrap();
    assert_eq!(assets.len(), 1);
    assert_eq!(assets[0].url, format!("{BASE}/2024/05/photo.jpg"));
    assert_eq!(assets[0].mime_type.as_deref(), Some("image/jpeg"));
    assert!(format_asset_lines(&assets)[0].contains("[image/jpeg]"));

    let resolver = MediaResolver::new(settings.uploads().unwrap(), Arc::new(store), AccessHooks::new());
    let variant = resolver.lookup("/2024/05/photo-300x200.jpg").unwrap();
    assert_eq!(variant.id, Some(assets[0].id));
    assert!(variant.is_variant);
}

#[test]
fn add_rejects_unservable_extension_without_override() {
    let dir = tempfile::tempdir().unwrap();
    let settings = settings_for(&dir);

    assert!(matches!(
        run_assets_add("/2024/05/notes.php", None, &settings),
        Err(CliError::Core(mediagate_core::Error::UnsupportedMediaType(_)))
    ));
    run_assets_add("/2024/05/notes.bin", Some("application/octet-stream"), &settings).unwrap();
}

#[test]
fn remove_unknown_asset_fails() {
    let dir = tempfile::tempdir().unwrap();
    let settings = settings_for(&dir);
    assert!(matches!(
        run_assets_remove("42", &settings.db_path),
        Err(CliError::Core(mediagate_core::Error::NotFound(_)))
    ));
}

#[test]
fn reference_lines_mark_unregistered_assets() {
    let reference = AssetReference {
        id: None,
        url: format!("{BASE}/a.jpg"),
        path: PathBuf::from("/srv/uploads/a.jpg"),
        is_variant: false,
    };
    let lines = format_reference(&reference);
    assert_eq!(lines[0], "id:      (unregistered)");
    assert_eq!(lines[3], "variant: no");
}

#[test]
fn inspect_renders_status_and_headers() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("report.pdf");
    std::fs::write(&path, b"%PDF-1.7").unwrap();
    std::fs::File::options()
        .write(true)
        .open(&path)
        .unwrap()
        .set_modified(SystemTime::UNIX_EPOCH + Duration::from_secs(1_715_000_000))
        .unwrap();

    let responder = FileResponder::new(Duration::from_secs(60));
    let full = responder.serve(&path, &ConditionalRequest::default()).unwrap();
    let lines = render_response(&full);
    assert_eq!(lines[0], "HTTP/1.1 200 OK");
    assert_eq!(lines[1], "Cache-Control: max-age=60");
    assert_eq!(lines[2], "Content-Type: application/pdf");
    assert_eq!(lines[4], "Last-Modified: Mon, 06 May 2024 12:53:20 GMT");
    assert_eq!(lines[6], "Content-Disposition: filename=report.pdf");

    let cached = responder
        .serve(
            &path,
            &ConditionalRequest::new(None, Some("Mon, 06 May 2024 12:53:20 GMT".to_string())),
        )
        .unwrap();
    assert_eq!(render_response(&cached), vec!["HTTP/1.1 304 Not Modified"]);
}

#[test]
fn rewrite_rules_validate_prefix() {
    let dir = tempfile::tempdir().unwrap();
    let settings = settings_for(&dir);
    assert!(run_rewrite_rules(ServerKind::Apache, None, &settings).is_ok());
    assert!(run_rewrite_rules(ServerKind::Nginx, Some("media"), &settings).is_ok());
    assert!(run_rewrite_rules(ServerKind::Nginx, Some("/"), &settings).is_err());
}

#[test]
fn completions_write_to_output_file() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("completions").join("mediagate.bash");
    run_completions(Shell::Bash, Some(&output)).unwrap();
    let script = std::fs::read_to_string(&output).unwrap();
    assert!(script.contains("_mediagate()"));
    assert!(script.contains("rewrite-rules"));

    let fish = dir.path().join("mediagate.fish");
    run_completions(Shell::Fish, Some(&fish)).unwrap();
    assert!(std::fs::read_to_string(&fish).unwrap().contains("complete -c mediagate"));
}
