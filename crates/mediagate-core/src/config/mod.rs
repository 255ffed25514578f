//! Uploads tree and serving configuration shared by the API and CLI.

use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{Error, Result};
use crate::util::normalize_base_url;

/// Default uploads prefix matched by the rewrite rule.
pub const DEFAULT_UPLOADS_PREFIX: &str = "wp-content/uploads";

/// One day, the browser cache lifetime of a served file.
pub const DEFAULT_CACHE_MAX_AGE: Duration = Duration::from_secs(86_400);

/// Where uploads live publicly and on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadsConfig {
    base_url: String,
    base_dir: PathBuf,
}

impl UploadsConfig {
    /// Build a config, trimming trailing slashes from the base URL.
    pub fn new(base_url: impl Into<String>, base_dir: impl Into<PathBuf>) -> Result<Self> {
        let base_url = base_url.into();
        let Some(base_url) = normalize_base_url(&base_url) else {
            return Err(Error::InvalidInput(format!(
                "uploads base URL must start with http:// or https://: {}",
                base_url.trim()
            )));
        };
        let base_dir = base_dir.into();
        if base_dir.as_os_str().is_empty() {
            return Err(Error::InvalidInput(
                "uploads base dir cannot be empty".to_string(),
            ));
        }
        Ok(Self { base_url, base_dir })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Public URL for a requested path (`/2024/05/photo.jpg`).
    pub fn url_for(&self, requested: &str) -> String {
        format!("{}{}", self.base_url, requested)
    }

    /// Filesystem path for a requested path.
    pub fn path_for(&self, requested: &str) -> PathBuf {
        self.base_dir.join(requested.trim_start_matches('/'))
    }

    /// Requested path for a filesystem path under the uploads dir.
    pub fn requested_path_for(&self, path: &Path) -> Option<String> {
        let relative = path.strip_prefix(&self.base_dir).ok()?;
        let mut out = String::new();
        for component in relative.components() {
            out.push('/');
            out.push_str(component.as_os_str().to_str()?);
        }
        (!out.is_empty()).then_some(out)
    }
}

/// Reject requested paths that could escape the uploads dir.
pub fn validate_requested_path(requested: &str) -> Result<()> {
    if !requested.starts_with('/') {
        return Err(Error::InvalidInput(
            "requested path must start with '/'".to_string(),
        ));
    }
    if requested.contains('\0') || requested.contains('\\') {
        return Err(Error::InvalidInput(
            "requested path contains forbidden characters".to_string(),
        ));
    }
    if requested.split('/').any(|segment| segment == "..") {
        return Err(Error::InvalidInput(
            "requested path must not contain parent segments".to_string(),
        ));
    }
    Ok(())
}
