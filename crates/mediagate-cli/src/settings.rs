use std::env;
use std::path::PathBuf;

use mediagate_core::config::DEFAULT_UPLOADS_PREFIX;
use mediagate_core::util::non_empty_trimmed;
use mediagate_core::{RewriteRule, UploadsConfig};

use crate::error::CliError;

pub const DEFAULT_DB_PATH: &str = "mediagate.db";

/// Command-line flags layered over `MEDIAGATE_*` environment variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub db_path: PathBuf,
    pub uploads_url: Option<String>,
    pub uploads_dir: Option<PathBuf>,
    pub uploads_prefix: String,
}

impl Settings {
    pub fn from_env(
        db_path: Option<PathBuf>,
        uploads_url: Option<String>,
        uploads_dir: Option<PathBuf>,
    ) -> Self {
        Self::from_lookup(db_path, uploads_url, uploads_dir, |name| env::var(name).ok())
    }

    pub fn from_lookup(
        db_path: Option<PathBuf>,
        uploads_url: Option<String>,
        uploads_dir: Option<PathBuf>,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Self {
        let db_path = db_path
            .or_else(|| optional_trimmed(&lookup, "MEDIAGATE_DB_PATH").map(PathBuf::from))
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DB_PATH));
        let uploads_url = uploads_url.or_else(|| optional_trimmed(&lookup, "MEDIAGATE_UPLOADS_URL"));
        let uploads_dir = uploads_dir
            .or_else(|| optional_trimmed(&lookup, "MEDIAGATE_UPLOADS_DIR").map(PathBuf::from));
        let uploads_prefix = optional_trimmed(&lookup, "MEDIAGATE_UPLOADS_PREFIX")
            .unwrap_or_else(|| DEFAULT_UPLOADS_PREFIX.to_string());

        Self {
            db_path,
            uploads_url,
            uploads_dir,
            uploads_prefix,
        }
    }

    pub fn uploads(&self) -> Result<UploadsConfig, CliError> {
        let url = self.uploads_url.clone().ok_or_else(|| {
            CliError::Config("set MEDIAGATE_UPLOADS_URL or pass --uploads-url".to_string())
        })?;
        let dir = self.uploads_dir.clone().ok_or_else(|| {
            CliError::Config("set MEDIAGATE_UPLOADS_DIR or pass --uploads-dir".to_string())
        })?;
        Ok(UploadsConfig::new(url, dir)?)
    }

    pub fn rewrite_rule(&self, prefix: Option<&str>) -> Result<RewriteRule, CliError> {
        Ok(RewriteRule::new(prefix.unwrap_or(&self.uploads_prefix))?)
    }
}

fn optional_trimmed(lookup: impl Fn(&str) -> Option<String>, name: &str) -> Option<String> {
    lookup(name).as_deref().and_then(non_empty_trimmed)
}
