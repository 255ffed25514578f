use std::collections::HashMap;
use std::env;
use std::path::PathBuf;
use std::time::Duration;

use mediagate_core::config::DEFAULT_UPLOADS_PREFIX;
use mediagate_core::util::non_empty_trimmed;
use mediagate_core::{RewriteRule, UploadsConfig};
use thiserror::Error;

use crate::policy::AccessPolicy;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingVar(&'static str),
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind_addr: String,
    pub uploads: UploadsConfig,
    pub uploads_prefix: String,
    pub db_path: PathBuf,
    pub access_policy: AccessPolicy,
    pub cache_max_age: Duration,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let values: HashMap<String, String> = env::vars().collect();
        Self::from_lookup(|name| values.get(name).cloned())
    }

    pub(crate) fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let bind_addr = value_or_default(&lookup, "MEDIAGATE_BIND_ADDR", "127.0.0.1:8080");

        let uploads_url = required_trimmed(&lookup, "MEDIAGATE_UPLOADS_URL")?;
        let uploads_dir = PathBuf::from(required_trimmed(&lookup, "MEDIAGATE_UPLOADS_DIR")?);
        let uploads = UploadsConfig::new(uploads_url, uploads_dir).map_err(|_| {
            ConfigError::Invalid(
                "MEDIAGATE_UPLOADS_URL must start with http:// or https://".to_string(),
            )
        })?;

        let uploads_prefix =
            value_or_default(&lookup, "MEDIAGATE_UPLOADS_PREFIX", DEFAULT_UPLOADS_PREFIX);
        let uploads_prefix = RewriteRule::new(&uploads_prefix)
            .map_err(|_| {
                ConfigError::Invalid("MEDIAGATE_UPLOADS_PREFIX cannot be empty".to_string())
            })?
            .prefix()
            .to_string();

        let db_path = PathBuf::from(value_or_default(&lookup, "MEDIAGATE_DB_PATH", "mediagate.db"));

        let access_policy = value_or_default(&lookup, "MEDIAGATE_ACCESS_POLICY", "registered")
            .parse::<AccessPolicy>()
            .map_err(ConfigError::Invalid)?;

        let cache_max_age_secs = value_or_default(&lookup, "MEDIAGATE_CACHE_MAX_AGE_SECS", "86400")
            .parse::<u64>()
            .map_err(|_| {
                ConfigError::Invalid(
                    "MEDIAGATE_CACHE_MAX_AGE_SECS must be an integer in [0, 31536000]".to_string(),
                )
            })?;
        if cache_max_age_secs > 31_536_000 {
            return Err(ConfigError::Invalid(
                "MEDIAGATE_CACHE_MAX_AGE_SECS must be in [0, 31536000]".to_string(),
            ));
        }

        Ok(Self {
            bind_addr,
            uploads,
            uploads_prefix,
            db_path,
            access_policy,
            cache_max_age: Duration::from_secs(cache_max_age_secs),
        })
    }
}

fn value_or_default(lookup: impl Fn(&str) -> Option<String>, name: &str, default: &str) -> String {
    optional_trimmed(lookup, name).unwrap_or_else(|| default.to_string())
}

fn required_trimmed(
    lookup: impl Fn(&str) -> Option<String>,
    name: &'static str,
) -> Result<String, ConfigError> {
    optional_trimmed(lookup, name).ok_or(ConfigError::MissingVar(name))
}

fn optional_trimmed(lookup: impl Fn(&str) -> Option<String>, name: &str) -> Option<String> {
    lookup(name).as_deref().and_then(non_empty_trimmed)
}
