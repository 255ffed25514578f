//! Rewrite rule that routes uploads-tree requests through the gate.

use regex::Regex;

use crate::config::DEFAULT_UPLOADS_PREFIX;
use crate::error::{Error, Result};
use crate::models::MEDIA_FILE_PARAM;

/// `^<prefix>(/.*\.\w+)$` for a given uploads prefix.
#[derive(Debug, Clone)]
pub struct RewriteRule {
    prefix: String,
    pattern: Regex,
}

impl Default for RewriteRule {
    fn default() -> Self {
        Self::new(DEFAULT_UPLOADS_PREFIX).expect("default uploads prefix is valid")
    }
}

impl RewriteRule {
    /// Build a rule for `prefix`; leading and trailing slashes are ignored.
    pub fn new(prefix: &str) -> Result<Self> {
        let prefix = prefix.trim().trim_matches('/').to_string();
        if prefix.is_empty() {
            return Err(Error::InvalidInput(
                "uploads prefix cannot be empty".to_string(),
            ));
        }
        let pattern = Regex::new(&format!(r"^{}(/.*\.\w+)$", regex::escape(&prefix)))
            .map_err(|error| Error::InvalidInput(format!("invalid uploads prefix: {error}")))?;
        Ok(Self { prefix, pattern })
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Rewrite a request path (leading `/` optional) to the gated media path.
    pub fn apply(&self, request_path: &str) -> Option<String> {
        let request_path = request_path.strip_prefix('/').unwrap_or(request_path);
        self.pattern
            .captures(request_path)
            .and_then(|captures| captures.get(1))
            .map(|matched| matched.as_str().to_string())
    }

    /// Apache `mod_rewrite` directive.
    pub fn apache(&self) -> String {
        format!(
            "RewriteRule ^{}(/.*\\.\\w+)$ index.php?{MEDIA_FILE_PARAM}=$1 [QSA,L]",
            self.prefix
        )
    }

    /// nginx `rewrite` directive.
    pub fn nginx(&self) -> String {
        format!(
            "rewrite ^/{}(/.*\\.\\w+)$ /index.php?{MEDIA_FILE_PARAM}=$1 last;",
            self.prefix
        )
    }
}
