use std::fmt;
use std::str::FromStr;

use mediagate_core::{AccessDecision, AssetAccessHandler, AssetReference};

/// Fallback subscriber registered after any embedder-supplied hooks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AccessPolicy {
    /// Serve files that resolve to an asset record; hide everything else.
    #[default]
    Registered,
    /// Serve any file present under the uploads dir.
    Open,
    Deny,
}

impl AccessPolicy {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Registered => "registered",
            Self::Open => "open",
            Self::Deny => "deny",
        }
    }
}

impl fmt::Display for AccessPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AccessPolicy {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "registered" => Ok(Self::Registered),
            "open" => Ok(Self::Open),
            "deny" => Ok(Self::Deny),
            other => Err(format!(
                "MEDIAGATE_ACCESS_POLICY must be one of registered, open, deny (got {other:?})"
            )),
        }
    }
}

impl AssetAccessHandler for AccessPolicy {
    fn on_asset_access(&self, asset: &AssetReference) -> AccessDecision {
        match self {
            Self::Registered if asset.is_resolved() => AccessDecision::Serve,
            Self::Registered => AccessDecision::NotFound,
            Self::Open => AccessDecision::Serve,
            Self::Deny => AccessDecision::Deny,
        }
    }
}
