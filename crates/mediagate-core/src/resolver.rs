//! Request resolver.
//!
//! Maps a requested upload path to an asset record and publishes the access
//! event. Resized variants (`photo-300x200.jpg`) resolve to their original.

use std::borrow::Cow;
use std::sync::{Arc, OnceLock};

use regex::Regex;

use crate::config::{validate_requested_path, UploadsConfig};
use crate::error::Result;
use crate::hooks::{AccessDecision, AccessHooks};
use crate::models::{AssetReference, CacheBypass, RequestContext};
use crate::store::AssetStore;

fn size_suffix_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"-\d+x\d+").expect("size suffix pattern is valid"))
}

/// Remove every `-<width>x<height>` marker from `url`.
pub fn strip_size_suffix(url: &str) -> Cow<'_, str> {
    size_suffix_pattern().replace_all(url, "")
}

/// A resolved request together with the subscribers' verdict.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub asset: AssetReference,
    pub decision: AccessDecision,
}

pub struct MediaResolver {
    uploads: UploadsConfig,
    store: Arc<dyn AssetStore>,
    hooks: AccessHooks,
}

impl std::fmt::Debug for MediaResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MediaResolver")
            .field("uploads", &self.uploads)
            .field("hooks", &self.hooks)
            .finish_non_exhaustive()
    }
}

impl MediaResolver {
    pub fn new(uploads: UploadsConfig, store: Arc<dyn AssetStore>, hooks: AccessHooks) -> Self {
        Self {
            uploads,
            store,
            hooks,
        }
    }

    pub const fn uploads(&self) -> &UploadsConfig {
        &self.uploads
    }

    pub const fn hooks(&self) -> &AccessHooks {
        &self.hooks
    }

    /// Look up `requested` without publishing the access event.
    ///
    /// Tries the exact URL first, then the URL with size markers removed.
    pub fn lookup(&self, requested: &str) -> Result<AssetReference> {
        validate_requested_path(requested)?;

        let url = self.uploads.url_for(requested);
        let path = self.uploads.path_for(requested);

        let mut id = self.store.find_id_by_url(&url)?;
        let mut is_variant = false;
        if id.is_none() {
            let original = strip_size_suffix(&url);
            if original != url {
                id = self.store.find_id_by_url(&original)?;
                is_variant = id.is_some();
            }
        }

        Ok(AssetReference {
            id,
            url,
            path,
            is_variant,
        })
    }

    /// Resolve `requested` and publish the access event exactly once.
    pub fn resolve(&self, requested: &str) -> Result<Resolution> {
        let asset = self.lookup(requested)?;
        let decision = self.hooks.dispatch(&asset);
        tracing::debug!(
            url = %asset.url,
            id = ?asset.id,
            variant = asset.is_variant,
            decision = decision.label(),
            "Resolved media request"
        );
        Ok(Resolution { asset, decision })
    }

    /// Entry point for a transport request.
    ///
    /// Returns `None` when the request does not carry a media path. Otherwise
    /// marks the context as uncacheable, even when the path is then rejected.
    pub fn handle(&self, context: &mut RequestContext) -> Result<Option<Resolution>> {
        let Some(requested) = context.media_file.clone() else {
            return Ok(None);
        };
        context.cache_bypass = CacheBypass::all();
        self.resolve(&requested).map(Some)
    }
}
