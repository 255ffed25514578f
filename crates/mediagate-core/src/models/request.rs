//! Per-request inputs handed to the resolver and responder.

use serde::Serialize;

use crate::util::normalize_text_option;

/// Query parameter the rewrite layer uses to carry the original upload path.
pub const MEDIA_FILE_PARAM: &str = "protected_media_file";

/// Client-supplied cache validators.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConditionalRequest {
    /// Raw `If-None-Match` value.
    pub if_none_match: Option<String>,
    /// Raw `If-Modified-Since` value; parsed lazily by the responder.
    pub if_modified_since: Option<String>,
}

impl ConditionalRequest {
    /// Build validators from raw header values, dropping blank ones.
    pub fn new(if_none_match: Option<String>, if_modified_since: Option<String>) -> Self {
        Self {
            if_none_match: normalize_text_option(if_none_match),
            if_modified_since: normalize_text_option(if_modified_since),
        }
    }

    pub const fn is_empty(&self) -> bool {
        self.if_none_match.is_none() && self.if_modified_since.is_none()
    }
}

/// Downstream caching layers that must not store a gated response.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CacheBypass {
    pub page: bool,
    pub object: bool,
    pub minify: bool,
}

impl CacheBypass {
    /// Every layer bypassed.
    pub const fn all() -> Self {
        Self {
            page: true,
            object: true,
            minify: true,
        }
    }

    pub const fn any(self) -> bool {
        self.page || self.object || self.minify
    }
}

/// Request data the gate needs, extracted by the transport layer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestContext {
    /// Value of [`MEDIA_FILE_PARAM`], if the request was rewritten.
    pub media_file: Option<String>,
    pub conditional: ConditionalRequest,
    /// Set by the resolver once the request is known to be gated.
    pub cache_bypass: CacheBypass,
}

impl RequestContext {
    pub fn new(media_file: Option<String>, conditional: ConditionalRequest) -> Self {
        Self {
            media_file: normalize_text_option(media_file),
            conditional,
            cache_bypass: CacheBypass::default(),
        }
    }
}
