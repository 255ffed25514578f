//! Data models for mediagate

mod asset;
mod request;

pub use asset::{Asset, AssetId, AssetReference, NewAsset};
pub use request::{CacheBypass, ConditionalRequest, RequestContext, MEDIA_FILE_PARAM};
