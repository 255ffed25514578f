//! mediagate-core - Core library for mediagate
//!
//! Resolves requests for files under a media uploads tree to asset records,
//! publishes an access event to registered subscribers, and serves approved
//! files with conditional-GET caching. Shared by the HTTP gate and the CLI.

pub mod config;
pub mod db;
pub mod error;
pub mod gate;
pub mod hooks;
pub mod mime;
pub mod models;
pub mod resolver;
pub mod responder;
pub mod rewrite;
pub mod store;
pub mod util;

pub use config::UploadsConfig;
pub use error::{Error, Result};
pub use gate::{GateOutcome, MediaGate};
pub use hooks::{AccessDecision, AccessHooks, AssetAccessHandler};
pub use models::{AssetId, AssetReference, ConditionalRequest, RequestContext};
pub use resolver::{MediaResolver, Resolution};
pub use responder::{FileResponder, FileResponse, ServedFile};
pub use rewrite::RewriteRule;
pub use store::{AssetStore, MemoryAssetStore};
