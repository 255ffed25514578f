//! Asset store lookup contract.
//!
//! The resolver only needs to map a public URL to a record id. Anything that
//! can answer that question (the bundled SQLite store, a host CMS database,
//! an in-memory table) plugs in through [`AssetStore`].

use std::collections::HashMap;
use std::sync::RwLock;

use crate::error::{Error, Result};
use crate::models::AssetId;

/// Query-by-exact-URL capability of the system of record.
pub trait AssetStore: Send + Sync {
    /// Return the id of the active record whose canonical URL equals `url`.
    fn find_id_by_url(&self, url: &str) -> Result<Option<AssetId>>;
}

impl<S: AssetStore + ?Sized> AssetStore for std::sync::Arc<S> {
    fn find_id_by_url(&self, url: &str) -> Result<Option<AssetId>> {
        (**self).find_id_by_url(url)
    }
}

/// In-memory store keyed by canonical URL.
#[derive(Debug, Default)]
pub struct MemoryAssetStore {
    records: RwLock<HashMap<String, AssetId>>,
}

impl MemoryAssetStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `url` under `id`, replacing any previous mapping.
    pub fn insert(&self, url: impl Into<String>, id: AssetId) -> Result<()> {
        self.records
            .write()
            .map_err(|_| Error::Database("asset table lock poisoned".to_string()))?
            .insert(url.into(), id);
        Ok(())
    }

    /// Builder-style variant of [`Self::insert`] for fixtures.
    #[must_use]
    pub fn with(self, url: impl Into<String>, id: AssetId) -> Self {
        if let Ok(mut records) = self.records.write() {
            records.insert(url.into(), id);
        }
        self
    }
}

impl AssetStore for MemoryAssetStore {
    fn find_id_by_url(&self, url: &str) -> Result<Option<AssetId>> {
        let records = self
            .records
            .read()
            .map_err(|_| Error::Database("asset table lock poisoned".to_string()))?;
        Ok(records.get(url).copied())
    }
}
