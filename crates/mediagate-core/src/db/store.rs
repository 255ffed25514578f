//! Shared `SQLite`-backed asset store

use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use rusqlite::Connection;

use crate::error::{Error, Result};
use crate::models::AssetId;
use crate::store::AssetStore;

use super::{AssetRepository, Database, SqliteAssetRepository};

/// Thread-safe owner of the asset database connection.
///
/// Request handlers share one instance; each call borrows the connection for
/// the duration of a single query.
pub struct SqliteAssetStore {
    conn: Mutex<Connection>,
}

impl SqliteAssetStore {
    /// Open (and migrate) the store at `path`.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Ok(Self::from_database(Database::open(path)?))
    }

    /// Open an in-memory store (primarily for tests).
    pub fn open_in_memory() -> Result<Self> {
        Ok(Self::from_database(Database::open_in_memory()?))
    }

    pub fn from_database(database: Database) -> Self {
        Self {
            conn: Mutex::new(database.into_connection()),
        }
    }

    /// Run `f` with a repository bound to the locked connection.
    pub fn with_repository<T>(
        &self,
        f: impl FnOnce(&SqliteAssetRepository<'_>) -> Result<T>,
    ) -> Result<T> {
        let guard = self.lock()?;
        f(&SqliteAssetRepository::new(&guard))
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| Error::Database("asset database lock poisoned".to_string()))
    }
}

impl AssetStore for SqliteAssetStore {
    fn find_id_by_url(&self, url: &str) -> Result<Option<AssetId>> {
        self.with_repository(|repo| Ok(repo.find_by_url(url)?.map(|asset| asset.id)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NewAsset;

    #[test]
    fn store_finds_registered_asset() {
        let store = SqliteAssetStore::open_in_memory().unwrap();
        let asset = store
            .with_repository(|repo| {
                repo.register(&NewAsset::new("https://example.com/uploads/a.png", None)?)
            })
            .unwrap();

        assert_eq!(
            store
                .find_id_by_url("https://example.com/uploads/a.png")
                .unwrap(),
            Some(asset.id)
        );
        assert_eq!(
            store
                .find_id_by_url("https://example.com/uploads/b.png")
                .unwrap(),
            None
        );
    }
}
