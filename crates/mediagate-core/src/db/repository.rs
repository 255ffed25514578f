//! Asset repository implementation

#![allow(clippy::cast_possible_wrap)] // SQLite uses i64 for LIMIT/OFFSET

use crate::error::{Error, Result};
use crate::models::{Asset, AssetId, NewAsset};
use rusqlite::{params, Connection, OptionalExtension};

/// Trait for asset storage operations
pub trait AssetRepository {
    /// Register a new asset
    fn register(&self, asset: &NewAsset) -> Result<Asset>;

    /// Get an active asset by ID
    fn get(&self, id: AssetId) -> Result<Option<Asset>>;

    /// Find the active asset whose canonical URL equals `url` exactly
    fn find_by_url(&self, url: &str) -> Result<Option<Asset>>;

    /// List active assets, newest first
    fn list(&self, limit: usize, offset: usize) -> Result<Vec<Asset>>;

    /// Soft delete an asset
    fn delete(&self, id: AssetId) -> Result<()>;
}

/// `SQLite` implementation of `AssetRepository`
pub struct SqliteAssetRepository<'a> {
    conn: &'a Connection,
}

impl<'a> SqliteAssetRepository<'a> {
    /// Create a new repository with the given connection
    pub const fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    /// Parse an asset from a database row
    fn parse_asset(row: &rusqlite::Row<'_>) -> rusqlite::Result<Asset> {
        Ok(Asset {
            id: AssetId::new(row.get(0)?),
            url: row.get(1)?,
            mime_type: row.get(2)?,
            created_at: row.get(3)?,
            is_deleted: row.get::<_, i32>(4)? != 0,
        })
    }
}

impl AssetRepository for SqliteAssetRepository<'_> {
    fn register(&self, asset: &NewAsset) -> Result<Asset> {
        let created_at = crate::util::unix_timestamp_millis_now();

        self.conn.execute(
            "INSERT INTO assets (url, mime_type, created_at, is_deleted) VALUES (?, ?, ?, 0)",
            params![asset.url, asset.mime_type, created_at],
        )?;

        let id = AssetId::new(self.conn.last_insert_rowid());
        tracing::debug!(asset_id = %id, "Registered asset");

        Ok(Asset {
            id,
            url: asset.url.clone(),
            mime_type: asset.mime_type.clone(),
            created_at,
            is_deleted: false,
        })
    }

    fn get(&self, id: AssetId) -> Result<Option<Asset>> {
        let asset = self
            .conn
            .query_row(
                "SELECT id, url, mime_type, created_at, is_deleted
                 FROM assets WHERE id = ? AND is_deleted = 0",
                params![id.get()],
                Self::parse_asset,
            )
            .optional()?;

        Ok(asset)
    }

    fn find_by_url(&self, url: &str) -> Result<Option<Asset>> {
        // Several active rows may share a URL; the oldest record wins.
        let asset = self
            .conn
            .query_row(
                "SELECT id, url, mime_type, created_at, is_deleted
                 FROM assets
                 WHERE url = ? AND is_deleted = 0
                 ORDER BY id ASC
                 LIMIT 1",
                params![url],
                Self::parse_asset,
            )
            .optional()?;

        Ok(asset)
    }

    fn list(&self, limit: usize, offset: usize) -> Result<Vec<Asset>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, url, mime_type, created_at, is_deleted
             FROM assets
             WHERE is_deleted = 0
             ORDER BY created_at DESC, id DESC
             LIMIT ? OFFSET ?",
        )?;

        let assets = stmt
            .query_map(params![limit as i64, offset as i64], Self::parse_asset)?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(assets)
    }

    fn delete(&self, id: AssetId) -> Result<()> {
        let rows = self.conn.execute(
            "UPDATE assets SET is_deleted = 1 WHERE id = ? AND is_deleted = 0",
            params![id.get()],
        )?;

        if rows == 0 {
            return Err(Error::NotFound(format!("asset {id}")));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Database;

    fn setup() -> Database {
        Database::open_in_memory().unwrap()
    }

    fn new_asset(url: &str) -> NewAsset {
        NewAsset::new(url, Some("image/jpeg".to_string())).unwrap()
    }

    #[test]
    fn test_register_and_get() {
        let db = setup();
        let repo = SqliteAssetRepository::new(db.connection());

        let asset = repo
            .register(&new_asset("https://example.com/uploads/2024/05/photo.jpg"))
            .unwrap();
        assert_eq!(asset.url, "https://example.com/uploads/2024/05/photo.jpg");

        let fetched = repo.get(asset.id).unwrap().unwrap();
        assert_eq!(fetched, asset);
    }

    #[test]
    fn test_find_by_url_is_exact() {
        let db = setup();
        let repo = SqliteAssetRepository::new(db.connection());

        repo.register(&new_asset("https://example.com/uploads/photo.jpg"))
            .unwrap();

        assert!(repo
            .find_by_url("https://example.com/uploads/photo.jpg")
            .unwrap()
            .is_some());
        assert!(repo
            .find_by_url("https://example.com/uploads/PHOTO.jpg")
            .unwrap()
            .is_none());
        assert!(repo
            .find_by_url("https://example.com/uploads/photo.jpg?x=1")
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_find_by_url_prefers_oldest_duplicate() {
        let db = setup();
        let repo = SqliteAssetRepository::new(db.connection());

        let first = repo
            .register(&new_asset("https://example.com/uploads/dup.png"))
            .unwrap();
        repo.register(&new_asset("https://example.com/uploads/dup.png"))
            .unwrap();

        let found = repo
            .find_by_url("https://example.com/uploads/dup.png")
            .unwrap()
            .unwrap();
        assert_eq!(found.id, first.id);
    }

    #[test]
    fn test_delete_hides_asset() {
        let db = setup();
        let repo = SqliteAssetRepository::new(db.connection());

        let asset = repo
            .register(&new_asset("https://example.com/uploads/gone.pdf"))
            .unwrap();
        repo.delete(asset.id).unwrap();

        assert!(repo.get(asset.id).unwrap().is_none());
        assert!(repo
            .find_by_url("https://example.com/uploads/gone.pdf")
            .unwrap()
            .is_none());
        assert!(repo.list(10, 0).unwrap().is_empty());

        // Deleting twice reports the missing record.
        assert!(matches!(repo.delete(asset.id), Err(Error::NotFound(_))));
    }

    #[test]
    fn test_list_newest_first() {
        let db = setup();
        let repo = SqliteAssetRepository::new(db.connection());

        repo.register(&new_asset("https://example.com/uploads/1.jpg"))
            .unwrap();
        repo.register(&new_asset("https://example.com/uploads/2.jpg"))
            .unwrap();
        repo.register(&new_asset("https://example.com/uploads/3.jpg"))
            .unwrap();

        let assets = repo.list(2, 0).unwrap();
        assert_eq!(assets.len(), 2);
        assert_eq!(assets[0].url, "https://example.com/uploads/3.jpg");

        let rest = repo.list(10, 2).unwrap();
        assert_eq!(rest.len(), 1);
    }
}
