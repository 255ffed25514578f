//! Database layer for mediagate

mod connection;
mod migrations;
mod repository;
mod store;

pub use connection::Database;
pub use repository::{AssetRepository, SqliteAssetRepository};
pub use store::SqliteAssetStore;
