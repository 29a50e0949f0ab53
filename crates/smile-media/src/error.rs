//! Persistence error types.

use thiserror::Error;

/// Failures reported by a [`MediaStore`](crate::MediaStore) backend.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("backend failure: {0}")]
    Backend(String),
    #[error("album not found: {0}")]
    AlbumNotFound(String),
    #[error("album already exists: {0}")]
    AlbumExists(String),
}

/// Failures of the save-to-album operation, one variant per step so
/// callers can tell how far the write got. Nothing here is swallowed:
/// an asset that was created but never attached to its album surfaces
/// as [`PersistenceError::AssetOrphaned`].
#[derive(Error, Debug)]
pub enum PersistenceError {
    #[error("asset creation failed: {0}")]
    AssetCreation(#[source] StoreError),
    #[error("album lookup failed: {0}")]
    AlbumLookup(#[source] StoreError),
    #[error("asset {asset_id} orphaned: created but not attached to album {album}: {source}")]
    AssetOrphaned {
        asset_id: String,
        album: String,
        #[source]
        source: StoreError,
    },
}
