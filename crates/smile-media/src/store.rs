//! Media store seam and stored record types.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use smile_core::ImageRef;

use crate::error::StoreError;

/// A photograph registered with the storage subsystem.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Asset {
    pub id: String,
    pub uri: String,
    pub created_at: DateTime<Utc>,
}

/// A named collection of assets. Identity is the `id`; the name is the
/// user-visible label the saver looks albums up by.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Album {
    pub id: String,
    pub name: String,
}

/// The platform media library, reduced to the four operations album
/// persistence needs.
#[async_trait]
pub trait MediaStore: Send + Sync {
    /// Register a captured image as a store asset.
    async fn create_asset(&self, image: &ImageRef) -> Result<Asset, StoreError>;

    /// Look up an album by name. `Ok(None)` means the album does not
    /// exist, which is a normal outcome, not an error.
    async fn get_album(&self, name: &str) -> Result<Option<Album>, StoreError>;

    /// Create an album seeded with one asset.
    async fn create_album(&self, name: &str, seed: &Asset) -> Result<Album, StoreError>;

    /// Attach assets to an existing album by identity.
    async fn add_assets_to_album(&self, assets: &[Asset], album_id: &str)
        -> Result<(), StoreError>;
}
