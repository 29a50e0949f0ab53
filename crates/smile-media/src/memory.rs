//! In-memory media store backend.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;
use smile_core::ImageRef;
use uuid::Uuid;

use crate::error::StoreError;
use crate::store::{Album, Asset, MediaStore};

#[derive(Default)]
struct Inner {
    /// All registered assets, attached or orphaned.
    assets: Vec<Asset>,
    /// Album name → (album, member asset ids).
    albums: HashMap<String, (Album, Vec<String>)>,
}

/// Store backend holding everything in process memory. Backs tests and
/// hardware-free daemon runs; contents vanish on exit.
#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn album_count(&self) -> usize {
        self.lock().albums.len()
    }

    pub fn asset_count(&self) -> usize {
        self.lock().assets.len()
    }

    /// Assets filed under the named album, in insertion order.
    pub fn album_assets(&self, name: &str) -> Option<Vec<Asset>> {
        let inner = self.lock();
        let (_, ids) = inner.albums.get(name)?;
        Some(
            inner
                .assets
                .iter()
                .filter(|a| ids.contains(&a.id))
                .cloned()
                .collect(),
        )
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
        // Lock poisoning cannot outlive a test process usefully;
        // recover the guard either way.
        match self.inner.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

#[async_trait]
impl MediaStore for MemoryStore {
    async fn create_asset(&self, image: &ImageRef) -> Result<Asset, StoreError> {
        let asset = Asset {
            id: Uuid::new_v4().to_string(),
            uri: image.as_str().to_string(),
            created_at: Utc::now(),
        };
        self.lock().assets.push(asset.clone());
        Ok(asset)
    }

    async fn get_album(&self, name: &str) -> Result<Option<Album>, StoreError> {
        Ok(self.lock().albums.get(name).map(|(album, _)| album.clone()))
    }

    async fn create_album(&self, name: &str, seed: &Asset) -> Result<Album, StoreError> {
        let mut inner = self.lock();
        if inner.albums.contains_key(name) {
            // Surfaces a violated check-then-act precondition instead
            // of quietly duplicating the album.
            return Err(StoreError::AlbumExists(name.to_string()));
        }
        let album = Album {
            id: Uuid::new_v4().to_string(),
            name: name.to_string(),
        };
        inner
            .albums
            .insert(name.to_string(), (album.clone(), vec![seed.id.clone()]));
        Ok(album)
    }

    async fn add_assets_to_album(
        &self,
        assets: &[Asset],
        album_id: &str,
    ) -> Result<(), StoreError> {
        let mut inner = self.lock();
        let entry = inner
            .albums
            .values_mut()
            .find(|(album, _)| album.id == album_id);
        match entry {
            Some((_, ids)) => {
                ids.extend(assets.iter().map(|a| a.id.clone()));
                Ok(())
            }
            None => Err(StoreError::AlbumNotFound(album_id.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn image(n: u32) -> ImageRef {
        ImageRef::new(format!("sim://back/img_{n:04}.jpg"))
    }

    #[tokio::test]
    async fn test_create_asset_registers() {
        let store = MemoryStore::new();
        let asset = store.create_asset(&image(1)).await.unwrap();
        assert_eq!(asset.uri, "sim://back/img_0001.jpg");
        assert_eq!(store.asset_count(), 1);
    }

    #[tokio::test]
    async fn test_get_album_missing_is_none() {
        let store = MemoryStore::new();
        assert!(store.get_album("BigSMILE").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_create_album_rejects_duplicate_name() {
        let store = MemoryStore::new();
        let seed = store.create_asset(&image(1)).await.unwrap();
        store.create_album("BigSMILE", &seed).await.unwrap();
        let err = store.create_album("BigSMILE", &seed).await.unwrap_err();
        assert!(matches!(err, StoreError::AlbumExists(_)));
    }

    #[tokio::test]
    async fn test_add_to_unknown_album_fails() {
        let store = MemoryStore::new();
        let asset = store.create_asset(&image(1)).await.unwrap();
        let err = store
            .add_assets_to_album(std::slice::from_ref(&asset), "missing-id")
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::AlbumNotFound(_)));
    }
}
