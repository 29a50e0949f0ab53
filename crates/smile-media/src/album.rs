//! Album persistence: file an image into a named album, creating the
//! album on first use.

use std::sync::Arc;

use smile_core::ImageRef;

use crate::error::PersistenceError;
use crate::store::{Asset, MediaStore};

/// Files captured images into one fixed-name album.
///
/// The lookup-then-create step is a check-then-act sequence: two
/// concurrent saves for a brand-new album name could each observe "no
/// album" and create it twice. Callers must serialize saves — the
/// capture engine satisfies this by allowing at most one active
/// session, so at most one save is ever in flight.
pub struct AlbumSaver {
    store: Arc<dyn MediaStore>,
    album_name: String,
}

impl AlbumSaver {
    pub fn new(store: Arc<dyn MediaStore>, album_name: impl Into<String>) -> Self {
        Self {
            store,
            album_name: album_name.into(),
        }
    }

    pub fn album_name(&self) -> &str {
        &self.album_name
    }

    /// Persist an image: create the store asset, then seed a new album
    /// with it or attach it to the existing one.
    ///
    /// If the asset is created but the album step fails, the asset is
    /// orphaned outside any user-visible album; that case is reported
    /// as [`PersistenceError::AssetOrphaned`] rather than swallowed.
    pub async fn save(&self, image: &ImageRef) -> Result<Asset, PersistenceError> {
        let asset = self
            .store
            .create_asset(image)
            .await
            .map_err(PersistenceError::AssetCreation)?;

        let album = self
            .store
            .get_album(&self.album_name)
            .await
            .map_err(PersistenceError::AlbumLookup)?;

        match album {
            None => {
                let album = self
                    .store
                    .create_album(&self.album_name, &asset)
                    .await
                    .map_err(|e| self.orphaned(&asset, e))?;
                tracing::info!(
                    album = %self.album_name,
                    album_id = %album.id,
                    asset_id = %asset.id,
                    "album created with seed asset"
                );
            }
            Some(album) => {
                self.store
                    .add_assets_to_album(std::slice::from_ref(&asset), &album.id)
                    .await
                    .map_err(|e| self.orphaned(&asset, e))?;
                tracing::info!(
                    album = %self.album_name,
                    album_id = %album.id,
                    asset_id = %asset.id,
                    "asset added to album"
                );
            }
        }

        Ok(asset)
    }

    fn orphaned(&self, asset: &Asset, source: crate::error::StoreError) -> PersistenceError {
        PersistenceError::AssetOrphaned {
            asset_id: asset.id.clone(),
            album: self.album_name.clone(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

    use async_trait::async_trait;

    use super::*;
    use crate::error::StoreError;
    use crate::memory::MemoryStore;
    use crate::store::Album;

    fn image(n: u32) -> ImageRef {
        ImageRef::new(format!("sim://back/img_{n:04}.jpg"))
    }

    #[tokio::test]
    async fn test_first_save_creates_album() {
        let store = Arc::new(MemoryStore::new());
        let saver = AlbumSaver::new(store.clone(), "BigSMILE");

        let asset = saver.save(&image(1)).await.unwrap();
        assert_eq!(store.album_count(), 1);
        let assets = store.album_assets("BigSMILE").unwrap();
        assert_eq!(assets.len(), 1);
        assert_eq!(assets[0].id, asset.id);
    }

    #[tokio::test]
    async fn test_second_save_reuses_album_identity() {
        // Scenario: create on first save, attach on the second — the
        // album count must stay at one while the asset count grows.
        let store = Arc::new(MemoryStore::new());
        let saver = AlbumSaver::new(store.clone(), "BigSMILE");

        saver.save(&image(1)).await.unwrap();
        saver.save(&image(2)).await.unwrap();

        assert_eq!(store.album_count(), 1);
        assert_eq!(store.album_assets("BigSMILE").unwrap().len(), 2);
        assert_eq!(store.asset_count(), 2);
    }

    #[tokio::test]
    async fn test_distinct_names_get_distinct_albums() {
        let store = Arc::new(MemoryStore::new());
        AlbumSaver::new(store.clone(), "BigSMILE")
            .save(&image(1))
            .await
            .unwrap();
        AlbumSaver::new(store.clone(), "Other")
            .save(&image(2))
            .await
            .unwrap();
        assert_eq!(store.album_count(), 2);
    }

    /// Store double whose attach step can be made to fail after asset
    /// creation succeeded.
    struct AttachFailStore {
        inner: MemoryStore,
        fail_attach: AtomicBool,
        attach_calls: AtomicUsize,
    }

    impl AttachFailStore {
        fn new() -> Self {
            Self {
                inner: MemoryStore::new(),
                fail_attach: AtomicBool::new(false),
                attach_calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl MediaStore for AttachFailStore {
        async fn create_asset(&self, image: &ImageRef) -> Result<Asset, StoreError> {
            self.inner.create_asset(image).await
        }

        async fn get_album(&self, name: &str) -> Result<Option<Album>, StoreError> {
            self.inner.get_album(name).await
        }

        async fn create_album(&self, name: &str, seed: &Asset) -> Result<Album, StoreError> {
            self.inner.create_album(name, seed).await
        }

        async fn add_assets_to_album(
            &self,
            assets: &[Asset],
            album_id: &str,
        ) -> Result<(), StoreError> {
            self.attach_calls.fetch_add(1, Ordering::SeqCst);
            if self.fail_attach.load(Ordering::SeqCst) {
                return Err(StoreError::Backend("attach rejected".into()));
            }
            self.inner.add_assets_to_album(assets, album_id).await
        }
    }

    #[tokio::test]
    async fn test_attach_failure_reports_orphan() {
        let store = Arc::new(AttachFailStore::new());
        let saver = AlbumSaver::new(store.clone(), "BigSMILE");

        saver.save(&image(1)).await.unwrap();
        store.fail_attach.store(true, Ordering::SeqCst);

        let err = saver.save(&image(2)).await.unwrap_err();
        match err {
            PersistenceError::AssetOrphaned { album, .. } => assert_eq!(album, "BigSMILE"),
            other => panic!("expected orphan report, got {other}"),
        }
        // The orphan really exists: created in the store, absent from
        // the album.
        assert_eq!(store.inner.asset_count(), 2);
        assert_eq!(store.inner.album_assets("BigSMILE").unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_existing_album_attaches_not_recreates() {
        let store = Arc::new(AttachFailStore::new());
        let saver = AlbumSaver::new(store.clone(), "BigSMILE");
        saver.save(&image(1)).await.unwrap();
        saver.save(&image(2)).await.unwrap();
        // Attach path taken exactly once (second save); a re-create
        // would have failed MemoryStore's duplicate-name check.
        assert_eq!(store.attach_calls.load(Ordering::SeqCst), 1);
        assert_eq!(store.inner.album_count(), 1);
    }
}
