//! Loads and saves the library under fixed storage keys

use super::{LocalStorage, StorageProvider};
use crate::catalog::Catalog;
use crate::error::{Result, ShelfError, StorageError};
use crate::state::Library;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;

/// Key holding the catalog as a JSON array of books
pub const BOOKS_KEY: &str = "my-library-books.json";

/// Key holding the library image as a JSON string or null
pub const IMAGE_KEY: &str = "my-library-image.json";

/// Key holding the lock flag as a JSON boolean
pub const LOCK_KEY: &str = "my-library-lock.json";

/// Write-through persistence adapter for [`Library`]
#[derive(Clone)]
pub struct LibraryStore {
    storage: Arc<dyn StorageProvider>,
}

impl LibraryStore {
    pub fn new(storage: Arc<dyn StorageProvider>) -> Self {
        Self { storage }
    }

    /// Store backed by a local directory
    pub fn local(root: impl Into<PathBuf>) -> Self {
        Self::new(Arc::new(LocalStorage::new(root)))
    }

    /// Load the library. Missing keys load as an empty, unlocked library.
    pub async fn load(&self) -> Result<Library> {
        let catalog: Catalog = self.read_key(BOOKS_KEY).await?;
        let uploaded_image: Option<String> = self.read_key(IMAGE_KEY).await?;
        let locked: bool = self.read_key(LOCK_KEY).await?;

        tracing::debug!(
            "Loaded library: {} books, image: {}, locked: {}",
            catalog.len(),
            uploaded_image.is_some(),
            locked
        );
        Ok(Library::from_parts(catalog, uploaded_image, locked))
    }

    /// Save every part of the library.
    ///
    /// Each key is replaced atomically, but the keys are independent and are
    /// not written as one transaction. The catalog goes last, so a failed save
    /// leaves the previously saved books in place.
    pub async fn save(&self, library: &Library) -> Result<()> {
        self.write_key(IMAGE_KEY, &library.uploaded_image()).await?;
        self.write_key(LOCK_KEY, &library.is_locked()).await?;
        self.write_key(BOOKS_KEY, library.catalog()).await?;
        tracing::debug!("Saved library with {} books", library.catalog().len());
        Ok(())
    }

    async fn read_key<T: DeserializeOwned + Default>(&self, key: &str) -> Result<T> {
        match self.storage.read(key).await {
            Ok(data) => serde_json::from_slice(&data).map_err(|e| {
                tracing::warn!("Stored value under {} is unreadable: {}", key, e);
                ShelfError::Parse(e)
            }),
            Err(StorageError::NotFound(_)) => Ok(T::default()),
            Err(e) => Err(e.into()),
        }
    }

    async fn write_key<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<()> {
        let data = serde_json::to_vec_pretty(value)?;
        self.storage.write(key, data).await?;
        Ok(())
    }
}
