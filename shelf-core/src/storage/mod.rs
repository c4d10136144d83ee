//! Key-value persistence for the library

mod library_store;

pub use library_store::{LibraryStore, BOOKS_KEY, IMAGE_KEY, LOCK_KEY};

use crate::error::StorageError;
use async_trait::async_trait;
use std::collections::HashMap;
use std::path::{Component, Path, PathBuf};
use std::sync::RwLock;

/// Result type for storage operations
pub type StorageResult<T> = std::result::Result<T, StorageError>;

/// Abstract key-value storage provider
#[async_trait]
pub trait StorageProvider: Send + Sync {
    /// Read the value stored under `key`
    async fn read(&self, key: &str) -> StorageResult<Vec<u8>>;

    /// Store `data` under `key`, replacing any previous value
    async fn write(&self, key: &str, data: Vec<u8>) -> StorageResult<()>;

    /// Remove the value stored under `key`
    async fn delete(&self, key: &str) -> StorageResult<()>;

    /// Check if a value exists under `key`
    async fn exists(&self, key: &str) -> StorageResult<bool>;
}

/// Directory-backed storage, one file per key
pub struct LocalStorage {
    root: PathBuf,
}

impl LocalStorage {
    /// Create a new local storage provider with the given root directory
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Safely resolve a key, preventing path traversal
    fn full_path(&self, key: &str) -> StorageResult<PathBuf> {
        let mut normalized = PathBuf::new();
        for component in Path::new(key).components() {
            match component {
                Component::Normal(c) => normalized.push(c),
                Component::CurDir => {}
                Component::ParentDir | Component::Prefix(_) | Component::RootDir => {
                    return Err(StorageError::InvalidKey(key.to_string()));
                }
            }
        }

        if normalized.as_os_str().is_empty() {
            return Err(StorageError::InvalidKey(key.to_string()));
        }

        Ok(self.root.join(normalized))
    }
}

fn not_found_or_backend(key: &str, e: std::io::Error) -> StorageError {
    if e.kind() == std::io::ErrorKind::NotFound {
        StorageError::NotFound(key.to_string())
    } else {
        StorageError::BackendError(e.to_string())
    }
}

#[async_trait]
impl StorageProvider for LocalStorage {
    async fn read(&self, key: &str) -> StorageResult<Vec<u8>> {
        let full_path = self.full_path(key)?;
        tokio::fs::read(full_path)
            .await
            .map_err(|e| not_found_or_backend(key, e))
    }

    /// Writes to a temp file then renames, so readers never see a partial value
    async fn write(&self, key: &str, data: Vec<u8>) -> StorageResult<()> {
        let full_path = self.full_path(key)?;
        if let Some(parent) = full_path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| StorageError::BackendError(e.to_string()))?;
        }

        let mut temp_name = full_path.as_os_str().to_owned();
        temp_name.push(".tmp");
        let temp_path = PathBuf::from(temp_name);

        tokio::fs::write(&temp_path, data)
            .await
            .map_err(|e| StorageError::BackendError(e.to_string()))?;
        tokio::fs::rename(&temp_path, &full_path)
            .await
            .map_err(|e| StorageError::BackendError(e.to_string()))
    }

    async fn delete(&self, key: &str) -> StorageResult<()> {
        let full_path = self.full_path(key)?;
        tokio::fs::remove_file(full_path)
            .await
            .map_err(|e| not_found_or_backend(key, e))
    }

    async fn exists(&self, key: &str) -> StorageResult<bool> {
        let full_path = self.full_path(key)?;
        tokio::fs::try_exists(full_path)
            .await
            .map_err(|e| StorageError::BackendError(e.to_string()))
    }
}

/// In-memory storage provider (for testing)
#[derive(Default)]
pub struct MemoryStorage {
    data: RwLock<HashMap<String, Vec<u8>>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

fn poisoned<T>(_: T) -> StorageError {
    StorageError::BackendError("memory storage lock poisoned".to_string())
}

#[async_trait]
impl StorageProvider for MemoryStorage {
    async fn read(&self, key: &str) -> StorageResult<Vec<u8>> {
        self.data
            .read()
            .map_err(poisoned)?
            .get(key)
            .cloned()
            .ok_or_else(|| StorageError::NotFound(key.to_string()))
    }

    async fn write(&self, key: &str, data: Vec<u8>) -> StorageResult<()> {
        self.data
            .write()
            .map_err(poisoned)?
            .insert(key.to_string(), data);
        Ok(())
    }

    async fn delete(&self, key: &str) -> StorageResult<()> {
        self.data
            .write()
            .map_err(poisoned)?
            .remove(key)
            .ok_or_else(|| StorageError::NotFound(key.to_string()))?;
        Ok(())
    }

    async fn exists(&self, key: &str) -> StorageResult<bool> {
        Ok(self.data.read().map_err(poisoned)?.contains_key(key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_memory_storage() {
        let storage = MemoryStorage::new();

        // Write
        storage.write("test.json", b"hello".to_vec()).await.unwrap();

        // Read
        let data = storage.read("test.json").await.unwrap();
        assert_eq!(data, b"hello");

        // Exists
        assert!(storage.exists("test.json").await.unwrap());
        assert!(!storage.exists("missing.json").await.unwrap());

        // Delete
        storage.delete("test.json").await.unwrap();
        assert!(!storage.exists("test.json").await.unwrap());
        assert!(matches!(
            storage.read("test.json").await.unwrap_err(),
            StorageError::NotFound(_)
        ));
    }

    #[tokio::test]
    async fn test_local_storage() {
        let dir = TempDir::new().unwrap();
        let storage = LocalStorage::new(dir.path().join("data"));

        storage.write("books.json", b"[]".to_vec()).await.unwrap();
        assert_eq!(storage.read("books.json").await.unwrap(), b"[]");
        assert!(storage.exists("books.json").await.unwrap());
        assert!(!dir.path().join("data/books.json.tmp").exists());

        storage.write("books.json", b"[1]".to_vec()).await.unwrap();
        assert_eq!(storage.read("books.json").await.unwrap(), b"[1]");

        storage.delete("books.json").await.unwrap();
        assert!(matches!(
            storage.read("books.json").await.unwrap_err(),
            StorageError::NotFound(_)
        ));
    }

    #[tokio::test]
    async fn test_local_storage_rejects_traversal() {
        let dir = TempDir::new().unwrap();
        let storage = LocalStorage::new(dir.path());

        for key in ["../escape.json", "/etc/passwd", "", "."] {
            assert!(matches!(
                storage.write(key, Vec::new()).await.unwrap_err(),
                StorageError::InvalidKey(_)
            ));
        }
    }
}
