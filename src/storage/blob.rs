//! Key-value blob stores
//!
//! The repositories persist their collections as JSON text under a fixed
//! key. Where that text lives is decided by a `BlobStore`: one file per key
//! on disk for the CLI, or a map in memory for tests.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::RwLock;

use crate::error::{TrafficError, TrafficResult};

use super::file_io::write_atomic;

/// Key holding the JSON array of records
pub const RECORDS_KEY: &str = "trafficData";

/// Key holding the JSON array of categories
pub const CATEGORIES_KEY: &str = "trafficCategories";

/// Opaque key-value storage for JSON documents
pub trait BlobStore: Send + Sync {
    /// Load the document stored under `key`, or `None` if there is none
    fn load(&self, key: &str) -> TrafficResult<Option<String>>;

    /// Store `value` under `key`, replacing any previous document
    fn save(&self, key: &str, value: &str) -> TrafficResult<()>;
}

/// Stores each key as `<dir>/<key>.json`
#[derive(Debug, Clone)]
pub struct FileBlobStore {
    dir: PathBuf,
}

impl FileBlobStore {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    /// Path of the file backing `key`
    pub fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }
}

impl BlobStore for FileBlobStore {
    fn load(&self, key: &str) -> TrafficResult<Option<String>> {
        let path = self.path_for(key);
        if !path.exists() {
            return Ok(None);
        }

        std::fs::read_to_string(&path)
            .map(Some)
            .map_err(|e| TrafficError::Storage(format!("Failed to read {}: {}", path.display(), e)))
    }

    fn save(&self, key: &str, value: &str) -> TrafficResult<()> {
        write_atomic(self.path_for(key), value.as_bytes())
    }
}

/// In-memory store, used by tests and throwaway sessions
#[derive(Debug, Default)]
pub struct MemoryBlobStore {
    blobs: RwLock<HashMap<String, String>>,
}

impl MemoryBlobStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-populated with documents
    pub fn with_entries<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let blobs = entries
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        Self {
            blobs: RwLock::new(blobs),
        }
    }
}

impl BlobStore for MemoryBlobStore {
    fn load(&self, key: &str) -> TrafficResult<Option<String>> {
        let blobs = self
            .blobs
            .read()
            .map_err(|e| TrafficError::Storage(format!("Failed to acquire read lock: {}", e)))?;
        Ok(blobs.get(key).cloned())
    }

    fn save(&self, key: &str, value: &str) -> TrafficResult<()> {
        let mut blobs = self
            .blobs
            .write()
            .map_err(|e| TrafficError::Storage(format!("Failed to acquire write lock: {}", e)))?;
        blobs.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_file_store_round_trip() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileBlobStore::new(temp_dir.path().to_path_buf());

        assert_eq!(store.load(RECORDS_KEY).unwrap(), None);

        store.save(RECORDS_KEY, "[]").unwrap();
        assert_eq!(store.load(RECORDS_KEY).unwrap().as_deref(), Some("[]"));
        assert!(temp_dir.path().join("trafficData.json").exists());
    }

    #[test]
    fn test_memory_store() {
        let store = MemoryBlobStore::with_entries([(CATEGORIES_KEY, "[]")]);
        assert_eq!(store.load(CATEGORIES_KEY).unwrap().as_deref(), Some("[]"));
        assert_eq!(store.load(RECORDS_KEY).unwrap(), None);

        store.save(RECORDS_KEY, "[1]").unwrap();
        assert_eq!(store.load(RECORDS_KEY).unwrap().as_deref(), Some("[1]"));
    }
}
