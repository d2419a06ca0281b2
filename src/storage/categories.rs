//! Category repository
//!
//! Holds the category registry in insertion order and persists it as a
//! JSON array under the `trafficCategories` key.

use std::sync::{Arc, RwLock};

use crate::error::{TrafficError, TrafficResult};
use crate::models::{Category, CategoryId};

use super::blob::{BlobStore, CATEGORIES_KEY};
use super::{load_collection, save_collection};

/// Repository for category persistence
pub struct CategoryRepository {
    store: Arc<dyn BlobStore>,
    data: RwLock<Vec<Category>>,
}

impl CategoryRepository {
    /// Create a new, empty category repository
    pub fn new(store: Arc<dyn BlobStore>) -> Self {
        Self {
            store,
            data: RwLock::new(Vec::new()),
        }
    }

    /// Load categories from the blob store
    ///
    /// A missing or unreadable document leaves the registry empty.
    pub fn load(&self) -> TrafficResult<usize> {
        let loaded: Vec<Category> = load_collection(self.store.as_ref(), CATEGORIES_KEY);
        let count = loaded.len();

        let mut data = self
            .data
            .write()
            .map_err(|e| TrafficError::Storage(format!("Failed to acquire write lock: {}", e)))?;
        *data = loaded;

        Ok(count)
    }

    /// Save categories to the blob store
    pub fn save(&self) -> TrafficResult<()> {
        let data = self
            .data
            .read()
            .map_err(|e| TrafficError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        save_collection(self.store.as_ref(), CATEGORIES_KEY, data.as_slice())
    }

    /// Get a category by ID
    pub fn get(&self, id: &CategoryId) -> TrafficResult<Option<Category>> {
        let data = self
            .data
            .read()
            .map_err(|e| TrafficError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(data.iter().find(|c| &c.id == id).cloned())
    }

    /// Get a category by exact (case-sensitive) name
    pub fn get_by_name(&self, name: &str) -> TrafficResult<Option<Category>> {
        let data = self
            .data
            .read()
            .map_err(|e| TrafficError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(data.iter().find(|c| c.name == name).cloned())
    }

    /// Get all categories in creation order
    pub fn get_all(&self) -> TrafficResult<Vec<Category>> {
        let data = self
            .data
            .read()
            .map_err(|e| TrafficError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(data.clone())
    }

    /// Append a category
    pub fn insert(&self, category: Category) -> TrafficResult<()> {
        let mut data = self
            .data
            .write()
            .map_err(|e| TrafficError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        data.push(category);
        Ok(())
    }

    /// Remove a category, returning it if it existed
    pub fn remove(&self, id: &CategoryId) -> TrafficResult<Option<Category>> {
        let mut data = self
            .data
            .write()
            .map_err(|e| TrafficError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        Ok(data
            .iter()
            .position(|c| &c.id == id)
            .map(|index| data.remove(index)))
    }

    /// Replace the whole registry
    pub fn replace_all(&self, categories: Vec<Category>) -> TrafficResult<()> {
        let mut data = self
            .data
            .write()
            .map_err(|e| TrafficError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        *data = categories;
        Ok(())
    }

    /// Count categories
    pub fn count(&self) -> TrafficResult<usize> {
        let data = self
            .data
            .read()
            .map_err(|e| TrafficError::Storage(format!("Failed to acquire read lock: {}", e)))?;
        Ok(data.len())
    }
}
