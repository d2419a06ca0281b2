//! Record repository
//!
//! Holds traffic records and persists them as a JSON array under the
//! `trafficData` key.

use std::sync::{Arc, RwLock};

use crate::error::{TrafficError, TrafficResult};
use crate::models::{CategoryId, Record, RecordId};

use super::blob::{BlobStore, RECORDS_KEY};
use super::{load_collection, save_collection};

/// Repository for record persistence
pub struct RecordRepository {
    store: Arc<dyn BlobStore>,
    data: RwLock<Vec<Record>>,
}

impl RecordRepository {
    /// Create a new, empty record repository
    pub fn new(store: Arc<dyn BlobStore>) -> Self {
        Self {
            store,
            data: RwLock::new(Vec::new()),
        }
    }

    /// Load records from the blob store
    ///
    /// A missing or unreadable document leaves the store empty.
    pub fn load(&self) -> TrafficResult<usize> {
        let loaded: Vec<Record> = load_collection(self.store.as_ref(), RECORDS_KEY);
        let count = loaded.len();

        let mut data = self
            .data
            .write()
            .map_err(|e| TrafficError::Storage(format!("Failed to acquire write lock: {}", e)))?;
        *data = loaded;

        Ok(count)
    }

    /// Save records to the blob store
    pub fn save(&self) -> TrafficResult<()> {
        let data = self
            .data
            .read()
            .map_err(|e| TrafficError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        save_collection(self.store.as_ref(), RECORDS_KEY, data.as_slice())
    }

    /// Get a record by ID
    pub fn get(&self, id: &RecordId) -> TrafficResult<Option<Record>> {
        let data = self
            .data
            .read()
            .map_err(|e| TrafficError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(data.iter().find(|r| &r.id == id).cloned())
    }

    /// Get all records in store order
    pub fn get_all(&self) -> TrafficResult<Vec<Record>> {
        let data = self
            .data
            .read()
            .map_err(|e| TrafficError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(data.clone())
    }

    /// Append a record
    pub fn insert(&self, record: Record) -> TrafficResult<()> {
        let mut data = self
            .data
            .write()
            .map_err(|e| TrafficError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        data.push(record);
        Ok(())
    }

    /// Replace the record with the same ID in place
    ///
    /// Returns the previous version, or `None` (and changes nothing) if no
    /// record has that ID.
    pub fn replace(&self, record: Record) -> TrafficResult<Option<Record>> {
        let mut data = self
            .data
            .write()
            .map_err(|e| TrafficError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        Ok(data
            .iter_mut()
            .find(|r| r.id == record.id)
            .map(|slot| std::mem::replace(slot, record)))
    }

    /// Remove a record, returning it if it existed
    pub fn remove(&self, id: &RecordId) -> TrafficResult<Option<Record>> {
        let mut data = self
            .data
            .write()
            .map_err(|e| TrafficError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        Ok(data
            .iter()
            .position(|r| &r.id == id)
            .map(|index| data.remove(index)))
    }

    /// Replace the whole store
    pub fn replace_all(&self, records: Vec<Record>) -> TrafficResult<()> {
        let mut data = self
            .data
            .write()
            .map_err(|e| TrafficError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        *data = records;
        Ok(())
    }

    /// Number of records referencing a category
    pub fn count_by_category(&self, category_id: &CategoryId) -> TrafficResult<usize> {
        let data = self
            .data
            .read()
            .map_err(|e| TrafficError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(data.iter().filter(|r| &r.category_id == category_id).count())
    }

    /// Count records
    pub fn count(&self) -> TrafficResult<usize> {
        let data = self
            .data
            .read()
            .map_err(|e| TrafficError::Storage(format!("Failed to acquire read lock: {}", e)))?;
        Ok(data.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Period;
    use crate::storage::blob::MemoryBlobStore;

    fn create_test_repo() -> (Arc<MemoryBlobStore>, RecordRepository) {
        let store = Arc::new(MemoryBlobStore::new());
        let repo = RecordRepository::new(store.clone());
        (store, repo)
    }

    fn record(category: &str, amount: f64, period: &str) -> Record {
        Record::new(
            CategoryId::from_string(category),
            amount,
            Period::parse(period).unwrap(),
        )
    }

    #[test]
    fn test_insert_and_get() {
        let (_store, repo) = create_test_repo();
        let rec = record("1", 10.0, "2024-01");
        let id = rec.id.clone();

        repo.insert(rec).unwrap();
        assert_eq!(repo.count().unwrap(), 1);
        assert_eq!(repo.get(&id).unwrap().unwrap().amount, 10.0);
    }

    #[test]
    fn test_replace() {
        let (_store, repo) = create_test_repo();
        let rec = record("1", 10.0, "2024-01");
        repo.insert(rec.clone()).unwrap();

        let mut updated = rec.clone();
        updated.amount = 20.0;
        let previous = repo.replace(updated).unwrap().unwrap();
        assert_eq!(previous.amount, 10.0);
        assert_eq!(repo.get(&rec.id).unwrap().unwrap().amount, 20.0);

        let missing = record("1", 1.0, "2024-01");
        assert!(repo.replace(missing).unwrap().is_none());
        assert_eq!(repo.count().unwrap(), 1);
    }

    #[test]
    fn test_count_by_category() {
        let (_store, repo) = create_test_repo();
        repo.insert(record("1", 1.0, "2024-01")).unwrap();
        repo.insert(record("1", 2.0, "2024-02")).unwrap();
        repo.insert(record("2", 3.0, "2024-02")).unwrap();

        assert_eq!(repo.count_by_category(&CategoryId::from_string("1")).unwrap(), 2);
        assert_eq!(repo.count_by_category(&CategoryId::from_string("3")).unwrap(), 0);
    }

    #[test]
    fn test_save_and_reload() {
        let (store, repo) = create_test_repo();
        repo.insert(record("1", 1.5, "2024-01")).unwrap();
        repo.save().unwrap();

        let repo2 = RecordRepository::new(store);
        assert_eq!(repo2.load().unwrap(), 1);
        assert_eq!(repo2.get_all().unwrap()[0].period.to_string(), "2024-01");
    }

    #[test]
    fn test_document_with_malformed_period_loads_empty() {
        let doc = r#"[{"id":"1","category":"1","amount":5,"date":"2024-1"}]"#;
        let store = Arc::new(MemoryBlobStore::with_entries([(RECORDS_KEY, doc)]));
        let repo = RecordRepository::new(store);

        assert_eq!(repo.load().unwrap(), 0);
    }
}
