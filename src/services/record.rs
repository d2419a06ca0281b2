//! Record service
//!
//! Provides business logic for traffic records. Every command validates its
//! full input before touching the store, so a rejected command changes
//! nothing.

use crate::audit::EntityType;
use crate::error::{TrafficError, TrafficResult};
use crate::models::{validate_amount, CategoryId, Period, Record, RecordId};
use crate::storage::Storage;

/// Service for record management
pub struct RecordService<'a> {
    storage: &'a Storage,
}

impl<'a> RecordService<'a> {
    /// Create a new record service
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Check a candidate record's fields
    ///
    /// Errors are reported in order: category, then amount, then period.
    fn validate(&self, category_id: &CategoryId, amount: f64, period: &str) -> TrafficResult<Period> {
        if self.storage.categories.get(category_id)?.is_none() {
            return Err(TrafficError::UnknownCategory(category_id.to_string()));
        }
        validate_amount(amount)?;
        Period::parse(period)
    }

    /// Add a new record
    pub fn add_record(
        &self,
        category_id: &CategoryId,
        amount: f64,
        period: &str,
    ) -> TrafficResult<Record> {
        let period = self.validate(category_id, amount, period)?;

        let record = Record::new(category_id.clone(), amount, period);
        self.storage.records.insert(record.clone())?;
        self.storage.persist_records();

        tracing::debug!(id = %record.id, period = %record.period, amount, "record added");
        self.storage
            .log_create(EntityType::Record, record.id.to_string(), None, &record);

        Ok(record)
    }

    /// Replace every mutable field of an existing record
    pub fn update_record(
        &self,
        id: &RecordId,
        category_id: &CategoryId,
        amount: f64,
        period: &str,
    ) -> TrafficResult<Record> {
        let period = self.validate(category_id, amount, period)?;

        let updated = Record {
            id: id.clone(),
            category_id: category_id.clone(),
            amount,
            period,
        };

        let before = self
            .storage
            .records
            .replace(updated.clone())?
            .ok_or_else(|| TrafficError::record_not_found(id.to_string()))?;
        self.storage.persist_records();

        tracing::debug!(id = %updated.id, "record updated");
        self.storage.log_update(
            EntityType::Record,
            updated.id.to_string(),
            None,
            &before,
            &updated,
            Some(describe_changes(&before, &updated)),
        );

        Ok(updated)
    }

    /// Delete a record
    pub fn delete_record(&self, id: &RecordId) -> TrafficResult<Record> {
        let record = self
            .storage
            .records
            .remove(id)?
            .ok_or_else(|| TrafficError::record_not_found(id.to_string()))?;
        self.storage.persist_records();

        tracing::debug!(id = %record.id, "record deleted");
        self.storage
            .log_delete(EntityType::Record, record.id.to_string(), None, &record);

        Ok(record)
    }

    /// All records in store order
    pub fn list_records(&self) -> TrafficResult<Vec<Record>> {
        self.storage.records.get_all()
    }

    /// Get a record by ID
    pub fn get_record(&self, id: &RecordId) -> TrafficResult<Option<Record>> {
        self.storage.records.get(id)
    }

    /// Find a record by full ID or unambiguous ID prefix
    pub fn find_record(&self, identifier: &str) -> TrafficResult<Option<Record>> {
        let id = match identifier.parse::<RecordId>() {
            Ok(id) => id,
            Err(never) => match never {},
        };
        if id.as_str().is_empty() {
            return Ok(None);
        }
        if let Some(record) = self.storage.records.get(&id)? {
            return Ok(Some(record));
        }

        let mut matches = self
            .storage
            .records
            .get_all()?
            .into_iter()
            .filter(|r| r.id.as_str().starts_with(id.as_str()));

        match (matches.next(), matches.next()) {
            (Some(record), None) => Ok(Some(record)),
            _ => Ok(None),
        }
    }

    /// Resolve an ID string, failing when nothing matches
    pub fn require_record(&self, identifier: &str) -> TrafficResult<Record> {
        self.find_record(identifier)?
            .ok_or_else(|| TrafficError::record_not_found(identifier))
    }
}

fn describe_changes(before: &Record, after: &Record) -> String {
    let mut changes = Vec::new();
    if before.category_id != after.category_id {
        changes.push(format!("category: {} -> {}", before.category_id, after.category_id));
    }
    if before.amount != after.amount {
        changes.push(format!("amount: {} -> {}", before.amount, after.amount));
    }
    if before.period != after.period {
        changes.push(format!("period: {} -> {}", before.period, after.period));
    }
    if changes.is_empty() {
        "no changes".to_string()
    } else {
        changes.join(", ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::CategoryService;
    use crate::storage::tests::FailingBlobStore;
    use std::sync::Arc;

    fn setup() -> (Storage, CategoryId) {
        let storage = Storage::in_memory();
        let category = CategoryService::new(&storage).add_category("Work").unwrap();
        (storage, category.id)
    }

    #[test]
    fn test_add_record() {
        let (storage, category_id) = setup();
        let service = RecordService::new(&storage);

        let record = service.add_record(&category_id, 12.5, "2024-03").unwrap();
        assert_eq!(record.amount, 12.5);
        assert_eq!(record.period.to_string(), "2024-03");
        assert_eq!(service.list_records().unwrap(), vec![record]);
    }

    #[test]
    fn test_add_record_validation_order() {
        let (storage, category_id) = setup();
        let service = RecordService::new(&storage);
        let unknown = CategoryId::from_string("missing");

        assert!(matches!(
            service.add_record(&unknown, -1.0, "bad"),
            Err(TrafficError::UnknownCategory(_))
        ));
        assert!(matches!(
            service.add_record(&category_id, 0.0, "bad"),
            Err(TrafficError::InvalidAmount(_))
        ));
        assert!(matches!(
            service.add_record(&category_id, f64::NAN, "2024-01"),
            Err(TrafficError::InvalidAmount(_))
        ));
        assert!(matches!(
            service.add_record(&category_id, 1.0, "2024-13"),
            Err(TrafficError::InvalidPeriod(_))
        ));
        assert!(service.list_records().unwrap().is_empty());
    }

    #[test]
    fn test_update_record() {
        let (storage, category_id) = setup();
        let other = CategoryService::new(&storage).add_category("Life").unwrap();
        let service = RecordService::new(&storage);
        let record = service.add_record(&category_id, 5.0, "2024-01").unwrap();

        let updated = service
            .update_record(&record.id, &other.id, 8.0, "2024-02")
            .unwrap();
        assert_eq!(updated.id, record.id);

        let stored = service.get_record(&record.id).unwrap().unwrap();
        assert_eq!(stored.category_id, other.id);
        assert_eq!(stored.amount, 8.0);
        assert_eq!(stored.period, Period::new(2024, 2).unwrap());
    }

    #[test]
    fn test_update_record_rejects_without_change() {
        let (storage, category_id) = setup();
        let service = RecordService::new(&storage);
        let record = service.add_record(&category_id, 5.0, "2024-01").unwrap();

        assert!(matches!(
            service.update_record(&record.id, &category_id, 8.0, "2024/02"),
            Err(TrafficError::InvalidPeriod(_))
        ));
        assert_eq!(service.get_record(&record.id).unwrap().unwrap(), record);

        let missing = RecordId::from_string("missing");
        assert!(service
            .update_record(&missing, &category_id, 1.0, "2024-01")
            .unwrap_err()
            .is_not_found());
    }

    #[test]
    fn test_delete_record() {
        let (storage, category_id) = setup();
        let service = RecordService::new(&storage);
        let record = service.add_record(&category_id, 5.0, "2024-01").unwrap();

        service.delete_record(&record.id).unwrap();
        assert!(service.list_records().unwrap().is_empty());
        assert!(service.delete_record(&record.id).unwrap_err().is_not_found());
    }

    #[test]
    fn test_find_record_by_prefix() {
        let (storage, category_id) = setup();
        let service = RecordService::new(&storage);
        let record = service.add_record(&category_id, 5.0, "2024-01").unwrap();

        assert_eq!(service.find_record(&record.id.short()).unwrap().unwrap().id, record.id);
        assert!(service.find_record("").unwrap().is_none());
        assert!(service.require_record("zzzz").unwrap_err().is_not_found());
    }

    #[test]
    fn test_persistence_failure_does_not_fail_mutation() {
        let storage = Storage::with_store(Arc::new(FailingBlobStore));
        let category = CategoryService::new(&storage).add_category("Work").unwrap();
        let service = RecordService::new(&storage);

        let record = service.add_record(&category.id, 1.0, "2024-01").unwrap();
        assert_eq!(service.get_record(&record.id).unwrap().unwrap(), record);
    }

    #[test]
    fn test_mutations_are_written_through() {
        use crate::storage::{BlobStore, MemoryBlobStore, RECORDS_KEY};

        let store = Arc::new(MemoryBlobStore::new());
        let storage = Storage::with_store(store.clone());
        let category = CategoryService::new(&storage).add_category("Work").unwrap();
        RecordService::new(&storage)
            .add_record(&category.id, 3.0, "2024-05")
            .unwrap();

        let raw = store.load(RECORDS_KEY).unwrap().unwrap();
        assert!(raw.contains("\"date\":\"2024-05\""));
        assert!(raw.contains(&format!("\"category\":\"{}\"", category.id)));
    }
}
