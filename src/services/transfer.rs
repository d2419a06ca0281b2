//! Transfer service
//!
//! Exports the combined state of both stores and applies imports. An import
//! replaces collections wholesale; it never merges.

use crate::audit::EntityType;
use crate::error::TrafficResult;
use crate::export::{export_state, import_state, ImportedState, Payload};
use crate::models::RecordId;
use crate::storage::Storage;

/// Outcome of an applied import
#[derive(Debug, Clone, PartialEq)]
pub struct ImportSummary {
    pub records_replaced: usize,
    pub records_imported: usize,
    /// `None` when the registry was left untouched
    pub categories_imported: Option<usize>,
    /// Imported records whose category does not resolve
    pub orphaned: Vec<RecordId>,
    /// Ids or names repeated inside the imported registry
    pub duplicate_categories: Vec<String>,
}

/// Service for moving the whole state in and out
pub struct TransferService<'a> {
    storage: &'a Storage,
}

impl<'a> TransferService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Snapshot both stores
    pub fn export(&self) -> TrafficResult<Payload> {
        let records = self.storage.records.get_all()?;
        let categories = self.storage.categories.get_all()?;
        Ok(export_state(&records, &categories))
    }

    /// Decode a JSON payload and apply it
    ///
    /// Nothing changes when decoding fails.
    pub fn import_json(&self, text: &str) -> TrafficResult<ImportSummary> {
        let state = import_state(text)?;
        self.apply_import(state)
    }

    /// Replace the stores with a decoded import
    ///
    /// The record store is always replaced; the registry only when the
    /// payload carried categories.
    pub fn apply_import(&self, state: ImportedState) -> TrafficResult<ImportSummary> {
        let existing = self.storage.categories.get_all()?;
        let orphaned = state.orphaned_record_ids(&existing);
        let duplicate_categories = state.duplicate_categories();
        let records_replaced = self.storage.records.count()?;
        let records_imported = state.records.len();
        let categories_imported = state.categories.as_ref().map(Vec::len);

        if let Some(categories) = state.categories {
            let previous = existing.len();
            let imported = categories.len();
            self.storage.categories.replace_all(categories)?;
            self.storage.persist_categories();
            self.storage.log_import(EntityType::Category, previous, imported);
            tracing::debug!(previous, imported, "category registry replaced");
        }

        self.storage.records.replace_all(state.records)?;
        self.storage.persist_records();
        self.storage
            .log_import(EntityType::Record, records_replaced, records_imported);
        tracing::debug!(records_replaced, records_imported, "record store replaced");

        if !orphaned.is_empty() {
            tracing::warn!(
                count = orphaned.len(),
                "imported records reference unknown categories"
            );
        }
        if !duplicate_categories.is_empty() {
            tracing::warn!(
                duplicates = ?duplicate_categories,
                "imported categories repeat an id or name"
            );
        }

        Ok(ImportSummary {
            records_replaced,
            records_imported,
            categories_imported,
            orphaned,
            duplicate_categories,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TrafficError;
    use crate::export::write_json;
    use crate::services::{CategoryService, RecordService};

    fn populated() -> Storage {
        let storage = Storage::in_memory();
        let work = CategoryService::new(&storage).add_category("Work").unwrap();
        let records = RecordService::new(&storage);
        records.add_record(&work.id, 1.0, "2024-01").unwrap();
        records.add_record(&work.id, 2.0, "2024-02").unwrap();
        storage
    }

    #[test]
    fn test_export_then_import_restores_state() {
        let source = populated();
        let mut buffer = Vec::new();
        write_json(&TransferService::new(&source).export().unwrap(), &mut buffer).unwrap();

        let target = Storage::in_memory();
        CategoryService::new(&target).add_category("Other").unwrap();

        let summary = TransferService::new(&target)
            .import_json(&String::from_utf8(buffer).unwrap())
            .unwrap();
        assert_eq!(summary.records_replaced, 0);
        assert_eq!(summary.records_imported, 2);
        assert_eq!(summary.categories_imported, Some(1));
        assert!(summary.orphaned.is_empty());
        assert!(summary.duplicate_categories.is_empty());

        assert_eq!(target.records.get_all().unwrap(), source.records.get_all().unwrap());
        assert_eq!(
            target.categories.get_all().unwrap(),
            source.categories.get_all().unwrap()
        );
    }

    #[test]
    fn test_import_without_categories_keeps_registry() {
        let storage = populated();
        let before = storage.categories.get_all().unwrap();

        let summary = TransferService::new(&storage)
            .import_json(r#"{"trafficData": []}"#)
            .unwrap();

        assert_eq!(summary.records_replaced, 2);
        assert_eq!(summary.categories_imported, None);
        assert_eq!(storage.records.count().unwrap(), 0);
        assert_eq!(storage.categories.get_all().unwrap(), before);
    }

    #[test]
    fn test_failed_import_leaves_state_untouched() {
        let storage = populated();
        let records = storage.records.get_all().unwrap();
        let categories = storage.categories.get_all().unwrap();
        let service = TransferService::new(&storage);

        for text in [r#"{"categories": []}"#, r#"{"trafficData": [], "categories": 5}"#] {
            assert!(matches!(
                service.import_json(text),
                Err(TrafficError::MalformedPayload(_))
            ));
        }

        assert_eq!(storage.records.get_all().unwrap(), records);
        assert_eq!(storage.categories.get_all().unwrap(), categories);
    }

    #[test]
    fn test_import_reports_orphans() {
        let storage = populated();
        let summary = TransferService::new(&storage)
            .import_json(
                r#"{"trafficData": [{"id": "r1", "category": "nope", "amount": 1, "date": "2024-01"}]}"#,
            )
            .unwrap();

        assert_eq!(summary.orphaned, vec![RecordId::from_string("r1")]);
        assert_eq!(storage.records.count().unwrap(), 1);
    }

    #[test]
    fn test_import_reports_duplicate_categories() {
        let storage = populated();
        let summary = TransferService::new(&storage)
            .import_json(
                r#"{"trafficData": [], "categories": [
                    {"id": "1", "name": "Work"},
                    {"id": "2", "name": "Work"}
                ]}"#,
            )
            .unwrap();

        assert_eq!(summary.duplicate_categories, vec!["name Work".to_string()]);
        assert_eq!(summary.categories_imported, Some(2));
        assert!(summary.orphaned.is_empty());
    }
}
