//! Storage layer for traffic-cli
//!
//! The category registry and the record store each keep their collection in
//! memory and write it through to a `BlobStore` after every mutation. The
//! blob store is an explicit dependency so tests can swap in memory.

pub mod blob;
pub mod categories;
pub mod file_io;
pub mod init;
pub mod records;

pub use blob::{BlobStore, FileBlobStore, MemoryBlobStore, CATEGORIES_KEY, RECORDS_KEY};
pub use categories::CategoryRepository;
pub use file_io::{write_atomic, write_json_atomic};
pub use init::initialize_storage;
pub use records::RecordRepository;

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::audit::{AuditEntry, AuditLogger, EntityType};
use crate::config::paths::TrafficPaths;
use crate::config::settings::Settings;
use crate::error::{TrafficError, TrafficResult};

/// Decode the JSON array stored under `key`
///
/// Absent documents and documents that fail to parse both yield an empty
/// collection.
pub(crate) fn load_collection<T: DeserializeOwned>(store: &dyn BlobStore, key: &str) -> Vec<T> {
    let raw = match store.load(key) {
        Ok(Some(raw)) => raw,
        Ok(None) => {
            tracing::debug!(key, "no stored document, starting empty");
            return Vec::new();
        }
        Err(e) => {
            tracing::warn!(key, error = %e, "failed to read stored document, starting empty");
            return Vec::new();
        }
    };

    match serde_json::from_str(&raw) {
        Ok(items) => items,
        Err(e) => {
            tracing::warn!(key, error = %e, "stored document is not valid, starting empty");
            Vec::new()
        }
    }
}

/// Encode a collection as a JSON array and store it under `key`
pub(crate) fn save_collection<T: Serialize>(
    store: &dyn BlobStore,
    key: &str,
    items: &[T],
) -> TrafficResult<()> {
    let json = serde_json::to_string(items)
        .map_err(|e| TrafficError::Storage(format!("Failed to serialize {}: {}", key, e)))?;
    store.save(key, &json)
}

/// Main storage coordinator that provides access to both repositories
pub struct Storage {
    pub categories: CategoryRepository,
    pub records: RecordRepository,
    audit: Option<AuditLogger>,
}

impl Storage {
    /// Open file-backed storage under the configured data directory
    pub fn new(paths: &TrafficPaths, settings: &Settings) -> TrafficResult<Self> {
        paths.ensure_directories()?;

        let store: Arc<dyn BlobStore> = Arc::new(FileBlobStore::new(paths.data_dir()));
        let mut storage = Self::with_store(store);
        if settings.audit_enabled {
            storage.audit = Some(AuditLogger::new(paths.audit_log()));
        }
        Ok(storage)
    }

    /// Create storage over an arbitrary blob store, without an audit log
    pub fn with_store(store: Arc<dyn BlobStore>) -> Self {
        Self {
            categories: CategoryRepository::new(store.clone()),
            records: RecordRepository::new(store),
            audit: None,
        }
    }

    /// Storage backed by a fresh in-memory store
    pub fn in_memory() -> Self {
        Self::with_store(Arc::new(MemoryBlobStore::new()))
    }

    /// Attach an audit logger
    pub fn with_audit(mut self, logger: AuditLogger) -> Self {
        self.audit = Some(logger);
        self
    }

    pub fn audit(&self) -> Option<&AuditLogger> {
        self.audit.as_ref()
    }

    /// Load both collections from the blob store
    pub fn load_all(&self) -> TrafficResult<()> {
        let categories = self.categories.load()?;
        let records = self.records.load()?;
        tracing::debug!(categories, records, "storage loaded");
        Ok(())
    }

    /// Write the category registry through, logging instead of failing
    pub fn persist_categories(&self) {
        if let Err(e) = self.categories.save() {
            tracing::warn!(key = CATEGORIES_KEY, error = %e, "failed to persist categories");
        }
    }

    /// Write the record store through, logging instead of failing
    pub fn persist_records(&self) {
        if let Err(e) = self.records.save() {
            tracing::warn!(key = RECORDS_KEY, error = %e, "failed to persist records");
        }
    }

    fn write_audit(&self, entry: AuditEntry) {
        if let Some(logger) = &self.audit {
            if let Err(e) = logger.log(&entry) {
                tracing::warn!(error = %e, "failed to write audit entry");
            }
        }
    }

    pub fn log_create<T: Serialize>(
        &self,
        entity_type: EntityType,
        entity_id: impl Into<String>,
        entity_name: Option<String>,
        entity: &T,
    ) {
        self.write_audit(AuditEntry::create(entity_type, entity_id, entity_name, entity));
    }

    pub fn log_update<T: Serialize>(
        &self,
        entity_type: EntityType,
        entity_id: impl Into<String>,
        entity_name: Option<String>,
        before: &T,
        after: &T,
        summary: Option<String>,
    ) {
        self.write_audit(AuditEntry::update(
            entity_type,
            entity_id,
            entity_name,
            before,
            after,
            summary,
        ));
    }

    pub fn log_delete<T: Serialize>(
        &self,
        entity_type: EntityType,
        entity_id: impl Into<String>,
        entity_name: Option<String>,
        entity: &T,
    ) {
        self.write_audit(AuditEntry::delete(entity_type, entity_id, entity_name, entity));
    }

    pub fn log_import(&self, entity_type: EntityType, previous: usize, imported: usize) {
        self.write_audit(AuditEntry::import(entity_type, previous, imported));
    }
}
