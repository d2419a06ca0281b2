//! Category service
//!
//! Provides business logic for the category registry: creation with name
//! uniqueness, guarded deletion and lookup by name or ID.

use crate::audit::EntityType;
use crate::error::{TrafficError, TrafficResult};
use crate::models::{Category, CategoryId};
use crate::storage::Storage;

/// Service for category management
pub struct CategoryService<'a> {
    storage: &'a Storage,
}

impl<'a> CategoryService<'a> {
    /// Create a new category service
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Create a new category
    ///
    /// The name is trimmed; names are compared exactly (case-sensitive).
    pub fn add_category(&self, name: &str) -> TrafficResult<Category> {
        let name = name.trim();
        if name.is_empty() {
            return Err(TrafficError::EmptyName);
        }

        if self.storage.categories.get_by_name(name)?.is_some() {
            return Err(TrafficError::DuplicateName(name.to_string()));
        }

        let category = Category::new(name);
        self.storage.categories.insert(category.clone())?;
        self.storage.persist_categories();

        tracing::debug!(id = %category.id, name = %category.name, "category added");
        self.storage.log_create(
            EntityType::Category,
            category.id.to_string(),
            Some(category.name.clone()),
            &category,
        );

        Ok(category)
    }

    /// Delete a category that no record refers to
    pub fn delete_category(&self, id: &CategoryId) -> TrafficResult<Category> {
        let category = self
            .storage
            .categories
            .get(id)?
            .ok_or_else(|| TrafficError::category_not_found(id.to_string()))?;

        let record_count = self.storage.records.count_by_category(id)?;
        if record_count > 0 {
            return Err(TrafficError::CategoryInUse {
                name: category.name,
                record_count,
            });
        }

        self.storage.categories.remove(id)?;
        self.storage.persist_categories();

        tracing::debug!(id = %category.id, name = %category.name, "category deleted");
        self.storage.log_delete(
            EntityType::Category,
            category.id.to_string(),
            Some(category.name.clone()),
            &category,
        );

        Ok(category)
    }

    /// List all categories in creation order
    pub fn list_categories(&self) -> TrafficResult<Vec<Category>> {
        self.storage.categories.get_all()
    }

    /// Get a category by ID
    pub fn get_category(&self, id: &CategoryId) -> TrafficResult<Option<Category>> {
        self.storage.categories.get(id)
    }

    /// Find a category by name or ID string
    ///
    /// Exact name wins; otherwise the identifier is matched as a full ID or
    /// as an unambiguous ID prefix (what `short()` displays).
    pub fn find_category(&self, identifier: &str) -> TrafficResult<Option<Category>> {
        if let Some(category) = self.storage.categories.get_by_name(identifier.trim())? {
            return Ok(Some(category));
        }

        let id = match identifier.parse::<CategoryId>() {
            Ok(id) => id,
            Err(never) => match never {},
        };
        if id.as_str().is_empty() {
            return Ok(None);
        }
        if let Some(category) = self.storage.categories.get(&id)? {
            return Ok(Some(category));
        }

        let mut matches = self
            .storage
            .categories
            .get_all()?
            .into_iter()
            .filter(|c| c.id.as_str().starts_with(id.as_str()));

        match (matches.next(), matches.next()) {
            (Some(category), None) => Ok(Some(category)),
            _ => Ok(None),
        }
    }

    /// Resolve a name or ID string, failing when nothing matches
    pub fn require_category(&self, identifier: &str) -> TrafficResult<Category> {
        self.find_category(identifier)?
            .ok_or_else(|| TrafficError::category_not_found(identifier))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Period, Record};

    #[test]
    fn test_add_category_trims_name() {
        let storage = Storage::in_memory();
        let service = CategoryService::new(&storage);

        let category = service.add_category("  Commute ").unwrap();
        assert_eq!(category.name, "Commute");
        assert_eq!(service.list_categories().unwrap().len(), 1);
    }

    #[test]
    fn test_add_category_rejects_empty_and_duplicate() {
        let storage = Storage::in_memory();
        let service = CategoryService::new(&storage);

        assert!(matches!(service.add_category("   "), Err(TrafficError::EmptyName)));

        service.add_category("Work").unwrap();
        assert!(matches!(
            service.add_category(" Work"),
            Err(TrafficError::DuplicateName(name)) if name == "Work"
        ));

        // Names are case-sensitive
        service.add_category("work").unwrap();
        assert_eq!(service.list_categories().unwrap().len(), 2);
    }

    #[test]
    fn test_list_keeps_creation_order() {
        let storage = Storage::in_memory();
        let service = CategoryService::new(&storage);

        for name in ["B", "A", "C"] {
            service.add_category(name).unwrap();
        }

        let names: Vec<_> = service
            .list_categories()
            .unwrap()
            .into_iter()
            .map(|c| c.name)
            .collect();
        assert_eq!(names, vec!["B", "A", "C"]);
    }

    #[test]
    fn test_delete_category() {
        let storage = Storage::in_memory();
        let service = CategoryService::new(&storage);
        let category = service.add_category("Work").unwrap();

        service.delete_category(&category.id).unwrap();
        assert!(service.list_categories().unwrap().is_empty());

        let err = service.delete_category(&category.id).unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_delete_category_in_use() {
        let storage = Storage::in_memory();
        let service = CategoryService::new(&storage);
        let category = service.add_category("Work").unwrap();

        storage
            .records
            .insert(Record::new(
                category.id.clone(),
                5.0,
                Period::parse("2024-01").unwrap(),
            ))
            .unwrap();

        assert!(matches!(
            service.delete_category(&category.id),
            Err(TrafficError::CategoryInUse { record_count: 1, .. })
        ));
        assert_eq!(service.list_categories().unwrap().len(), 1);
    }

    #[test]
    fn test_find_category() {
        let storage = Storage::in_memory();
        let service = CategoryService::new(&storage);
        let category = service.add_category("Work").unwrap();

        assert_eq!(service.find_category("Work").unwrap().unwrap().id, category.id);
        assert_eq!(
            service.find_category(category.id.as_str()).unwrap().unwrap().name,
            "Work"
        );
        assert_eq!(
            service.find_category(&category.id.short()).unwrap().unwrap().name,
            "Work"
        );
        assert!(service.find_category("Nothing").unwrap().is_none());
        assert!(service.require_category("Nothing").unwrap_err().is_not_found());
    }
}
