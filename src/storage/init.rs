//! Storage initialization
//!
//! Handles first-run setup and default category creation

use crate::error::TrafficResult;
use crate::models::DefaultCategory;

use super::Storage;

/// Seed the default categories if the registry is empty
///
/// Returns the number of categories created.
pub fn initialize_storage(storage: &Storage) -> TrafficResult<usize> {
    if storage.categories.count()? > 0 {
        return Ok(0);
    }

    let defaults = DefaultCategory::all();
    for default in defaults {
        storage.categories.insert(default.to_category())?;
    }
    storage.persist_categories();

    Ok(defaults.len())
}
