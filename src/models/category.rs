//! Category model
//!
//! A category is a named tag that records are grouped by. Categories are
//! never renamed; they are created and, when unused, deleted.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::CategoryId;

/// A named grouping tag for records
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    /// Unique identifier
    pub id: CategoryId,

    /// Category name (trimmed, unique)
    pub name: String,
}

impl Category {
    /// Create a new category with a fresh ID
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: CategoryId::new(),
            name: name.into(),
        }
    }

    /// Create a category with a known ID
    pub fn with_id(id: CategoryId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// Categories seeded by `traffic init`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DefaultCategory {
    Work,
    Life,
    Entertainment,
    Study,
}

impl DefaultCategory {
    /// Get all default categories in order
    pub fn all() -> &'static [Self] {
        &[Self::Work, Self::Life, Self::Entertainment, Self::Study]
    }

    /// Get the name for this default category
    pub fn name(&self) -> &'static str {
        match self {
            Self::Work => "Work",
            Self::Life => "Life",
            Self::Entertainment => "Entertainment",
            Self::Study => "Study",
        }
    }

    pub fn to_category(&self) -> Category {
        Category::new(self.name())
    }
}
