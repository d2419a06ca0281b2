//! Custom error types for traffic-cli
//!
//! This module defines the error hierarchy for the application using thiserror
//! for ergonomic error definitions. Validation failures carry enough context
//! to be shown to the user as-is.

use thiserror::Error;

/// The main error type for traffic-cli operations
#[derive(Error, Debug)]
pub enum TrafficError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// File I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(String),

    /// A category with the same (trimmed) name already exists
    #[error("Category already exists: {0}")]
    DuplicateName(String),

    /// Category name was empty after trimming
    #[error("Category name cannot be empty")]
    EmptyName,

    /// Category is still referenced by records
    #[error("Category '{name}' is used by {record_count} record(s) and cannot be deleted")]
    CategoryInUse { name: String, record_count: usize },

    /// Entity not found errors
    #[error("{entity_type} not found: {identifier}")]
    NotFound {
        entity_type: &'static str,
        identifier: String,
    },

    /// A record refers to a category that does not exist
    #[error("Unknown category: {0}")]
    UnknownCategory(String),

    /// Amount is not a positive finite number
    #[error("Invalid amount: {0} (must be a number greater than zero)")]
    InvalidAmount(String),

    /// Period is not of the form YYYY-MM
    #[error("Invalid period: {0} (expected YYYY-MM)")]
    InvalidPeriod(String),

    /// Page number or page size is out of range
    #[error("Invalid page: {0}")]
    InvalidPage(String),

    /// Import payload does not have the expected shape
    #[error("Malformed payload: {0}")]
    MalformedPayload(String),

    /// Storage errors
    #[error("Storage error: {0}")]
    Storage(String),

    /// Export errors
    #[error("Export error: {0}")]
    Export(String),
}

impl TrafficError {
    /// Create a "not found" error for categories
    pub fn category_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Category",
            identifier: identifier.into(),
        }
    }

    /// Create a "not found" error for records
    pub fn record_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Record",
            identifier: identifier.into(),
        }
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

// Implement From traits for common error types

impl From<std::io::Error> for TrafficError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for TrafficError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}

/// Result type alias for traffic-cli operations
pub type TrafficResult<T> = Result<T, TrafficError>;
