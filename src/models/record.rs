//! Traffic record model
//!
//! A record is one measured amount, tagged with a category and bucketed
//! into a month. On the wire the category reference is stored under
//! `category` and the period under `date`.

use serde::{Deserialize, Serialize};

use super::ids::{CategoryId, RecordId};
use super::period::Period;
use crate::error::TrafficError;

/// One categorized, period-bucketed measurement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    /// Unique identifier
    pub id: RecordId,

    /// Category this record belongs to
    #[serde(rename = "category")]
    pub category_id: CategoryId,

    /// Measured amount (positive)
    pub amount: f64,

    /// Month bucket
    #[serde(rename = "date")]
    pub period: Period,
}

impl Record {
    /// Create a new record with a fresh ID
    pub fn new(category_id: CategoryId, amount: f64, period: Period) -> Self {
        Self {
            id: RecordId::new(),
            category_id,
            amount,
            period,
        }
    }
}

/// Check that an amount is a positive finite number
pub fn validate_amount(amount: f64) -> Result<f64, TrafficError> {
    if amount.is_finite() && amount > 0.0 {
        Ok(amount)
    } else {
        Err(TrafficError::InvalidAmount(amount.to_string()))
    }
}

/// Parse user input into an amount
///
/// Rejects non-numeric text, zero, negatives, NaN and infinities.
pub fn parse_amount(input: &str) -> Result<f64, TrafficError> {
    let trimmed = input.trim();
    let amount: f64 = trimmed
        .parse()
        .map_err(|_| TrafficError::InvalidAmount(trimmed.to_string()))?;
    validate_amount(amount).map_err(|_| TrafficError::InvalidAmount(trimmed.to_string()))
}
