//! Core data models for traffic-cli
//!
//! This module contains the data structures of the traffic domain:
//! categories, records and the `YYYY-MM` period keys records are bucketed by.

pub mod category;
pub mod ids;
pub mod period;
pub mod record;

pub use category::{Category, DefaultCategory};
pub use ids::{CategoryId, RecordId};
pub use period::{compare_periods, format_period, Period};
pub use record::{parse_amount, validate_amount, Record};
