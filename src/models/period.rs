//! Period keys
//!
//! A period is a calendar month written as `YYYY-MM`. It is the bucket key
//! for every record. The string form sorts lexicographically in the same
//! order as the months sort chronologically, and `Period`'s derived `Ord`
//! on `(year, month)` keeps that property.

use chrono::Datelike;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use crate::error::TrafficError;

/// A `YYYY-MM` month bucket
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Period {
    year: i32,
    month: u32,
}

impl Period {
    /// Create a period, validating the month and the four-digit year
    pub fn new(year: i32, month: u32) -> Result<Self, TrafficError> {
        if !(1..=12).contains(&month) {
            return Err(TrafficError::InvalidPeriod(format!(
                "month {} is out of range 1-12",
                month
            )));
        }
        if !(0..=9999).contains(&year) {
            return Err(TrafficError::InvalidPeriod(format!(
                "year {} does not have four digits",
                year
            )));
        }
        Ok(Self { year, month })
    }

    /// Parse a strict `YYYY-MM` string
    pub fn parse(s: &str) -> Result<Self, TrafficError> {
        let invalid = || TrafficError::InvalidPeriod(s.to_string());

        let bytes = s.as_bytes();
        if bytes.len() != 7 || bytes[4] != b'-' {
            return Err(invalid());
        }
        if !bytes[..4].iter().chain(&bytes[5..]).all(u8::is_ascii_digit) {
            return Err(invalid());
        }

        let year: i32 = s[..4].parse().map_err(|_| invalid())?;
        let month: u32 = s[5..].parse().map_err(|_| invalid())?;
        if !(1..=12).contains(&month) {
            return Err(invalid());
        }

        Ok(Self { year, month })
    }

    /// The current month in local time
    pub fn current() -> Self {
        let today = chrono::Local::now().date_naive();
        Self {
            year: today.year(),
            month: today.month(),
        }
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    /// Zero-based month index (January = 0)
    pub fn month_index(&self) -> usize {
        (self.month - 1) as usize
    }

    /// The following month
    ///
    /// Fails past `9999-12`, which has no four-digit successor.
    pub fn next(&self) -> Result<Self, TrafficError> {
        match self.month {
            12 => Self::new(self.year + 1, 1),
            m => Self::new(self.year, m + 1),
        }
    }

    /// The preceding month
    ///
    /// Fails before `0000-01`.
    pub fn prev(&self) -> Result<Self, TrafficError> {
        match self.month {
            1 => Self::new(self.year - 1, 12),
            m => Self::new(self.year, m - 1),
        }
    }
}

/// Format a year and month as a `YYYY-MM` key
pub fn format_period(year: i32, month: u32) -> Result<String, TrafficError> {
    Period::new(year, month).map(|p| p.to_string())
}

/// Chronological comparison of two periods
pub fn compare_periods(a: &Period, b: &Period) -> Ordering {
    a.cmp(b)
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl FromStr for Period {
    type Err = TrafficError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Period {
    type Error = TrafficError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Period> for String {
    fn from(period: Period) -> Self {
        period.to_string()
    }
}
