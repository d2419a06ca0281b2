//! Report filters
//!
//! A `ReportFilter` is what the user asks for (a year, maybe a month, and a
//! view mode). A `Selection` is the record predicate it boils down to.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{TrafficError, TrafficResult};
use crate::models::{Period, Record};

/// Granularity of a report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    /// A single month
    #[default]
    Month,
    /// Twelve monthly buckets of one year
    Year,
}

impl fmt::Display for ViewMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ViewMode::Month => write!(f, "month"),
            ViewMode::Year => write!(f, "year"),
        }
    }
}

impl FromStr for ViewMode {
    type Err = TrafficError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "month" | "m" => Ok(ViewMode::Month),
            "year" | "y" => Ok(ViewMode::Year),
            other => Err(TrafficError::Config(format!(
                "Unknown view mode '{}' (expected month or year)",
                other
            ))),
        }
    }
}

/// Which records a view covers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection {
    /// Exactly one period
    Period(Period),
    /// One calendar month in any year
    MonthOfYear(u32),
    /// Every month of one year
    Year(i32),
}

impl Selection {
    /// Does this record fall inside the selection?
    pub fn matches(&self, record: &Record) -> bool {
        match self {
            Selection::Period(period) => record.period == *period,
            Selection::MonthOfYear(month) => record.period.month() == *month,
            Selection::Year(year) => record.period.year() == *year,
        }
    }
}

/// Parameters of a report
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportFilter {
    pub year: i32,
    /// Required in month mode, ignored in year mode
    pub month: Option<u32>,
    pub view_mode: ViewMode,
}

impl ReportFilter {
    /// Filter for one month
    pub fn month(year: i32, month: u32) -> Self {
        Self {
            year,
            month: Some(month),
            view_mode: ViewMode::Month,
        }
    }

    /// Filter for a whole year
    pub fn year(year: i32) -> Self {
        Self {
            year,
            month: None,
            view_mode: ViewMode::Year,
        }
    }

    /// Filter covering the period's month
    pub fn for_period(period: Period) -> Self {
        Self::month(period.year(), period.month())
    }

    /// Resolve the filter into a record selection
    pub fn selection(&self) -> TrafficResult<Selection> {
        match self.view_mode {
            ViewMode::Month => {
                let month = self.month.ok_or_else(|| {
                    TrafficError::InvalidPeriod(format!("{:04}-?? (month view needs a month)", self.year))
                })?;
                Ok(Selection::Period(Period::new(self.year, month)?))
            }
            ViewMode::Year => {
                // Validate the year through the same range check as periods
                Period::new(self.year, 1)?;
                Ok(Selection::Year(self.year))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CategoryId;

    fn record(period: &str) -> Record {
        Record::new(CategoryId::from_string("a"), 1.0, Period::parse(period).unwrap())
    }

    #[test]
    fn test_view_mode_parse() {
        assert_eq!("year".parse::<ViewMode>().unwrap(), ViewMode::Year);
        assert_eq!("Month".parse::<ViewMode>().unwrap(), ViewMode::Month);
        assert!("week".parse::<ViewMode>().is_err());
    }

    #[test]
    fn test_month_filter_selects_period() {
        let selection = ReportFilter::month(2024, 3).selection().unwrap();
        assert_eq!(selection, Selection::Period(Period::new(2024, 3).unwrap()));
        assert!(selection.matches(&record("2024-03")));
        assert!(!selection.matches(&record("2023-03")));
    }

    #[test]
    fn test_month_filter_requires_valid_month() {
        let missing = ReportFilter {
            year: 2024,
            month: None,
            view_mode: ViewMode::Month,
        };
        assert!(matches!(missing.selection(), Err(TrafficError::InvalidPeriod(_))));
        assert!(matches!(
            ReportFilter::month(2024, 13).selection(),
            Err(TrafficError::InvalidPeriod(_))
        ));
    }

    #[test]
    fn test_year_filter_ignores_month() {
        let filter = ReportFilter {
            year: 2024,
            month: Some(7),
            view_mode: ViewMode::Year,
        };
        let selection = filter.selection().unwrap();
        assert!(selection.matches(&record("2024-01")));
        assert!(!selection.matches(&record("2025-01")));
    }

    #[test]
    fn test_month_of_year_matches_across_years() {
        let selection = Selection::MonthOfYear(3);
        assert!(selection.matches(&record("2023-03")));
        assert!(selection.matches(&record("2024-03")));
        assert!(!selection.matches(&record("2024-04")));
    }
}
