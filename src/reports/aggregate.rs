//! Aggregation engine
//!
//! Pure functions over a slice of records: the filtered listing, the
//! per-category totals and the time-series rollups. None of them touch
//! storage, so the same record set always produces the same result.

use std::collections::HashMap;

use crate::config::settings::DEFAULT_UNKNOWN_CATEGORY_LABEL;
use crate::models::{compare_periods, Category, CategoryId, Record};

use super::filter::Selection;

/// Number of buckets in a yearly series
pub const MONTHS_PER_YEAR: usize = 12;

/// Records matching a selection, newest period first
///
/// The sort is stable, so records sharing a period keep store order.
pub fn filtered_listing(records: &[Record], selection: &Selection) -> Vec<Record> {
    let mut listing: Vec<Record> = records
        .iter()
        .filter(|r| selection.matches(r))
        .cloned()
        .collect();
    listing.sort_by(|a, b| compare_periods(&b.period, &a.period));
    listing
}

/// Sum of one category's matching records
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryTotal {
    pub category_id: CategoryId,
    pub total: f64,
    pub record_count: usize,
}

/// Totals per category over the selection
///
/// Categories without matching records are absent. Entries are ordered by
/// the first matching record of each category in store order.
pub fn category_totals(records: &[Record], selection: &Selection) -> Vec<CategoryTotal> {
    let mut totals: Vec<CategoryTotal> = Vec::new();
    let mut index: HashMap<&CategoryId, usize> = HashMap::new();

    for record in records.iter().filter(|r| selection.matches(r)) {
        match index.get(&record.category_id).copied() {
            Some(i) => {
                totals[i].total += record.amount;
                totals[i].record_count += 1;
            }
            None => {
                index.insert(&record.category_id, totals.len());
                totals.push(CategoryTotal {
                    category_id: record.category_id.clone(),
                    total: record.amount,
                    record_count: 1,
                });
            }
        }
    }

    totals
}

/// One category's value in a single-month rollup
#[derive(Debug, Clone, PartialEq)]
pub struct MonthlySeries {
    pub category_id: CategoryId,
    pub value: f64,
}

/// One category's twelve monthly values (index 0 is January)
#[derive(Debug, Clone, PartialEq)]
pub struct YearlySeries {
    pub category_id: CategoryId,
    pub values: [f64; MONTHS_PER_YEAR],
}

/// Time-series rollup of a report
#[derive(Debug, Clone, PartialEq)]
pub enum Rollup {
    /// One bucket per category for a single period
    Monthly {
        series: Vec<MonthlySeries>,
        /// Sum across categories; `None` when no category has data
        total: Option<f64>,
    },
    /// Twelve buckets per category for a single year
    Yearly {
        series: Vec<YearlySeries>,
        /// Per-month sum across categories; `None` when no category has data
        total: Option<[f64; MONTHS_PER_YEAR]>,
    },
}

impl Rollup {
    /// Single-bucket rollup for the records matching a period selection
    pub fn monthly(records: &[Record], selection: &Selection) -> Self {
        let series: Vec<MonthlySeries> = category_totals(records, selection)
            .into_iter()
            .map(|t| MonthlySeries {
                category_id: t.category_id,
                value: t.total,
            })
            .collect();

        let total = if series.is_empty() {
            None
        } else {
            Some(series.iter().map(|s| s.value).sum())
        };

        Rollup::Monthly { series, total }
    }

    /// Twelve-bucket rollup of one year
    ///
    /// Records from other years do not contribute.
    pub fn yearly(records: &[Record], year: i32) -> Self {
        let mut series: Vec<YearlySeries> = Vec::new();
        let mut index: HashMap<&CategoryId, usize> = HashMap::new();

        for record in records.iter().filter(|r| r.period.year() == year) {
            let i = *index.entry(&record.category_id).or_insert_with(|| {
                series.push(YearlySeries {
                    category_id: record.category_id.clone(),
                    values: [0.0; MONTHS_PER_YEAR],
                });
                series.len() - 1
            });
            series[i].values[record.period.month_index()] += record.amount;
        }

        let total = if series.is_empty() {
            None
        } else {
            let mut sums = [0.0; MONTHS_PER_YEAR];
            for s in &series {
                for (sum, value) in sums.iter_mut().zip(s.values.iter()) {
                    *sum += value;
                }
            }
            Some(sums)
        };

        Rollup::Yearly { series, total }
    }

    /// Number of category series (the synthetic total excluded)
    pub fn series_count(&self) -> usize {
        match self {
            Rollup::Monthly { series, .. } => series.len(),
            Rollup::Yearly { series, .. } => series.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.series_count() == 0
    }
}

/// Total lookup from category ID to display name
///
/// Missing IDs resolve to the placeholder instead of failing.
#[derive(Debug, Clone)]
pub struct CategoryNames {
    names: HashMap<CategoryId, String>,
    placeholder: String,
}

impl CategoryNames {
    pub fn new(categories: &[Category], placeholder: impl Into<String>) -> Self {
        Self {
            names: categories
                .iter()
                .map(|c| (c.id.clone(), c.name.clone()))
                .collect(),
            placeholder: placeholder.into(),
        }
    }

    /// Display name for a category ID
    pub fn resolve(&self, id: &CategoryId) -> &str {
        self.names
            .get(id)
            .map(String::as_str)
            .unwrap_or(&self.placeholder)
    }

    pub fn contains(&self, id: &CategoryId) -> bool {
        self.names.contains_key(id)
    }
}

impl From<&[Category]> for CategoryNames {
    fn from(categories: &[Category]) -> Self {
        Self::new(categories, DEFAULT_UNKNOWN_CATEGORY_LABEL)
    }
}
