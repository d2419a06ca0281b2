//! Traffic Report
//!
//! Combines the category breakdown, the time-series rollup and a summary
//! for one filter into a single report that renders to text or CSV.

use std::io::Write;

use crate::error::{TrafficError, TrafficResult};
use crate::models::{Category, CategoryId, Period, Record};
use crate::storage::Storage;

use super::aggregate::{category_totals, CategoryNames, Rollup, MONTHS_PER_YEAR};
use super::filter::{ReportFilter, Selection, ViewMode};

const MONTH_LABELS: [&str; MONTHS_PER_YEAR] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// One row of the per-category breakdown
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryBreakdown {
    pub category_id: CategoryId,
    pub category_name: String,
    pub total: f64,
    pub record_count: usize,
    /// Share of the grand total
    pub percentage: f64,
}

/// Headline numbers of a report
#[derive(Debug, Clone, PartialEq)]
pub struct ReportSummary {
    pub grand_total: f64,
    pub record_count: usize,
    /// Mean amount per record (0 when there are none)
    pub mean_per_record: f64,
    /// Bucket with the largest total
    pub peak: Option<(Period, f64)>,
    /// Category with the largest total
    pub top_category: Option<(String, f64)>,
}

/// Traffic report for one filter
#[derive(Debug, Clone)]
pub struct TrafficReport {
    pub filter: ReportFilter,
    pub breakdown: Vec<CategoryBreakdown>,
    pub rollup: Rollup,
    pub summary: ReportSummary,
    names: CategoryNames,
}

impl TrafficReport {
    /// Build a report from a record set and the category registry
    pub fn generate(
        records: &[Record],
        categories: &[Category],
        filter: ReportFilter,
        placeholder: &str,
    ) -> TrafficResult<Self> {
        let selection = filter.selection()?;
        let names = CategoryNames::new(categories, placeholder);

        let totals = category_totals(records, &selection);
        let grand_total: f64 = totals.iter().map(|t| t.total).sum();
        let record_count: usize = totals.iter().map(|t| t.record_count).sum();

        let breakdown: Vec<CategoryBreakdown> = totals
            .into_iter()
            .map(|t| CategoryBreakdown {
                category_name: names.resolve(&t.category_id).to_string(),
                percentage: if grand_total > 0.0 {
                    t.total / grand_total * 100.0
                } else {
                    0.0
                },
                category_id: t.category_id,
                total: t.total,
                record_count: t.record_count,
            })
            .collect();

        let rollup = match selection {
            Selection::Year(year) => Rollup::yearly(records, year),
            other => Rollup::monthly(records, &other),
        };

        let peak = match (&rollup, selection) {
            (Rollup::Yearly { total: Some(sums), .. }, Selection::Year(year)) => sums
                .iter()
                .enumerate()
                .fold(None, |best: Option<(usize, f64)>, (i, &v)| match best {
                    Some((_, b)) if b >= v => best,
                    _ => Some((i, v)),
                })
                .map(|(i, v)| Period::new(year, i as u32 + 1).map(|p| (p, v)))
                .transpose()?,
            (Rollup::Monthly { total: Some(sum), .. }, Selection::Period(period)) => {
                Some((period, *sum))
            }
            _ => None,
        };

        let top_category = breakdown
            .iter()
            .fold(None, |best: Option<&CategoryBreakdown>, row| match best {
                Some(b) if b.total >= row.total => best,
                _ => Some(row),
            })
            .map(|row| (row.category_name.clone(), row.total));

        let summary = ReportSummary {
            grand_total,
            record_count,
            mean_per_record: if record_count > 0 {
                grand_total / record_count as f64
            } else {
                0.0
            },
            peak,
            top_category,
        };

        Ok(Self {
            filter,
            breakdown,
            rollup,
            summary,
            names,
        })
    }

    /// Build a report from the current storage state
    pub fn from_storage(
        storage: &Storage,
        filter: ReportFilter,
        placeholder: &str,
    ) -> TrafficResult<Self> {
        let records = storage.records.get_all()?;
        let categories = storage.categories.get_all()?;
        Self::generate(&records, &categories, filter, placeholder)
    }

    /// Title of the window this report covers
    pub fn title(&self) -> String {
        match (self.filter.view_mode, self.filter.month) {
            (ViewMode::Month, Some(month)) => format!("{:04}-{:02}", self.filter.year, month),
            _ => format!("{:04}", self.filter.year),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.breakdown.is_empty()
    }

    /// Format the report for terminal display
    pub fn format_terminal(&self) -> String {
        let mut output = String::new();

        output.push_str(&format!("Traffic Report: {}\n", self.title()));
        output.push_str(&"=".repeat(60));
        output.push('\n');

        if self.is_empty() {
            output.push_str("No records in this period.\n");
            return output;
        }

        output.push_str(&format!("Total:            {:.2}\n", self.summary.grand_total));
        output.push_str(&format!("Records:          {}\n", self.summary.record_count));
        output.push_str(&format!("Mean per record:  {:.2}\n", self.summary.mean_per_record));
        if let Some((period, value)) = &self.summary.peak {
            output.push_str(&format!("Peak month:       {} ({:.2})\n", period, value));
        }
        if let Some((name, value)) = &self.summary.top_category {
            output.push_str(&format!("Top category:     {} ({:.2})\n", name, value));
        }
        output.push('\n');

        output.push_str(&format!(
            "{:<25} {:>12} {:>8} {:>8}\n",
            "Category", "Total", "Records", "%"
        ));
        output.push_str(&"-".repeat(60));
        output.push('\n');
        for row in &self.breakdown {
            output.push_str(&format!(
                "{:<25} {:>12.2} {:>8} {:>7.1}%\n",
                row.category_name, row.total, row.record_count, row.percentage
            ));
        }

        if let Rollup::Yearly { series, total } = &self.rollup {
            output.push('\n');
            output.push_str(&format!("{:<15}", "By month"));
            for label in MONTH_LABELS {
                output.push_str(&format!(" {:>8}", label));
            }
            output.push('\n');

            for s in series {
                output.push_str(&format!("{:<15}", truncate(self.names.resolve(&s.category_id), 15)));
                for value in &s.values {
                    output.push_str(&format!(" {:>8.2}", value));
                }
                output.push('\n');
            }
            if let Some(sums) = total {
                output.push_str(&format!("{:<15}", "TOTAL"));
                for value in sums {
                    output.push_str(&format!(" {:>8.2}", value));
                }
                output.push('\n');
            }
        }

        output
    }

    /// Export the report to CSV format
    ///
    /// Month reports have one row per category; year reports have one
    /// column per month.
    pub fn export_csv<W: Write>(&self, writer: W) -> TrafficResult<()> {
        let mut wtr = csv::Writer::from_writer(writer);
        let export_err = |e: csv::Error| TrafficError::Export(e.to_string());

        match &self.rollup {
            Rollup::Monthly { series, total } => {
                wtr.write_record(["Period", "Category", "Amount", "Records", "Percentage"])
                    .map_err(export_err)?;
                let title = self.title();
                for (s, row) in series.iter().zip(&self.breakdown) {
                    wtr.write_record([
                        title.clone(),
                        self.names.resolve(&s.category_id).to_string(),
                        format!("{:.2}", s.value),
                        row.record_count.to_string(),
                        format!("{:.2}", row.percentage),
                    ])
                    .map_err(export_err)?;
                }
                if let Some(sum) = total {
                    wtr.write_record([
                        title,
                        "TOTAL".to_string(),
                        format!("{:.2}", sum),
                        self.summary.record_count.to_string(),
                        "100.00".to_string(),
                    ])
                    .map_err(export_err)?;
                }
            }
            Rollup::Yearly { series, total } => {
                let mut header = vec!["Category".to_string()];
                header.extend(MONTH_LABELS.iter().map(|m| m.to_string()));
                header.push("Total".to_string());
                wtr.write_record(&header).map_err(export_err)?;

                for s in series {
                    let mut row = vec![self.names.resolve(&s.category_id).to_string()];
                    row.extend(s.values.iter().map(|v| format!("{:.2}", v)));
                    row.push(format!("{:.2}", s.values.iter().sum::<f64>()));
                    wtr.write_record(&row).map_err(export_err)?;
                }
                if let Some(sums) = total {
                    let mut row = vec!["TOTAL".to_string()];
                    row.extend(sums.iter().map(|v| format!("{:.2}", v)));
                    row.push(format!("{:.2}", self.summary.grand_total));
                    wtr.write_record(&row).map_err(export_err)?;
                }
            }
        }

        wtr.flush()
            .map_err(|e| TrafficError::Export(e.to_string()))?;
        Ok(())
    }
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let mut out: String = s.chars().take(max - 1).collect();
        out.push('~');
        out
    }
}
