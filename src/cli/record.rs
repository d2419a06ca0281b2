//! Record CLI commands
//!
//! Add, edit, delete and list traffic records.

use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;

use clap::Subcommand;

use crate::config::settings::Settings;
use crate::display::{format_record_details, format_record_page};
use crate::error::{TrafficError, TrafficResult};
use crate::export::export_records_csv;
use crate::models::{compare_periods, parse_amount, Period, Record};
use crate::reports::{filtered_listing, CategoryNames, Page, Selection};
use crate::services::{CategoryService, RecordService};
use crate::storage::Storage;

/// Record subcommands
#[derive(Subcommand, Debug)]
pub enum RecordCommands {
    /// Add a record
    Add {
        /// Category name or ID
        category: String,
        /// Amount (a positive number)
        #[arg(allow_hyphen_values = true)]
        amount: String,
        /// Period (YYYY-MM, defaults to the current month)
        #[arg(short, long)]
        period: Option<String>,
    },

    /// Change fields of a record
    Edit {
        /// Record ID
        id: String,
        /// New category name or ID
        #[arg(short, long)]
        category: Option<String>,
        /// New amount
        #[arg(short, long, allow_hyphen_values = true)]
        amount: Option<String>,
        /// New period (YYYY-MM)
        #[arg(short, long)]
        period: Option<String>,
    },

    /// Delete a record
    #[command(alias = "rm")]
    Delete {
        /// Record ID
        id: String,
    },

    /// Show one record
    Show {
        /// Record ID
        id: String,
    },

    /// List records, newest first
    #[command(alias = "ls")]
    List {
        /// Only records of this period (YYYY-MM)
        #[arg(short, long, conflicts_with = "month")]
        period: Option<String>,
        /// Only records of this calendar month (1-12), any year
        #[arg(short, long)]
        month: Option<u32>,
        /// Page number, starting at 1
        #[arg(long, default_value = "1")]
        page: usize,
        /// Records per page (defaults to the configured page size)
        #[arg(long)]
        page_size: Option<usize>,
        /// Write the whole listing to a CSV file instead of printing a page
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

/// Handle a record command
pub fn handle_record_command(
    storage: &Storage,
    settings: &Settings,
    cmd: RecordCommands,
) -> TrafficResult<()> {
    let service = RecordService::new(storage);
    let categories = CategoryService::new(storage);

    match cmd {
        RecordCommands::Add {
            category,
            amount,
            period,
        } => {
            let category_id = categories
                .find_category(&category)?
                .map(|c| c.id)
                .ok_or_else(|| TrafficError::UnknownCategory(category.clone()))?;
            let amount = parse_amount(&amount)?;
            let period = period.unwrap_or_else(|| Period::current().to_string());

            let record = service.add_record(&category_id, amount, &period)?;
            println!(
                "Added record {}: {:.2} to {} for {}",
                record.id.short(),
                record.amount,
                category,
                record.period
            );
        }

        RecordCommands::Edit {
            id,
            category,
            amount,
            period,
        } => {
            let existing = service.require_record(&id)?;

            if category.is_none() && amount.is_none() && period.is_none() {
                println!("No changes specified. Use --category, --amount, or --period.");
                return Ok(());
            }

            let category_id = match category {
                Some(c) => categories
                    .find_category(&c)?
                    .map(|cat| cat.id)
                    .ok_or(TrafficError::UnknownCategory(c))?,
                None => existing.category_id.clone(),
            };
            let amount = match amount {
                Some(a) => parse_amount(&a)?,
                None => existing.amount,
            };
            let period = period.unwrap_or_else(|| existing.period.to_string());

            let updated = service.update_record(&existing.id, &category_id, amount, &period)?;
            println!("Updated record {}", updated.id.short());
        }

        RecordCommands::Delete { id } => {
            let record = service.require_record(&id)?;
            service.delete_record(&record.id)?;
            println!("Deleted record {}", record.id.short());
        }

        RecordCommands::Show { id } => {
            let record = service.require_record(&id)?;
            let names = names(storage, settings)?;
            print!("{}", format_record_details(&record, &names));
        }

        RecordCommands::List {
            period,
            month,
            page,
            page_size,
            output,
        } => {
            let records = service.list_records()?;
            let listing = list_selection(&records, period.as_deref(), month)?;
            let names = names(storage, settings)?;

            if let Some(path) = output {
                let file = File::create(&path).map_err(|e| {
                    TrafficError::Export(format!("Failed to create file {}: {}", path.display(), e))
                })?;
                export_records_csv(&listing, &names, BufWriter::new(file))?;
                println!("Exported {} records to: {}", listing.len(), path.display());
                return Ok(());
            }

            let page_size = page_size.unwrap_or(settings.page_size);
            let page = Page::of(&listing, page_size, page)?;
            print!("{}", format_record_page(&page, &names));
        }
    }

    Ok(())
}

/// Apply the listing filters, newest period first
fn list_selection(
    records: &[Record],
    period: Option<&str>,
    month: Option<u32>,
) -> TrafficResult<Vec<Record>> {
    let selection = match (period, month) {
        (Some(p), _) => Some(Selection::Period(Period::parse(p)?)),
        (None, Some(m)) if (1..=12).contains(&m) => Some(Selection::MonthOfYear(m)),
        (None, Some(m)) => {
            return Err(TrafficError::InvalidPeriod(format!("month {}", m)));
        }
        (None, None) => None,
    };

    Ok(match selection {
        Some(selection) => filtered_listing(records, &selection),
        None => {
            let mut all = records.to_vec();
            all.sort_by(|a, b| compare_periods(&b.period, &a.period));
            all
        }
    })
}

fn names(storage: &Storage, settings: &Settings) -> TrafficResult<CategoryNames> {
    let categories = storage.categories.get_all()?;
    Ok(CategoryNames::new(
        &categories,
        settings.unknown_category_label.as_str(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CategoryId;

    fn record(period: &str) -> Record {
        Record::new(CategoryId::from_string("a"), 1.0, Period::parse(period).unwrap())
    }

    #[test]
    fn test_list_selection() {
        let records = vec![record("2023-03"), record("2024-01"), record("2024-03")];

        let all = list_selection(&records, None, None).unwrap();
        let periods: Vec<String> = all.iter().map(|r| r.period.to_string()).collect();
        assert_eq!(periods, vec!["2024-03", "2024-01", "2023-03"]);

        assert_eq!(list_selection(&records, Some("2024-03"), None).unwrap().len(), 1);
        assert_eq!(list_selection(&records, None, Some(3)).unwrap().len(), 2);
        assert!(list_selection(&records, None, Some(13)).is_err());
        assert!(list_selection(&records, Some("2024-3"), None).is_err());
    }
}
