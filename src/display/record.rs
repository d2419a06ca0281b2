//! Record display formatting
//!
//! Listing tables and single-record details. Category names always go
//! through `CategoryNames`, so orphaned records still render.

use tabled::settings::object::Columns;
use tabled::settings::{Alignment, Style};
use tabled::{Table, Tabled};

use crate::models::Record;
use crate::reports::{CategoryNames, Page};

#[derive(Tabled)]
struct RecordRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Period")]
    period: String,
    #[tabled(rename = "Category")]
    category: String,
    #[tabled(rename = "Amount")]
    amount: String,
}

/// Format a page of records as a table with a page footer
pub fn format_record_page(page: &Page<Record>, names: &CategoryNames) -> String {
    if page.total_items == 0 {
        return "No records found.\n".to_string();
    }

    let mut output = String::new();
    if page.items.is_empty() {
        output.push_str("(no records on this page)\n");
    } else {
        output.push_str(&format_record_table(&page.items, names));
    }
    output.push_str(&page.footer());
    output.push('\n');
    if !page.is_last() {
        output.push_str(&format!("Next page: --page {}\n", page.page_number + 1));
    }
    output
}

/// Format records as a table
pub fn format_record_table(records: &[Record], names: &CategoryNames) -> String {
    let rows = records.iter().map(|r| RecordRow {
        id: r.id.short(),
        period: r.period.to_string(),
        category: names.resolve(&r.category_id).to_string(),
        amount: format!("{:.2}", r.amount),
    });

    let mut table = Table::new(rows);
    table
        .with(Style::psql())
        .modify(Columns::last(), Alignment::right());
    format!("{}\n", table)
}

/// Format record details
pub fn format_record_details(record: &Record, names: &CategoryNames) -> String {
    let mut output = String::new();

    output.push_str(&format!("Record:    {}\n", record.id));
    output.push_str(&format!("Period:    {}\n", record.period));
    output.push_str(&format!(
        "Category:  {}\n",
        names.resolve(&record.category_id)
    ));
    output.push_str(&format!("Amount:    {:.2}\n", record.amount));

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Category, CategoryId, Period};

    fn names() -> CategoryNames {
        CategoryNames::new(
            &[Category::with_id(CategoryId::from_string("1"), "Work")],
            "Unknown category",
        )
    }

    fn record(category: &str) -> Record {
        Record::new(
            CategoryId::from_string(category),
            7.25,
            Period::parse("2024-05").unwrap(),
        )
    }

    #[test]
    fn test_record_table_resolves_names() {
        let output = format_record_table(&[record("1"), record("2")], &names());
        assert!(output.contains("Work"));
        assert!(output.contains("Unknown category"));
        assert!(output.contains("7.25"));
        assert!(output.contains("2024-05"));
    }

    #[test]
    fn test_record_page() {
        let records: Vec<Record> = (0..3).map(|_| record("1")).collect();

        let first = Page::of(&records, 2, 1).unwrap();
        assert!(format_record_page(&first, &names())
            .ends_with("Page 1 of 2 (3 records)\nNext page: --page 2\n"));

        let page = Page::of(&records, 2, 2).unwrap();
        let output = format_record_page(&page, &names());
        assert!(output.ends_with("Page 2 of 2 (3 records)\n"));
        assert!(!output.contains("Next page"));

        let past_end = Page::of(&records, 2, 5).unwrap();
        assert!(format_record_page(&past_end, &names()).contains("no records on this page"));

        let empty = Page::of(&[] as &[Record], 2, 1).unwrap();
        assert_eq!(format_record_page(&empty, &names()), "No records found.\n");
    }

    #[test]
    fn test_record_details() {
        let rec = record("1");
        let output = format_record_details(&rec, &names());
        assert!(output.contains(rec.id.as_str()));
        assert!(output.contains("Category:  Work"));
    }
}
