//! Category display formatting

use tabled::settings::Style;
use tabled::{Table, Tabled};

use crate::models::Category;

#[derive(Tabled)]
struct CategoryRow {
    #[tabled(rename = "#")]
    position: usize,
    #[tabled(rename = "Category")]
    name: String,
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Records")]
    records: usize,
}

/// Format categories as a table, in registry order
///
/// `record_counts` is parallel to `categories`.
pub fn format_category_list(categories: &[Category], record_counts: &[usize]) -> String {
    if categories.is_empty() {
        return "No categories found.\n\nRun 'traffic init' to create default categories.\n"
            .to_string();
    }

    let rows = categories.iter().enumerate().map(|(i, c)| CategoryRow {
        position: i + 1,
        name: c.name.clone(),
        id: c.id.short(),
        records: record_counts.get(i).copied().unwrap_or(0),
    });

    let mut table = Table::new(rows);
    table.with(Style::psql());
    format!("{}\n", table)
}
