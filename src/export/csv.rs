//! CSV export of record listings

use std::io::Write;

use crate::error::{TrafficError, TrafficResult};
use crate::models::Record;
use crate::reports::CategoryNames;

/// Write records as CSV, one row per record, in the order given
pub fn export_records_csv<W: Write>(
    records: &[Record],
    names: &CategoryNames,
    writer: W,
) -> TrafficResult<()> {
    let mut wtr = csv::Writer::from_writer(writer);

    wtr.write_record(["ID", "Period", "Category", "Amount"])
        .map_err(|e| TrafficError::Export(e.to_string()))?;

    for record in records {
        wtr.write_record([
            record.id.to_string(),
            record.period.to_string(),
            names.resolve(&record.category_id).to_string(),
            format!("{:.2}", record.amount),
        ])
        .map_err(|e| TrafficError::Export(e.to_string()))?;
    }

    wtr.flush().map_err(|e| TrafficError::Export(e.to_string()))?;
    Ok(())
}
