//! Transfer payload
//!
//! The payload carries the whole state: `trafficData` (records),
//! `categories` and an export `timestamp`. Export never fails. Import is
//! strict about shape but does not cross-check category references.

use std::collections::HashSet;
use std::io::Write;

use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{TrafficError, TrafficResult};
use crate::models::{Category, CategoryId, Record, RecordId};

/// Full state export structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Payload {
    /// All records
    #[serde(rename = "trafficData")]
    pub records: Vec<Record>,

    /// All categories
    pub categories: Vec<Category>,

    /// Export time, ISO-8601 UTC with milliseconds
    pub timestamp: String,
}

/// Snapshot the current state into a payload
pub fn export_state(records: &[Record], categories: &[Category]) -> Payload {
    Payload {
        records: records.to_vec(),
        categories: categories.to_vec(),
        timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
    }
}

/// Write a payload as pretty-printed JSON
pub fn write_json<W: Write>(payload: &Payload, writer: &mut W) -> TrafficResult<()> {
    serde_json::to_writer_pretty(&mut *writer, payload)
        .map_err(|e| TrafficError::Export(e.to_string()))?;
    writeln!(writer).map_err(|e| TrafficError::Export(e.to_string()))?;
    writer
        .flush()
        .map_err(|e| TrafficError::Export(e.to_string()))?;
    Ok(())
}

/// State decoded from an import payload
#[derive(Debug, Clone, PartialEq)]
pub struct ImportedState {
    pub records: Vec<Record>,
    /// `None` when the payload had no `categories` field
    pub categories: Option<Vec<Category>>,
}

impl ImportedState {
    /// Records whose category is in neither the imported nor the existing
    /// registry that will be in effect after the import
    pub fn orphaned_record_ids(&self, existing: &[Category]) -> Vec<RecordId> {
        let registry = self.categories.as_deref().unwrap_or(existing);
        let known: HashSet<&CategoryId> = registry.iter().map(|c| &c.id).collect();

        self.records
            .iter()
            .filter(|r| !known.contains(&r.category_id))
            .map(|r| r.id.clone())
            .collect()
    }

    /// Imported categories that repeat an earlier entry's id or name
    ///
    /// Each entry is described as `id <id>` or `name <name>`, once per
    /// repeated value. Empty when the payload had no categories.
    pub fn duplicate_categories(&self) -> Vec<String> {
        let Some(categories) = &self.categories else {
            return Vec::new();
        };

        let mut ids: HashSet<&CategoryId> = HashSet::new();
        let mut names: HashSet<&str> = HashSet::new();
        let mut reported: Vec<String> = Vec::new();

        for category in categories {
            if !ids.insert(&category.id) {
                let found = format!("id {}", category.id);
                if !reported.contains(&found) {
                    reported.push(found);
                }
            }
            if !names.insert(category.name.as_str()) {
                let found = format!("name {}", category.name);
                if !reported.contains(&found) {
                    reported.push(found);
                }
            }
        }

        reported
    }
}

/// Decode a JSON payload
pub fn import_state(text: &str) -> TrafficResult<ImportedState> {
    let value: Value = serde_json::from_str(text)
        .map_err(|e| TrafficError::MalformedPayload(format!("not valid JSON: {}", e)))?;
    decode_payload(value)
}

/// Validate the payload's shape and decode its collections
pub(crate) fn decode_payload(value: Value) -> TrafficResult<ImportedState> {
    let Value::Object(mut object) = value else {
        return Err(TrafficError::MalformedPayload("expected an object".into()));
    };

    let records = match object.remove("trafficData") {
        Some(data @ Value::Array(_)) => serde_json::from_value::<Vec<Record>>(data)
            .map_err(|e| TrafficError::MalformedPayload(format!("trafficData: {}", e)))?,
        Some(_) => {
            return Err(TrafficError::MalformedPayload(
                "trafficData must be an array".into(),
            ))
        }
        None => return Err(TrafficError::MalformedPayload("missing trafficData".into())),
    };

    let categories = match object.remove("categories") {
        None => None,
        Some(data @ Value::Array(_)) => Some(
            serde_json::from_value::<Vec<Category>>(data)
                .map_err(|e| TrafficError::MalformedPayload(format!("categories: {}", e)))?,
        ),
        Some(_) => {
            return Err(TrafficError::MalformedPayload(
                "categories must be an array".into(),
            ))
        }
    };

    Ok(ImportedState {
        records,
        categories,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Period;

    fn sample() -> (Vec<Record>, Vec<Category>) {
        let work = Category::with_id(CategoryId::from_string("1"), "Work");
        let record = Record::new(work.id.clone(), 12.5, Period::parse("2024-03").unwrap());
        (vec![record], vec![work])
    }

    #[test]
    fn test_export_payload_shape() {
        let (records, categories) = sample();
        let payload = export_state(&records, &categories);

        let value = serde_json::to_value(&payload).unwrap();
        assert!(value["trafficData"].is_array());
        assert_eq!(value["trafficData"][0]["date"], "2024-03");
        assert_eq!(value["trafficData"][0]["category"], "1");
        assert_eq!(value["categories"][0]["name"], "Work");

        // e.g. 2024-03-01T12:00:00.000Z
        let ts = value["timestamp"].as_str().unwrap();
        assert!(ts.ends_with('Z'));
        assert_eq!(ts.len(), 24);
    }

    #[test]
    fn test_json_roundtrip() {
        let (records, categories) = sample();
        let mut buffer = Vec::new();
        write_json(&export_state(&records, &categories), &mut buffer).unwrap();

        let imported = import_state(&String::from_utf8(buffer).unwrap()).unwrap();
        assert_eq!(imported.records, records);
        assert_eq!(imported.categories, Some(categories));
    }

    #[test]
    fn test_import_accepts_legacy_data() {
        let text = r#"{
            "trafficData": [{"id": "1700000000000", "category": "1", "amount": 3, "date": "2023-11"}],
            "categories": [{"id": "1", "name": "工作"}]
        }"#;

        let imported = import_state(text).unwrap();
        assert_eq!(imported.records[0].id.as_str(), "1700000000000");
        assert_eq!(imported.records[0].amount, 3.0);
        assert_eq!(imported.categories.unwrap()[0].name, "工作");
    }

    #[test]
    fn test_import_without_categories() {
        let imported = import_state(r#"{"trafficData": []}"#).unwrap();
        assert!(imported.records.is_empty());
        assert!(imported.categories.is_none());
    }

    #[test]
    fn test_import_rejects_malformed_payloads() {
        for text in [
            "not json",
            "[]",
            r#"{"categories": []}"#,
            r#"{"trafficData": {}}"#,
            r#"{"trafficData": [], "categories": "x"}"#,
            r#"{"trafficData": [], "categories": null}"#,
            r#"{"trafficData": [{"id": "1", "category": "1", "amount": 1, "date": "2024-3"}]}"#,
        ] {
            assert!(
                matches!(import_state(text), Err(TrafficError::MalformedPayload(_))),
                "{} should be rejected",
                text
            );
        }
    }

    #[test]
    fn test_orphaned_record_ids() {
        let text = r#"{"trafficData": [
            {"id": "a", "category": "1", "amount": 1, "date": "2024-01"},
            {"id": "b", "category": "9", "amount": 1, "date": "2024-01"}
        ]}"#;
        let imported = import_state(text).unwrap();
        let existing = vec![Category::with_id(CategoryId::from_string("1"), "Work")];

        let orphans = imported.orphaned_record_ids(&existing);
        assert_eq!(orphans, vec![RecordId::from_string("b")]);
    }

    #[test]
    fn test_duplicate_categories() {
        let text = r#"{"trafficData": [], "categories": [
            {"id": "1", "name": "Work"},
            {"id": "1", "name": "Life"},
            {"id": "2", "name": "Work"},
            {"id": "3", "name": "Work"},
            {"id": "4", "name": "Study"}
        ]}"#;
        let imported = import_state(text).unwrap();
        assert_eq!(
            imported.duplicate_categories(),
            vec!["id 1".to_string(), "name Work".to_string()]
        );

        let clean = import_state(r#"{"trafficData": []}"#).unwrap();
        assert!(clean.duplicate_categories().is_empty());
    }

    struct BrokenPipe;

    impl Write for BrokenPipe {
        fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
            Err(std::io::Error::new(std::io::ErrorKind::BrokenPipe, "closed"))
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Err(std::io::Error::new(std::io::ErrorKind::BrokenPipe, "closed"))
        }
    }

    #[test]
    fn test_write_json_surfaces_buffered_write_errors() {
        let (records, categories) = sample();
        let payload = export_state(&records, &categories);

        // The whole payload fits in the buffer, so only the flush reaches the sink
        let mut writer = std::io::BufWriter::with_capacity(1 << 16, BrokenPipe);
        assert!(matches!(
            write_json(&payload, &mut writer),
            Err(TrafficError::Export(_))
        ));
    }
}
