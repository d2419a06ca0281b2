//! Export module for traffic-cli
//!
//! - JSON: the transfer payload (`trafficData`, `categories`, `timestamp`)
//! - YAML: the same payload for human-readable backups
//! - CSV: record listings (reports export their own CSV)

pub mod csv;
pub mod json;
pub mod yaml;

pub use csv::export_records_csv;
pub use json::{export_state, import_state, write_json, ImportedState, Payload};
pub use yaml::{import_yaml_state, write_yaml};
