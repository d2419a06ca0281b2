//! YAML export
//!
//! The same payload as the JSON export, in a form meant to be read by
//! people. It can be imported back.

use std::io::Write;

use serde_json::Value;

use crate::error::{TrafficError, TrafficResult};

use super::json::{decode_payload, ImportedState, Payload};

/// Write a payload as YAML with a short header comment
pub fn write_yaml<W: Write>(payload: &Payload, writer: &mut W) -> TrafficResult<()> {
    let export_err = |e: std::io::Error| TrafficError::Export(e.to_string());

    writeln!(writer, "# traffic-cli export").map_err(export_err)?;
    writeln!(writer, "# Generated: {}", payload.timestamp).map_err(export_err)?;
    writeln!(writer).map_err(export_err)?;

    serde_yaml::to_writer(&mut *writer, payload)
        .map_err(|e| TrafficError::Export(e.to_string()))?;
    writer.flush().map_err(export_err)?;
    Ok(())
}

/// Decode a YAML payload
pub fn import_yaml_state(text: &str) -> TrafficResult<ImportedState> {
    let value: Value = serde_yaml::from_str(text)
        .map_err(|e| TrafficError::MalformedPayload(format!("not valid YAML: {}", e)))?;
    decode_payload(value)
}
