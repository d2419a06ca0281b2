//! CLI commands for export and import
//!
//! Export writes the transfer payload as JSON or YAML. Import reads either
//! back and replaces the stored state.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use clap::{Args, ValueEnum};

use crate::error::{TrafficError, TrafficResult};
use crate::export::{import_state, import_yaml_state, write_json, write_yaml};
use crate::services::TransferService;
use crate::storage::Storage;

/// Export format options
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ExportFormat {
    /// JSON transfer payload
    Json,
    /// The same payload as YAML
    Yaml,
}

impl ExportFormat {
    /// Guess the format from a file extension, JSON by default
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml") => {
                ExportFormat::Yaml
            }
            _ => ExportFormat::Json,
        }
    }
}

/// Export arguments
#[derive(Args, Debug)]
pub struct ExportArgs {
    /// Output file path
    pub output: PathBuf,

    /// Export format (guessed from the file extension when omitted)
    #[arg(short, long, value_enum)]
    pub format: Option<ExportFormat>,
}

/// Import arguments
#[derive(Args, Debug)]
pub struct ImportArgs {
    /// File previously written by `traffic export`
    pub input: PathBuf,
}

/// Handle the export command
pub fn handle_export_command(storage: &Storage, args: ExportArgs) -> TrafficResult<()> {
    let payload = TransferService::new(storage).export()?;
    let format = args
        .format
        .unwrap_or_else(|| ExportFormat::from_path(&args.output));

    let file = File::create(&args.output).map_err(|e| {
        TrafficError::Export(format!(
            "Failed to create file {}: {}",
            args.output.display(),
            e
        ))
    })?;
    let mut writer = BufWriter::new(file);

    match format {
        ExportFormat::Json => write_json(&payload, &mut writer)?,
        ExportFormat::Yaml => write_yaml(&payload, &mut writer)?,
    }
    writer.flush().map_err(|e| {
        TrafficError::Export(format!("Failed to write {}: {}", args.output.display(), e))
    })?;

    println!(
        "Exported {} records and {} categories to: {}",
        payload.records.len(),
        payload.categories.len(),
        args.output.display()
    );
    Ok(())
}

/// Handle the import command
pub fn handle_import_command(storage: &Storage, args: ImportArgs) -> TrafficResult<()> {
    let text = std::fs::read_to_string(&args.input).map_err(|e| {
        TrafficError::Io(format!("Failed to read {}: {}", args.input.display(), e))
    })?;

    let state = match ExportFormat::from_path(&args.input) {
        ExportFormat::Json => import_state(&text)?,
        ExportFormat::Yaml => import_yaml_state(&text)?,
    };

    let summary = TransferService::new(storage).apply_import(state)?;

    println!(
        "Imported {} records (replaced {})",
        summary.records_imported, summary.records_replaced
    );
    match summary.categories_imported {
        Some(count) => println!("Imported {} categories", count),
        None => println!("Categories unchanged (payload has none)"),
    }
    if !summary.orphaned.is_empty() {
        println!(
            "Warning: {} record(s) reference categories that do not exist",
            summary.orphaned.len()
        );
    }
    if !summary.duplicate_categories.is_empty() {
        println!(
            "Warning: imported categories repeat {}",
            summary.duplicate_categories.join(", ")
        );
    }

    Ok(())
}
