//! CLI command handlers
//!
//! This module contains the implementation of CLI commands,
//! bridging the clap argument parsing with the service layer.

pub mod category;
pub mod record;
pub mod report;
pub mod transfer;

pub use category::{handle_category_command, CategoryCommands};
pub use record::{handle_record_command, RecordCommands};
pub use report::{handle_report_command, ReportArgs};
pub use transfer::{
    handle_export_command, handle_import_command, ExportArgs, ExportFormat, ImportArgs,
};
