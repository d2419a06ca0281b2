//! Audit logging for traffic-cli
//!
//! Records every create, update, delete and import with before/after values
//! in an append-only JSONL file next to the data directory.
//!
//! - `AuditEntry`: one logged operation.
//! - `AuditLogger`: appends entries to the log and reads them back.

mod entry;
mod logger;

pub use entry::{AuditEntry, EntityType, Operation};
pub use logger::AuditLogger;
