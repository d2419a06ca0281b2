//! Service layer for traffic-cli
//!
//! The service layer provides business logic on top of the storage layer:
//! validation before mutation, write-through persistence and audit logging.

pub mod category;
pub mod record;
pub mod transfer;

pub use category::CategoryService;
pub use record::RecordService;
pub use transfer::{ImportSummary, TransferService};
