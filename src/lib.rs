//! traffic-cli - Terminal tracker for categorized monthly traffic
//!
//! This library provides the core of the traffic-cli application: a store
//! of categorized, month-bucketed measurements and an aggregation engine
//! that turns them into listings, per-category totals and monthly or
//! yearly rollups.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - `config`: Configuration and path management
//! - `error`: Custom error types
//! - `models`: Core data models (categories, records, periods)
//! - `storage`: Blob-store backed repositories
//! - `services`: Business logic layer
//! - `reports`: Aggregation engine and pagination
//! - `export`: Transfer payload (JSON/YAML) and CSV export
//! - `display`: Terminal tables
//! - `audit`: Audit logging system
//! - `cli`: Command handlers for the `traffic` binary
//!
//! # Example
//!
//! ```rust,ignore
//! use traffic_cli::reports::{ReportFilter, TrafficReport};
//! use traffic_cli::services::{CategoryService, RecordService};
//! use traffic_cli::storage::Storage;
//!
//! let storage = Storage::in_memory();
//! let work = CategoryService::new(&storage).add_category("Work")?;
//! RecordService::new(&storage).add_record(&work.id, 12.5, "2024-03")?;
//!
//! let report = TrafficReport::from_storage(&storage, ReportFilter::year(2024), "Unknown category")?;
//! println!("{}", report.format_terminal());
//! ```

pub mod audit;
pub mod cli;
pub mod config;
pub mod display;
pub mod error;
pub mod export;
pub mod models;
pub mod reports;
pub mod services;
pub mod storage;

pub use error::{TrafficError, TrafficResult};
