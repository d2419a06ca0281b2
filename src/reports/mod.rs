//! Reports module for traffic-cli
//!
//! The aggregation engine is a pure read-side projection over the record
//! store: listings, per-category totals, monthly and yearly rollups, and
//! the combined `TrafficReport`.

pub mod aggregate;
pub mod filter;
pub mod pagination;
pub mod traffic;

pub use aggregate::{
    category_totals, filtered_listing, CategoryNames, CategoryTotal, MonthlySeries, Rollup,
    YearlySeries, MONTHS_PER_YEAR,
};
pub use filter::{ReportFilter, Selection, ViewMode};
pub use pagination::{paginate, total_pages, Page};
pub use traffic::{CategoryBreakdown, ReportSummary, TrafficReport};
