//! Display formatting for terminal output
//!
//! Listings are rendered as `tabled` tables; reports format themselves.

pub mod category;
pub mod record;

pub use category::format_category_list;
pub use record::{format_record_details, format_record_page, format_record_table};
