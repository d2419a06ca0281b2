//! Listing pagination
//!
//! Pages are 1-based. A page past the end is empty rather than an error.

use crate::error::{TrafficError, TrafficResult};

/// Number of pages needed for `len` items; never less than one
pub fn total_pages(len: usize, page_size: usize) -> usize {
    if page_size == 0 {
        return 1;
    }
    len.div_ceil(page_size).max(1)
}

/// Slice out one page of `items`
pub fn paginate<T>(items: &[T], page_size: usize, page_number: usize) -> TrafficResult<&[T]> {
    if page_size == 0 {
        return Err(TrafficError::InvalidPage("page size must be at least 1".into()));
    }
    if page_number < 1 {
        return Err(TrafficError::InvalidPage(format!(
            "page {} (pages start at 1)",
            page_number
        )));
    }

    let start = (page_number - 1).saturating_mul(page_size);
    if start >= items.len() {
        return Ok(&items[items.len()..]);
    }
    let end = start.saturating_add(page_size).min(items.len());
    Ok(&items[start..end])
}

/// One page of a listing with its position
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page_number: usize,
    pub total_pages: usize,
    pub total_items: usize,
}

impl<T: Clone> Page<T> {
    pub fn of(items: &[T], page_size: usize, page_number: usize) -> TrafficResult<Self> {
        let slice = paginate(items, page_size, page_number)?;
        Ok(Self {
            items: slice.to_vec(),
            page_number,
            total_pages: total_pages(items.len(), page_size),
            total_items: items.len(),
        })
    }
}

impl<T> Page<T> {
    pub fn is_last(&self) -> bool {
        self.page_number >= self.total_pages
    }

    /// Footer line such as `Page 2 of 3 (25 records)`
    pub fn footer(&self) -> String {
        format!(
            "Page {} of {} ({} record{})",
            self.page_number,
            self.total_pages,
            self.total_items,
            if self.total_items == 1 { "" } else { "s" }
        )
    }
}
