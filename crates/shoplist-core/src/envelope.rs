//! Pagination envelope
//!
//! Listing endpoints wrap their results as:
//!
//! ```text
//! { data: T[], pagination?: { page, per_page, total, total_pages, has_prev, has_next } }
//! ```

use serde::{Deserialize, Serialize};

/// Pagination metadata returned alongside a page
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Pagination {
    pub page: u32,
    pub per_page: u32,
    pub total: u64,
    pub total_pages: u32,
    pub has_prev: bool,
    pub has_next: bool,
}

/// One page of a listing
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Page<T> {
    pub data: Vec<T>,
    #[serde(default)]
    pub pagination: Option<Pagination>,
}

impl<T> Page<T> {
    /// Whether the server reports another page after this one
    ///
    /// A response without pagination metadata is treated as the last page.
    pub fn has_next(&self) -> bool {
        self.pagination.map(|p| p.has_next).unwrap_or(false)
    }

    /// Total entity count reported by the server
    pub fn total(&self) -> Option<u64> {
        self.pagination.map(|p| p.total)
    }
}
