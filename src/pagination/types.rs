//! Pagination types
//!
//! Defines the page-number configuration, the walk state machine and the
//! decoded page.

use crate::types::JsonObject;

/// Default number of rows requested per page
pub const DEFAULT_PAGE_SIZE: u32 = 100;

/// Response header carrying the total page count
pub const TOTAL_PAGES_HEADER: &str = "X-WP-TotalPages";

/// Page-number pagination settings
///
/// Every request carries `?{page_param}=N&{page_size_param}={page_size}`.
/// The total page count comes from `total_pages_header`, defaulting to 1
/// when the header is absent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaginationConfig {
    /// Query parameter name for the page number
    pub page_param: String,
    /// Query parameter name for the page size
    pub page_size_param: String,
    /// Page size value
    pub page_size: u32,
    /// Header holding the total page count
    pub total_pages_header: String,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            page_param: "page".to_string(),
            page_size_param: "per_page".to_string(),
            page_size: DEFAULT_PAGE_SIZE,
            total_pages_header: TOTAL_PAGES_HEADER.to_string(),
        }
    }
}

impl PaginationConfig {
    /// Create the default WordPress REST pagination config
    pub fn new() -> Self {
        Self::default()
    }

    /// Set page size parameter and value
    #[must_use]
    pub fn with_page_size(mut self, param: impl Into<String>, size: u32) -> Self {
        self.page_size_param = param.into();
        self.page_size = size;
        self
    }
}

/// Walk state machine
///
/// A walk starts in `Fetching { page: 1 }` and moves to `Done` once the
/// page just fetched is the last one. There is no way back: a walk is
/// restartable only by starting a new one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageCursor {
    /// The next request will fetch this page
    Fetching {
        /// 1-based page number
        page: u32,
    },
    /// No more pages
    Done,
}

impl PageCursor {
    /// The initial state of every walk
    pub fn start() -> Self {
        Self::Fetching { page: 1 }
    }

    /// Check if the walk is finished
    pub fn is_done(&self) -> bool {
        matches!(self, Self::Done)
    }
}

/// One decoded page of rows
#[derive(Debug, Clone, PartialEq)]
pub struct Page {
    /// Rows in response order
    pub rows: Vec<JsonObject>,
    /// 1-based page index
    pub page: u32,
    /// Total page count reported by the server
    pub total_pages: u32,
}

impl Page {
    /// State after consuming this page
    ///
    /// Termination depends only on the page cursor: an empty page before the
    /// last one does not end the walk.
    pub fn next_cursor(&self) -> PageCursor {
        if self.page < self.total_pages {
            PageCursor::Fetching {
                page: self.page + 1,
            }
        } else {
            PageCursor::Done
        }
    }
}
