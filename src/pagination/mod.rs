//! Pagination module
//!
//! WordPress REST collections are paged by number: `?page=N&per_page=M`,
//! with the page count in the `X-WP-TotalPages` response header.
//!
//! # Overview
//!
//! [`Paginator::walk`] renders a resource path from an extraction context
//! and lazily yields every row of every page, in order.

mod paginator;
mod types;

pub use paginator::Paginator;
pub use types::{
    Page, PageCursor, PaginationConfig, DEFAULT_PAGE_SIZE, TOTAL_PAGES_HEADER,
};
