//! # Pagination Result
//!
//! Derived per response from the paging window, the rows in the current page
//! and the total row count. Never persisted.

use serde::Serialize;

use super::statement::PagingWindow;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub page_size: usize,
    pub offset: usize,
    pub page_rows: usize,
    pub total_rows: usize,
    pub total_pages: usize,
}

impl Pagination {
    pub fn of(window: PagingWindow, page_rows: usize, total_rows: usize) -> Self {
        let total_pages = if total_rows == 0 || window.size() == 0 {
            0
        } else {
            total_rows.div_ceil(window.size())
        };

        Self {
            page_size: window.size(),
            offset: window.offset(),
            page_rows,
            total_rows,
            total_pages,
        }
    }
}
