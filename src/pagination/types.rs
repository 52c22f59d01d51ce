//! Pagination types and traits
//!
//! Defines the cursor abstractions shared by all strategies.

use std::collections::BTreeMap;

/// Result of the next page computation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NextPage {
    /// More pages may exist; request the next one with these parameters
    Continue {
        /// Query parameters to add/replace
        query_params: BTreeMap<String, String>,
    },
    /// No more pages
    Done,
}

impl NextPage {
    /// Create a continuation with query parameters
    pub fn with_params(params: BTreeMap<String, String>) -> Self {
        Self::Continue {
            query_params: params,
        }
    }

    /// Check if this is a done result
    pub fn is_done(&self) -> bool {
        matches!(self, Self::Done)
    }
}

/// How a collection endpoint is walked
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CursorStyle {
    /// One request, no cursor parameters
    Single,
    /// `?offset=0&limit=50`, offset advancing by the limit
    Offset {
        /// Query parameter name for offset
        offset_param: &'static str,
        /// Query parameter name for limit
        limit_param: &'static str,
    },
    /// `?page=1&limit=50`, page advancing by one
    Page {
        /// Query parameter name for page number
        page_param: &'static str,
        /// Query parameter name for page size
        limit_param: &'static str,
    },
}

impl CursorStyle {
    /// `offset` / `limit`
    pub const OFFSET: Self = Self::Offset {
        offset_param: "offset",
        limit_param: "limit",
    };

    /// `page` / `limit`
    pub const PAGE: Self = Self::Page {
        page_param: "page",
        limit_param: "limit",
    };

    /// `page` / `per_page`
    pub const PAGE_PER_PAGE: Self = Self::Page {
        page_param: "page",
        limit_param: "per_page",
    };
}

/// Tracks pagination state during iteration
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PaginationState {
    /// Current page number (1-based, page style)
    pub page: u32,
    /// Current offset (offset style)
    pub offset: u64,
    /// Total records fetched so far
    pub total_fetched: u64,
    /// Number of pages received
    pub pages_fetched: u32,
    /// Is pagination complete?
    pub done: bool,
}

impl PaginationState {
    /// Create a state positioned on the first page
    pub fn new() -> Self {
        Self {
            page: 1,
            ..Default::default()
        }
    }

    /// Create a state positioned on a given 1-based page
    pub fn at_page(page: u32, limit: u32) -> Self {
        let page = page.max(1);
        Self {
            page,
            offset: u64::from(page - 1) * u64::from(limit),
            ..Default::default()
        }
    }

    /// Mark pagination as complete
    pub fn mark_done(&mut self) {
        self.done = true;
    }

    /// Record a received page
    pub fn add_page(&mut self, count: usize) {
        self.pages_fetched += 1;
        self.total_fetched += count as u64;
    }
}

/// Progress reported to an observer after every page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageProgress {
    /// 1-based number of the page just received
    pub page_number: u32,
    /// Records the page yielded
    pub records_in_page: usize,
    /// Records accumulated so far, this page included
    pub total_so_far: usize,
    /// The page matched no known envelope and was taken as one record
    pub fallback: bool,
}

/// Core trait for pagination strategies
pub trait Paginator: Send + Sync {
    /// Query parameters for the request at the current state
    fn initial_params(&self, state: &PaginationState) -> BTreeMap<String, String>;

    /// Account for a received page and decide whether another one follows
    fn process_page(&self, records_count: usize, state: &mut PaginationState) -> NextPage;
}
