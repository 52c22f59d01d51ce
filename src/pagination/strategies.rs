//! Pagination strategy implementations

use super::types::{CursorStyle, NextPage, PaginationState, Paginator};
use std::collections::BTreeMap;

/// Build the paginator for a cursor style; a zero limit is raised to one
pub fn paginator_for(style: CursorStyle, limit: u32) -> Box<dyn Paginator> {
    let limit = limit.max(1);
    match style {
        CursorStyle::Single => Box::new(SinglePaginator),
        CursorStyle::Offset {
            offset_param,
            limit_param,
        } => Box::new(OffsetPaginator::new(offset_param, limit_param, limit)),
        CursorStyle::Page {
            page_param,
            limit_param,
        } => Box::new(PageNumberPaginator::new(page_param, limit_param, limit)),
    }
}

// ============================================================================
// Offset Pagination
// ============================================================================

/// Offset-based pagination
///
/// Uses offset and limit parameters to paginate:
/// `?offset=100&limit=50`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OffsetPaginator {
    /// Query parameter name for offset
    pub offset_param: String,
    /// Query parameter name for limit
    pub limit_param: String,
    /// Number of records per page
    pub limit_value: u32,
}

impl OffsetPaginator {
    /// Create a new offset paginator
    pub fn new(
        offset_param: impl Into<String>,
        limit_param: impl Into<String>,
        limit_value: u32,
    ) -> Self {
        Self {
            offset_param: offset_param.into(),
            limit_param: limit_param.into(),
            limit_value: limit_value.max(1),
        }
    }
}

impl Paginator for OffsetPaginator {
    fn initial_params(&self, state: &PaginationState) -> BTreeMap<String, String> {
        let mut params = BTreeMap::new();
        params.insert(self.offset_param.clone(), state.offset.to_string());
        params.insert(self.limit_param.clone(), self.limit_value.to_string());
        params
    }

    fn process_page(&self, records_count: usize, state: &mut PaginationState) -> NextPage {
        state.add_page(records_count);

        // An empty or short page is the last one
        if records_count < self.limit_value as usize {
            state.mark_done();
            return NextPage::Done;
        }

        state.offset += u64::from(self.limit_value);
        NextPage::with_params(self.initial_params(state))
    }
}

// ============================================================================
// Page Number Pagination
// ============================================================================

/// Page number pagination
///
/// Uses a 1-based page number and a page size:
/// `?page=2&limit=50` or `?page=2&per_page=100`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageNumberPaginator {
    /// Query parameter name for page number
    pub page_param: String,
    /// Query parameter name for page size
    pub page_size_param: String,
    /// Page size value
    pub page_size: u32,
}

impl PageNumberPaginator {
    /// Create a new page number paginator
    pub fn new(page_param: impl Into<String>, page_size_param: impl Into<String>, size: u32) -> Self {
        Self {
            page_param: page_param.into(),
            page_size_param: page_size_param.into(),
            page_size: size.max(1),
        }
    }
}

impl Paginator for PageNumberPaginator {
    fn initial_params(&self, state: &PaginationState) -> BTreeMap<String, String> {
        let mut params = BTreeMap::new();
        params.insert(self.page_param.clone(), state.page.max(1).to_string());
        params.insert(self.page_size_param.clone(), self.page_size.to_string());
        params
    }

    fn process_page(&self, records_count: usize, state: &mut PaginationState) -> NextPage {
        state.add_page(records_count);

        if records_count < self.page_size as usize {
            state.mark_done();
            return NextPage::Done;
        }

        state.page = state.page.max(1) + 1;
        NextPage::with_params(self.initial_params(state))
    }
}

// ============================================================================
// Single Request
// ============================================================================

/// One request, whatever it returns
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SinglePaginator;

impl Paginator for SinglePaginator {
    fn initial_params(&self, _state: &PaginationState) -> BTreeMap<String, String> {
        BTreeMap::new()
    }

    fn process_page(&self, records_count: usize, state: &mut PaginationState) -> NextPage {
        state.add_page(records_count);
        state.mark_done();
        NextPage::Done
    }
}
