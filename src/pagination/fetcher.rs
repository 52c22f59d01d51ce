//! Page-walking fetch loop
//!
//! Requests pages one at a time, classifies each response, normalizes its
//! envelope and appends the records in request order.

use super::strategies::paginator_for;
use super::types::{CursorStyle, NextPage, PageProgress, PaginationState, Paginator};
use crate::envelope::{EnvelopeNormalizer, Normalized};
use crate::error::Result;
use crate::http::{check_response, RequestDescriptor, ResourceRef, Transport};
use crate::types::Record;
use std::collections::BTreeMap;
use std::ops::ControlFlow;
use tracing::{debug, info, warn};

/// Callback invoked after each page; `Break` stops before the next request
pub type PageObserver<'a> = dyn FnMut(&PageProgress) -> ControlFlow<()> + Send + 'a;

/// Everything needed to walk one collection endpoint
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectionRequest {
    /// Path template of the collection
    pub path: String,
    /// Resource name for error messages
    pub resource: String,
    /// Key locating the record list inside an envelope
    pub record_hint: Option<String>,
    /// Filters sent unchanged with every page
    pub filters: BTreeMap<String, String>,
    /// Cursor style
    pub cursor: CursorStyle,
    /// Records requested per page
    pub page_size: u32,
}

impl CollectionRequest {
    /// Create a request for a collection path
    pub fn new(path: impl Into<String>, resource: impl Into<String>, cursor: CursorStyle) -> Self {
        Self {
            path: path.into(),
            resource: resource.into(),
            record_hint: None,
            filters: BTreeMap::new(),
            cursor,
            page_size: 50,
        }
    }

    /// Set the record hint
    #[must_use]
    pub fn hint(mut self, hint: impl Into<String>) -> Self {
        self.record_hint = Some(hint.into());
        self
    }

    /// Set the page size
    #[must_use]
    pub fn page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size;
        self
    }

    /// Add a filter parameter
    #[must_use]
    pub fn filter(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.filters.insert(key.into(), value.to_string());
        self
    }

    /// Add several filter parameters
    #[must_use]
    pub fn filters(mut self, filters: &BTreeMap<String, String>) -> Self {
        self.filters
            .extend(filters.iter().map(|(k, v)| (k.clone(), v.clone())));
        self
    }

    fn descriptor(&self, cursor_params: BTreeMap<String, String>) -> RequestDescriptor {
        RequestDescriptor::get(self.path.clone())
            .queries(self.filters.iter().map(|(k, v)| (k.clone(), v.clone())))
            .queries(cursor_params)
    }
}

/// Fetch every page of a collection.
///
/// The first classified error aborts the walk and is returned; records
/// gathered before it are discarded. An observer `Break` ends the walk
/// early and returns what was gathered.
pub async fn fetch_all<T>(
    transport: &T,
    normalizer: &EnvelopeNormalizer,
    request: &CollectionRequest,
    observer: &mut PageObserver<'_>,
) -> Result<Vec<Record>>
where
    T: Transport + ?Sized,
{
    let paginator = paginator_for(request.cursor, request.page_size);
    let mut state = PaginationState::new();
    let mut params = paginator.initial_params(&state);
    let mut records: Vec<Record> = Vec::new();

    loop {
        let page_number = state.pages_fetched + 1;
        let page = match fetch_one_page(transport, normalizer, request, params).await {
            Ok(page) => page,
            Err(e) => {
                if !records.is_empty() {
                    warn!(
                        "Fetching {} failed on page {}, discarding {} record(s): {}",
                        request.resource,
                        page_number,
                        records.len(),
                        e
                    );
                }
                return Err(e);
            }
        };

        let fallback = page.is_fallback();
        if fallback {
            warn!(
                "{} page {} from {} matched no known envelope, kept as one record",
                request.resource, page_number, request.path
            );
        }
        let records_in_page = page.records.len();
        records.extend(page.records);
        debug!(
            "{} page {}: {} record(s), {} total",
            request.resource,
            page_number,
            records_in_page,
            records.len()
        );

        let next = paginator.process_page(records_in_page, &mut state);
        let progress = PageProgress {
            page_number,
            records_in_page,
            total_so_far: records.len(),
            fallback,
        };
        let flow = observer(&progress);

        match next {
            NextPage::Done => break,
            NextPage::Continue { query_params } => {
                if flow.is_break() {
                    info!(
                        "Fetching {} stopped by caller after page {} ({} record(s))",
                        request.resource,
                        page_number,
                        records.len()
                    );
                    break;
                }
                params = query_params;
            }
        }
    }

    info!(
        "Fetched {} {} record(s) in {} request(s)",
        records.len(),
        request.resource,
        state.pages_fetched
    );
    Ok(records)
}

/// Fetch a single 1-based page of a collection
pub async fn fetch_page<T>(
    transport: &T,
    normalizer: &EnvelopeNormalizer,
    request: &CollectionRequest,
    page: u32,
) -> Result<Vec<Record>>
where
    T: Transport + ?Sized,
{
    let paginator = paginator_for(request.cursor, request.page_size);
    let state = PaginationState::at_page(page, request.page_size.max(1));
    let page = fetch_one_page(transport, normalizer, request, paginator.initial_params(&state)).await?;
    Ok(page.records)
}

async fn fetch_one_page<T>(
    transport: &T,
    normalizer: &EnvelopeNormalizer,
    request: &CollectionRequest,
    cursor_params: BTreeMap<String, String>,
) -> Result<Normalized>
where
    T: Transport + ?Sized,
{
    let descriptor = request.descriptor(cursor_params);
    let response = transport.send(&descriptor).await?;
    let response = check_response(response, &ResourceRef::collection(&request.resource))?;
    let body = response.json()?;
    normalizer.normalize(body, request.record_hint.as_deref())
}
