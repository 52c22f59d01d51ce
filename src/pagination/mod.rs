//! Pagination module
//!
//! Supports: Offset/Limit, Page Number, Single request
//!
//! # Overview
//!
//! A [`Paginator`] owns the cursor for one fetch-all call: it produces the
//! query parameters of the next request and decides termination from the
//! number of records a page yielded. The fetcher drives the loop through a
//! [`Transport`](crate::http::Transport), classifying and normalizing each
//! page before it is appended.
//!
//! A short page or an empty page always ends the loop, so a collection of
//! `n` records takes at most `n / limit + 1` requests.

mod fetcher;
mod strategies;
mod types;

pub use fetcher::{fetch_all, fetch_page, CollectionRequest, PageObserver};
pub use strategies::{paginator_for, OffsetPaginator, PageNumberPaginator, SinglePaginator};
pub use types::{CursorStyle, NextPage, PageProgress, PaginationState, Paginator};
