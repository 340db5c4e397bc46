//! Pagination types and traits
//!
//! Defines the core pagination abstractions used by the fetcher.

use crate::types::QueryParams;
use serde::{Deserialize, Serialize};

/// Result of the next page computation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NextPage {
    /// More pages available with these query parameters
    Continue {
        /// Query parameters for the next request
        query_params: QueryParams,
    },
    /// No more pages
    Done,
}

impl NextPage {
    /// Create a continuation with query parameters
    pub fn with_params(params: QueryParams) -> Self {
        Self::Continue {
            query_params: params,
        }
    }

    /// Check if this is a done result
    pub fn is_done(&self) -> bool {
        matches!(self, Self::Done)
    }

    /// Check if this is a continue result
    pub fn is_continue(&self) -> bool {
        matches!(self, Self::Continue { .. })
    }
}

/// Stop conditions for pagination
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StopCondition {
    /// Stop when a page comes back with no records
    #[default]
    EmptyPage,

    /// Also stop after a page holding fewer records than the page size
    ShortPage,
}

/// Result of checking a stop condition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopResult {
    /// Continue pagination
    Continue,
    /// Stop pagination
    Stop,
}

impl StopResult {
    /// Check if we should stop
    pub fn should_stop(&self) -> bool {
        matches!(self, Self::Stop)
    }
}

/// Tracks pagination state during iteration
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PaginationState {
    /// Current page number; 0 until the first request is planned
    pub page: u32,
    /// Number of requests issued so far
    pub requests: u32,
    /// Total records fetched so far
    pub total_fetched: u64,
    /// Is pagination complete?
    pub done: bool,
}

impl PaginationState {
    /// Create a new pagination state
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark pagination as complete
    pub fn mark_done(&mut self) {
        self.done = true;
    }

    /// Increment page number
    pub fn next_page(&mut self) {
        self.page += 1;
    }

    /// Record that a request was issued
    pub fn add_request(&mut self) {
        self.requests += 1;
    }

    /// Add to total fetched
    pub fn add_fetched(&mut self, count: u64) {
        self.total_fetched += count;
    }
}

/// Core trait for pagination strategies
pub trait Paginator: Send + Sync {
    /// Query parameters for the page the state currently points at
    fn initial_params(&self, state: &PaginationState) -> QueryParams;

    /// Account for a fetched page and return the parameters of the next one
    fn process_page(&self, records_count: usize, state: &mut PaginationState) -> NextPage;
}

/// Check a stop condition against a fetched page
pub fn check_stop_condition(
    condition: StopCondition,
    records_count: usize,
    page_size: Option<u32>,
) -> StopResult {
    if records_count == 0 {
        return StopResult::Stop;
    }

    match (condition, page_size) {
        (StopCondition::ShortPage, Some(size)) if records_count < size as usize => {
            StopResult::Stop
        }
        _ => StopResult::Continue,
    }
}
