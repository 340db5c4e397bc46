//! Pagination strategy implementations

use super::types::{check_stop_condition, NextPage, PaginationState, Paginator, StopCondition};
use crate::types::QueryParams;

/// Query parameter carrying the page index
pub const DEFAULT_PAGE_PARAM: &str = "page";

/// Query parameter carrying the page size
pub const DEFAULT_PAGE_SIZE_PARAM: &str = "per_page";

/// Largest page the provider serves
pub const DEFAULT_PAGE_SIZE: u32 = 100;

// ============================================================================
// Page Number Pagination
// ============================================================================

/// Page number pagination
///
/// Pages are numbered from `start_page` and advance by one per request:
/// `?per_page=100&page=1`, `?per_page=100&page=2`, ... The page size
/// parameter always comes first.
#[derive(Debug, Clone)]
pub struct PageNumberPaginator {
    /// Query parameter name for page number
    pub page_param: String,
    /// First page number
    pub start_page: u32,
    /// Optional page size parameter name
    pub page_size_param: Option<String>,
    /// Page size value
    pub page_size: Option<u32>,
    /// Stop condition
    pub stop_condition: StopCondition,
}

impl PageNumberPaginator {
    /// Create a new page number paginator
    pub fn new(page_param: impl Into<String>, start_page: u32) -> Self {
        Self {
            page_param: page_param.into(),
            start_page,
            page_size_param: None,
            page_size: None,
            stop_condition: StopCondition::EmptyPage,
        }
    }

    /// GitHub-style paginator: `page` from 1, `per_page` of the given size
    pub fn github(page_size: u32) -> Self {
        Self::new(DEFAULT_PAGE_PARAM, 1).with_page_size(DEFAULT_PAGE_SIZE_PARAM, page_size)
    }

    /// Set page size parameter
    #[must_use]
    pub fn with_page_size(mut self, param: impl Into<String>, size: u32) -> Self {
        self.page_size_param = Some(param.into());
        self.page_size = Some(size);
        self
    }

    /// Set stop condition
    #[must_use]
    pub fn with_stop_condition(mut self, condition: StopCondition) -> Self {
        self.stop_condition = condition;
        self
    }

    /// Page number the next request will ask for
    pub fn current_page(&self, state: &PaginationState) -> u32 {
        if state.page == 0 {
            self.start_page
        } else {
            state.page
        }
    }

    /// Parameters for the first page, asking for `size` records
    pub fn first_page_params(&self, size: u32) -> QueryParams {
        self.build_params(self.start_page, Some(size))
    }

    fn params_for(&self, page: u32) -> QueryParams {
        self.build_params(page, self.page_size)
    }

    fn build_params(&self, page: u32, size: Option<u32>) -> QueryParams {
        let mut params = QueryParams::with_capacity(2);
        if let (Some(param), Some(size)) = (&self.page_size_param, size) {
            params.push((param.clone(), size.to_string()));
        }
        params.push((self.page_param.clone(), page.to_string()));
        params
    }
}

impl Default for PageNumberPaginator {
    fn default() -> Self {
        Self::github(DEFAULT_PAGE_SIZE)
    }
}

impl Paginator for PageNumberPaginator {
    fn initial_params(&self, state: &PaginationState) -> QueryParams {
        self.params_for(self.current_page(state))
    }

    fn process_page(&self, records_count: usize, state: &mut PaginationState) -> NextPage {
        if state.page == 0 {
            state.page = self.start_page;
        }
        state.add_fetched(records_count as u64);

        if check_stop_condition(self.stop_condition, records_count, self.page_size).should_stop()
        {
            state.mark_done();
            return NextPage::Done;
        }

        state.next_page();
        NextPage::with_params(self.params_for(state.page))
    }
}
